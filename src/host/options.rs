//! 全局选项覆盖

use crate::error::Error;

/// 宿主全局选项表的能力接口
pub trait OptionStore {
    /// 选项值类型, python 侧为任意对象, 测试侧为 bool
    type Value;

    fn contains(&self, key: &str) -> Result<bool, Error>;
    fn get(&self, key: &str) -> Result<Self::Value, Error>;
    fn set(&mut self, key: &str, value: Self::Value) -> Result<(), Error>;
    /// 把选项强制置为 true
    fn set_true(&mut self, key: &str) -> Result<(), Error>;
}

/// 单个布尔选项的作用域覆盖
///
/// engage 时记住旧值并强制为 true, release 时无条件恢复;
/// 选项不存在则整个作用域是空操作, 不会插入新键
#[derive(Debug)]
pub struct FlagOverride<V> {
    key: String,
    prev: Option<V>,
}

impl<V> FlagOverride<V> {
    pub fn engage<S>(store: &mut S, key: &str) -> Result<Self, Error>
    where
        S: OptionStore<Value = V>,
    {
        let prev = if store.contains(key)? {
            let prev = store.get(key)?;
            store.set_true(key)?;
            Some(prev)
        } else {
            None
        };

        Ok(Self {
            key: key.to_string(),
            prev,
        })
    }

    pub fn release<S>(self, store: &mut S) -> Result<(), Error>
    where
        S: OptionStore<Value = V>,
    {
        if let Some(prev) = self.prev {
            store.set(&self.key, prev)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    impl OptionStore for HashMap<String, bool> {
        type Value = bool;

        fn contains(&self, key: &str) -> Result<bool, Error> {
            Ok(self.contains_key(key))
        }

        fn get(&self, key: &str) -> Result<bool, Error> {
            self.get(key)
                .copied()
                .ok_or_else(|| Error::OptionNone(key.to_string()))
        }

        fn set(&mut self, key: &str, value: bool) -> Result<(), Error> {
            self.insert(key.to_string(), value);
            Ok(())
        }

        fn set_true(&mut self, key: &str) -> Result<(), Error> {
            self.insert(key.to_string(), true);
            Ok(())
        }
    }

    const KEY: &str = "control_net_allow_script_control";

    #[test]
    fn test_flag_forced_true_then_restored() -> anyhow::Result<()> {
        let mut opts = HashMap::from([(KEY.to_string(), false)]);

        let guard = FlagOverride::engage(&mut opts, KEY)?;
        assert_eq!(opts[KEY], true);

        guard.release(&mut opts)?;
        assert_eq!(opts[KEY], false);
        Ok(())
    }

    #[test]
    fn test_already_true_stays_true() -> anyhow::Result<()> {
        let mut opts = HashMap::from([(KEY.to_string(), true)]);

        let guard = FlagOverride::engage(&mut opts, KEY)?;
        guard.release(&mut opts)?;
        assert_eq!(opts[KEY], true);
        Ok(())
    }

    #[test]
    fn test_absent_key_is_never_inserted() -> anyhow::Result<()> {
        let mut opts: HashMap<String, bool> = HashMap::new();

        let guard = FlagOverride::engage(&mut opts, KEY)?;
        assert!(opts.is_empty());
        guard.release(&mut opts)?;
        assert!(opts.is_empty());
        Ok(())
    }
}
