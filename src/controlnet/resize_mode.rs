//! 缩放模式

use strum_macros::{Display, EnumString};

use crate::error::Error;

/// webui 的缩放模式枚举
///
/// Display 字符串与 ControlNet `external_code.resize_mode_from_value`
/// 接受的值保持一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum ResizeMode {
    #[strum(to_string = "Just Resize")]
    Resize,
    #[strum(to_string = "Crop and Resize")]
    InnerFit,
    #[strum(to_string = "Resize and Fill")]
    OuterFit,
}

impl ResizeMode {
    /// 宿主请求对象上的 `resize_mode` 是整数编码
    pub fn from_host_value(value: i64) -> Result<Self, Error> {
        match value {
            0 => Ok(ResizeMode::Resize),
            1 => Ok(ResizeMode::InnerFit),
            2 => Ok(ResizeMode::OuterFit),
            other => Err(Error::InvalidParameter(format!(
                "unknown resize mode: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_value_mapping() {
        assert_eq!(ResizeMode::from_host_value(0).unwrap(), ResizeMode::Resize);
        assert_eq!(
            ResizeMode::from_host_value(1).unwrap(),
            ResizeMode::InnerFit
        );
        assert_eq!(
            ResizeMode::from_host_value(2).unwrap(),
            ResizeMode::OuterFit
        );
        assert!(ResizeMode::from_host_value(3).is_err());
    }

    #[test]
    fn test_display_matches_controlnet_values() {
        assert_eq!(ResizeMode::Resize.to_string(), "Just Resize");
        assert_eq!(ResizeMode::InnerFit.to_string(), "Crop and Resize");
        assert_eq!(ResizeMode::OuterFit.to_string(), "Resize and Fill");
    }

    #[test]
    fn test_parse_from_display_string() {
        use std::str::FromStr;
        assert_eq!(
            ResizeMode::from_str("Just Resize").unwrap(),
            ResizeMode::Resize
        );
        assert!(ResizeMode::from_str("Stretch").is_err());
    }
}
