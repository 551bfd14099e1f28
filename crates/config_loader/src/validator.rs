//! 配置校验模块
//!
//! 校验规则：
//! - transform_path 非空且扩展名受支持 (.toml / .json)
//! - buffer_size > 0

use contracts::{ContractError, MapperSettings};

use crate::parser::ConfigFormat;

/// 校验 MapperSettings 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(settings: &MapperSettings) -> Result<(), ContractError> {
    validate_transform_path(settings)?;
    validate_buffer_size(settings)?;
    Ok(())
}

/// 校验 transform_path
fn validate_transform_path(settings: &MapperSettings) -> Result<(), ContractError> {
    if settings.transform_path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "transform_path",
            "transform_path cannot be empty",
        ));
    }

    let ext = settings
        .transform_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    if ConfigFormat::from_extension(ext).is_none() {
        return Err(ContractError::config_validation(
            "transform_path",
            format!("unsupported transform definition format: '.{ext}'"),
        ));
    }

    Ok(())
}

/// 校验 buffer_size
fn validate_buffer_size(settings: &MapperSettings) -> Result<(), ContractError> {
    if settings.buffer_size == 0 {
        return Err(ContractError::config_validation(
            "buffer_size",
            "buffer_size must be > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ConfigVersion;
    use std::path::PathBuf;

    fn minimal_settings() -> MapperSettings {
        MapperSettings {
            version: ConfigVersion::V1,
            transform_path: PathBuf::from("transforms.toml"),
            buffer_size: 100,
        }
    }

    #[test]
    fn test_valid_config() {
        let settings = minimal_settings();
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_empty_transform_path() {
        let mut settings = minimal_settings();
        settings.transform_path = PathBuf::new();
        let result = validate(&settings);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_unsupported_transform_extension() {
        let mut settings = minimal_settings();
        settings.transform_path = PathBuf::from("transforms.yaml");
        let result = validate(&settings);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unsupported"), "got: {err}");
    }

    #[test]
    fn test_zero_buffer_size() {
        let mut settings = minimal_settings();
        settings.buffer_size = 0;
        let result = validate(&settings);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("must be > 0"), "got: {err}");
    }
}
