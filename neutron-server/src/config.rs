//! 服务配置
//!
//! 查找顺序：`NEUTRON_CONFIG` 指定的文件，其次是用户配置目录下的
//! `neutron/config.json`，都没有时使用默认值。`NEUTRON_MODEL` 覆盖模型路径。

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use protocol::Difficulty;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 配置文件路径的环境变量
pub const CONFIG_ENV: &str = "NEUTRON_CONFIG";
/// 模型路径的环境变量
pub const MODEL_ENV: &str = "NEUTRON_MODEL";

/// 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// 启动时加载的模型
    pub model_path: Option<PathBuf>,
    /// 请求未指定难度时使用
    pub difficulty: Difficulty,
    /// 固定随机种子，None 时取系统熵
    pub seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            difficulty: Difficulty::Hard,
            seed: None,
        }
    }
}

impl ServiceConfig {
    /// 按查找顺序加载配置并应用环境变量覆盖
    pub fn load() -> Result<Self> {
        let explicit = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = explicit.clone().or_else(default_config_path);

        let mut config = match path {
            Some(path) if explicit.is_some() || path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Some(model) = env::var_os(MODEL_ENV) {
            config.model_path = Some(PathBuf::from(model));
        }

        Ok(config)
    }

    /// 从 JSON 文件读取
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {:?}", path))?;
        let config: ServiceConfig = serde_json::from_str(&content)
            .with_context(|| format!("配置文件格式错误: {:?}", path))?;
        debug!("已读取配置 {:?}", path);
        Ok(config)
    }
}

/// 用户配置目录下的默认配置文件
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("neutron").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.model_path, None);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_from_file_partial() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"difficulty":"easy","seed":7}"#).unwrap();

        let config = ServiceConfig::from_file(&path).unwrap();
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.model_path, None);
    }

    #[test]
    fn test_from_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(ServiceConfig::from_file(&missing).is_err());

        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "{difficulty").unwrap();
        let err = ServiceConfig::from_file(&broken).unwrap_err();
        assert!(err.to_string().contains("配置文件格式错误"));
    }

    #[test]
    fn test_default_path_name() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("neutron/config.json"));
        }
    }
}
