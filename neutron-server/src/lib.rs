//! 中子棋引擎服务
//!
//! 包含:
//! - 服务配置
//! - 请求分发（经典搜索、模型加载、强化学习走子）
//! - 错误到线上错误码的映射

pub mod config;
pub mod error;
pub mod service;

pub use config::{default_config_path, ServiceConfig};
pub use error::{Result, ServiceError};
pub use service::EngineService;
