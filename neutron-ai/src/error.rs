//! 错误类型定义

use protocol::RuleError;
use thiserror::Error;

/// AI 引擎错误
#[derive(Error, Debug)]
pub enum AiError {
    /// 规则错误
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// 尚未加载模型
    #[error("Agent not ready: load a model first")]
    AgentNotReady,

    /// 未知难度
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// 对终局状态请求走法
    #[error("Cannot search a terminal state")]
    TerminalState,

    /// 推理失败或输出不合法
    #[error("Inference error: {0}")]
    Inference(String),

    /// 模型文件格式错误
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// AI 操作结果类型
pub type Result<T> = std::result::Result<T, AiError>;
