//! 错误类型定义

use thiserror::Error;

/// 规则错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// 动作会把棋子移出棋盘
    #[error("Illegal action {action}: destination ({row}, {col}) is off board")]
    IllegalAction { action: u16, row: i8, col: i8 },

    /// 动作编号越界
    #[error("Invalid action index: {index} (max: {max})")]
    InvalidActionIndex { index: usize, max: usize },

    /// 无效的位置
    #[error("Invalid position: ({row}, {col})")]
    InvalidPosition { row: i8, col: i8 },

    /// 无效的棋子编码
    #[error("Invalid piece code: {code}")]
    InvalidPieceCode { code: i16 },

    /// 棋盘长度错误
    #[error("Invalid board length: {len} cells (expected: {expected})")]
    InvalidBoardLength { len: usize, expected: usize },

    /// 棋盘上没有中子
    #[error("No neutron on board")]
    MissingNeutron,

    /// 完整走法必须恰好包含 4 步
    #[error("Malformed full move: {len} moves (expected 0 or 4)")]
    MalformedFullMove { len: usize },
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 规则错误
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
