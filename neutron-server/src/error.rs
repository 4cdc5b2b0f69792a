//! 服务错误类型

use neutron_ai::AiError;
use protocol::{ErrorCode, ProtocolError, RuleError};
use thiserror::Error;

/// 引擎服务错误
#[derive(Error, Debug)]
pub enum ServiceError {
    /// AI 引擎错误
    #[error("{0}")]
    Ai(#[from] AiError),

    /// 协议错误
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    /// 工作线程崩溃或锁中毒
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RuleError> for ServiceError {
    fn from(e: RuleError) -> Self {
        ServiceError::Protocol(ProtocolError::Rule(e))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Protocol(ProtocolError::Json(e))
    }
}

fn rule_code(e: &RuleError) -> ErrorCode {
    match e {
        RuleError::IllegalAction { .. } | RuleError::InvalidActionIndex { .. } => {
            ErrorCode::IllegalAction
        }
        _ => ErrorCode::InvalidBoard,
    }
}

impl ServiceError {
    /// 对应的线上错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Ai(e) => match e {
                AiError::Rule(rule) => rule_code(rule),
                AiError::AgentNotReady => ErrorCode::AgentNotReady,
                AiError::UnknownDifficulty(_) => ErrorCode::UnknownDifficulty,
                AiError::TerminalState => ErrorCode::GameAlreadyOver,
                AiError::Inference(_) => ErrorCode::InferenceFailed,
                AiError::ModelLoad(_) | AiError::Io(_) => ErrorCode::ModelLoadFailed,
            },
            ServiceError::Protocol(ProtocolError::Rule(rule)) => rule_code(rule),
            ServiceError::Protocol(ProtocolError::Json(_)) => ErrorCode::InvalidRequest,
            ServiceError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

/// 服务操作结果类型
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ServiceError::from(AiError::AgentNotReady).code(), ErrorCode::AgentNotReady);
        assert_eq!(
            ServiceError::from(AiError::UnknownDifficulty("x".into())).code(),
            ErrorCode::UnknownDifficulty
        );
        assert_eq!(ServiceError::from(AiError::TerminalState).code(), ErrorCode::GameAlreadyOver);
        assert_eq!(
            ServiceError::from(RuleError::InvalidBoardLength { len: 3, expected: 25 }).code(),
            ErrorCode::InvalidBoard
        );
        assert_eq!(
            ServiceError::from(AiError::Rule(RuleError::IllegalAction {
                action: 2,
                row: -1,
                col: 2
            }))
            .code(),
            ErrorCode::IllegalAction
        );
        assert_eq!(ServiceError::Internal("boom".into()).code(), ErrorCode::InternalError);

        let json = serde_json::from_str::<u8>("nope").unwrap_err();
        assert_eq!(ServiceError::from(json).code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_display_is_inner_message() {
        let e = ServiceError::from(AiError::AgentNotReady);
        assert_eq!(e.to_string(), "Agent not ready: load a model first");
    }
}
