//! 消息类型定义
//!
//! 宿主与引擎之间按行交换 JSON，每行一个请求或一个响应。

use serde::{Deserialize, Serialize};

use crate::moves::FullMove;
use crate::piece::Side;

/// AI 难度（强化学习引擎的预设）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单：100 次模拟，温度 0.5
    Easy,
    /// 中等：300 次模拟，温度 0.2
    Medium,
    /// 困难：800 次模拟，贪心
    #[default]
    Hard,
}

impl Difficulty {
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    /// 不区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(s.to_string()),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 宿主发送给引擎的请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineRequest {
    /// 经典 alpha-beta 搜索
    Minimax {
        board: Vec<u8>,
        depth: u32,
        /// 走子方，缺省为黑方
        #[serde(default)]
        side: Side,
    },
    /// 加载强化学习模型
    LoadModel { path: String },
    /// 强化学习引擎走子
    RlMove {
        board: Vec<u8>,
        #[serde(default)]
        side: Side,
        #[serde(default)]
        difficulty: Option<String>,
        /// 显式模拟次数，优先于难度
        #[serde(default)]
        simulations: Option<u32>,
    },
}

/// 引擎返回给宿主的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineResponse {
    /// 完整走法
    Move(FullMove),
    /// 模型加载成功
    ModelLoaded,
    /// 错误消息
    Error { code: ErrorCode, message: String },
}

/// 错误码定义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum ErrorCode {
    // === 输入相关 (1xx) ===
    /// 棋盘编码无效
    InvalidBoard = 100,
    /// 非法动作
    IllegalAction = 101,
    /// 未知难度
    UnknownDifficulty = 102,
    /// 请求无法解析
    InvalidRequest = 103,

    // === 引擎相关 (2xx) ===
    /// 尚未加载模型
    AgentNotReady = 200,
    /// 对局已结束
    GameAlreadyOver = 201,
    /// 模型加载失败
    ModelLoadFailed = 202,
    /// 推理失败
    InferenceFailed = 203,

    // === 系统相关 (5xx) ===
    /// 内部错误
    InternalError = 500,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
