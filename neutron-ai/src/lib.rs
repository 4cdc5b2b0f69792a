//! 中子棋 AI 引擎
//!
//! 包含:
//! - 棋局评估函数
//! - 完整走法上的 Minimax + Alpha-Beta 搜索
//! - 策略/价值网络引导的 MCTS (PUCT)
//! - 推理接口与 JSON 线性模型
//! - 按难度配置的强化学习代理

mod agent;
mod error;
mod evaluate;
mod inference;
mod mcts;
mod model;
mod search;

pub use agent::{DifficultyConfig, NeutronAgent};
pub use error::{AiError, Result};
pub use evaluate::Evaluator;
pub use inference::{Inference, InferenceOutput, UniformInference};
pub use mcts::{Mcts, MctsConfig, Node, NodeId, SearchTree};
pub use model::{JsonModelLoader, LinearModel, ModelLoader};
pub use search::{AiConfig, AiEngine};
