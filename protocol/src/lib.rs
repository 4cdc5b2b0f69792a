//! 中子棋共享协议库
//!
//! 包含:
//! - 棋子、棋盘、位置、方向等核心数据结构
//! - 经典完整走法生成
//! - 强化学习的对局状态与 800 动作编码
//! - 宿主与引擎之间的消息类型 (EngineRequest, EngineResponse)

mod action;
mod board;
mod constants;
mod error;
mod message;
mod moves;
mod piece;
mod state;

pub use action::{flip_policy, Action};
pub use board::Board;
pub use constants::*;
pub use error::{ProtocolError, Result, RuleError};
pub use message::{Difficulty, EngineRequest, EngineResponse, ErrorCode};
pub use moves::{FullMove, Move, MoveGenerator};
pub use piece::{Direction, PieceKind, Position, Side};
pub use state::{GameState, Phase};
