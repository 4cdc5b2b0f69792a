//! 强化学习代理
//!
//! 持有推理后端和 MCTS 搜索器，按难度预设调整模拟次数与温度。

use std::path::Path;

use protocol::{
    Action, Board, Difficulty, FullMove, GameState, Phase, PieceKind, Position, RuleError, Side,
    NUM_CELLS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AiError, Result};
use crate::inference::Inference;
use crate::mcts::{Mcts, MctsConfig};
use crate::model::ModelLoader;

/// 难度对应的搜索参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub simulations: u32,
    pub temperature: f32,
}

impl DifficultyConfig {
    pub fn from_preset(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                simulations: 100,
                temperature: 0.5,
            },
            Difficulty::Medium => Self {
                simulations: 300,
                temperature: 0.2,
            },
            Difficulty::Hard => Self {
                simulations: 800,
                temperature: 0.0,
            },
        }
    }

    pub fn from_simulations(simulations: u32, temperature: f32) -> Self {
        Self {
            simulations,
            temperature,
        }
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::from_preset(Difficulty::Hard)
    }
}

/// 中子棋代理
pub struct NeutronAgent {
    inference: Option<Box<dyn Inference>>,
    mcts: Mcts,
    difficulty_config: DifficultyConfig,
}

impl NeutronAgent {
    /// 创建未加载模型的代理（困难难度）
    pub fn new() -> Self {
        Self::from_mcts(Mcts::new)
    }

    /// 固定随机种子
    pub fn with_seed(seed: u64) -> Self {
        Self::from_mcts(|config| Mcts::with_seed(config, seed))
    }

    fn from_mcts(build: impl FnOnce(MctsConfig) -> Mcts) -> Self {
        let difficulty_config = DifficultyConfig::default();
        let config = MctsConfig {
            num_simulations: difficulty_config.simulations,
            temperature: difficulty_config.temperature,
            ..MctsConfig::default()
        };
        Self {
            inference: None,
            mcts: build(config),
            difficulty_config,
        }
    }

    /// 通过加载器加载模型
    ///
    /// 加载失败时代理回到未就绪状态。
    pub fn load_model(&mut self, loader: &dyn ModelLoader, path: &Path) -> Result<()> {
        match loader.load(path) {
            Ok(inference) => {
                self.inference = Some(inference);
                info!("代理模型已就绪: {}", path.display());
                Ok(())
            }
            Err(e) => {
                self.inference = None;
                warn!("加载模型失败 {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// 直接设置推理后端
    pub fn set_inference(&mut self, inference: Box<dyn Inference>) {
        self.inference = Some(inference);
    }

    pub fn is_ready(&self) -> bool {
        self.inference.is_some()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.apply_config(DifficultyConfig::from_preset(difficulty));
        info!("难度设置为 {}", difficulty);
    }

    /// 显式指定模拟次数和温度
    pub fn set_simulations(&mut self, simulations: u32, temperature: f32) {
        self.apply_config(DifficultyConfig::from_simulations(simulations, temperature));
    }

    /// 按名称设置难度（不区分大小写），未知名称保持原难度
    pub fn set_difficulty_by_name(&mut self, name: &str) -> Result<()> {
        let difficulty = name
            .parse::<Difficulty>()
            .map_err(AiError::UnknownDifficulty)?;
        self.set_difficulty(difficulty);
        Ok(())
    }

    pub fn difficulty_config(&self) -> DifficultyConfig {
        self.difficulty_config
    }

    fn apply_config(&mut self, config: DifficultyConfig) {
        self.difficulty_config = config;
        self.mcts.set_num_simulations(config.simulations);
        self.mcts.set_temperature(config.temperature);
    }

    /// 为当前状态选择一个动作
    pub fn get_move(&mut self, state: &GameState) -> Result<Action> {
        let inference = self.inference.as_deref().ok_or(AiError::AgentNotReady)?;
        if state.is_terminal() {
            return Err(AiError::TerminalState);
        }
        self.mcts.search(state, inference)
    }

    /// 选择动作并返回根节点访问概率，选中的是概率最高的动作
    pub fn get_move_with_probs(
        &mut self,
        state: &GameState,
    ) -> Result<(Action, Vec<(Action, f32)>)> {
        let inference = self.inference.as_deref().ok_or(AiError::AgentNotReady)?;
        if state.is_terminal() {
            return Err(AiError::TerminalState);
        }
        let probs = self.mcts.search_with_probs(state, inference)?;

        let mut best: Option<(Action, f32)> = None;
        for &(action, prob) in &probs {
            if best.map_or(true, |(_, best_prob)| prob > best_prob) {
                best = Some((action, prob));
            }
        }
        let (action, _) = best.ok_or(AiError::TerminalState)?;
        Ok((action, probs))
    }

    /// 为 `side` 生成完整走法：先移动中子，再移动己方棋子
    ///
    /// 中子一步就结束对局时，第一枚己方棋子（行优先）原地不动。分数固定为 1。
    pub fn best_full_move(&mut self, board: &Board, side: Side) -> Result<FullMove> {
        board.find_neutron().ok_or(RuleError::MissingNeutron)?;

        let state = GameState::new(*board, side, Phase::MoveNeutron);
        let neutron_action = self.get_move(&state)?;
        let (neutron_from, neutron_to) = neutron_action.endpoints()?;
        let state = state.apply_action(neutron_action)?;

        let (piece_from, piece_to) = if state.is_terminal() {
            let own = Self::first_piece(&state.board, side).ok_or(AiError::TerminalState)?;
            (own, own)
        } else {
            self.get_move(&state)?.endpoints()?
        };

        let full_move =
            FullMove::new(neutron_from, neutron_to, piece_from, piece_to, side.piece(), 1);
        debug!("RL 完整走法 {}", full_move);
        Ok(full_move)
    }

    fn first_piece(board: &Board, side: Side) -> Option<Position> {
        let piece: PieceKind = side.piece();
        (0..NUM_CELLS)
            .filter_map(Position::from_cell)
            .find(|&pos| board.get(pos) == piece)
    }
}

impl Default for NeutronAgent {
    fn default() -> Self {
        Self::new()
    }
}
