//! 对局状态（强化学习视角）
//!
//! 一个回合分两个阶段：先移动中子，再移动己方棋子；
//! 只有移动己方棋子之后才轮到对方。

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::board::Board;
use crate::constants::{ENCODED_STATE_SIZE, NUM_CELLS};
use crate::error::RuleError;
use crate::piece::{Direction, PieceKind, Position, Side};

/// 回合阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// 移动中子
    MoveNeutron,
    /// 移动己方棋子
    MovePiece,
}

/// 完整的对局状态（棋盘 + 走子方 + 阶段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current: Side,
    pub phase: Phase,
}

impl GameState {
    /// 初始状态：白方先走中子
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            current: Side::White,
            phase: Phase::MoveNeutron,
        }
    }

    pub fn new(board: Board, current: Side, phase: Phase) -> Self {
        Self { board, current, phase }
    }

    /// 当前阶段的所有合法动作
    ///
    /// 只允许滑到底，格子按行优先、方向按罗盘顺序枚举。
    pub fn legal_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.phase {
            Phase::MoveNeutron => {
                if let Some(neutron) = self.board.find_neutron() {
                    self.push_piece_actions(neutron, &mut actions);
                }
            }
            Phase::MovePiece => {
                let piece = self.current.piece();
                for cell in 0..NUM_CELLS {
                    if self.board.get_cell(cell) == piece {
                        if let Some(pos) = Position::from_cell(cell) {
                            self.push_piece_actions(pos, &mut actions);
                        }
                    }
                }
            }
        }
        actions
    }

    fn push_piece_actions(&self, from: Position, actions: &mut Vec<Action>) {
        for direction in Direction::ALL {
            let distance = self.board.slide_distance(from, direction);
            if distance > 0 {
                if let Ok(action) = Action::new(from.to_cell(), direction, distance) {
                    actions.push(action);
                }
            }
        }
    }

    /// 执行动作，返回新状态
    ///
    /// 目标越出棋盘的动作会被拒绝。
    pub fn apply_action(&self, action: Action) -> Result<GameState, RuleError> {
        let (from, to) = action.endpoints()?;

        let mut next = *self;
        next.board = self.board.with_move(from, to);
        match self.phase {
            Phase::MoveNeutron => next.phase = Phase::MovePiece,
            Phase::MovePiece => {
                next.phase = Phase::MoveNeutron;
                next.current = self.current.opponent();
            }
        }
        Ok(next)
    }

    /// 中子所在行是否已决定胜负
    fn home_row_winner(&self) -> Option<Side> {
        let neutron = self.board.find_neutron()?;
        [Side::Black, Side::White]
            .into_iter()
            .find(|side| side.home_row() == neutron.row)
    }

    /// 是否终局：中子到达任一底线，或走子方无路可走
    pub fn is_terminal(&self) -> bool {
        if self.board.find_neutron().is_none() {
            return true;
        }
        self.home_row_winner().is_some() || self.legal_actions().is_empty()
    }

    /// 胜者：中子所在底线的一方；否则无路可走的走子方告负
    pub fn winner(&self) -> Option<Side> {
        self.board.find_neutron()?;
        if let Some(side) = self.home_row_winner() {
            return Some(side);
        }
        if self.legal_actions().is_empty() {
            return Some(self.current.opponent());
        }
        None
    }

    /// 编码为神经网络输入（4 个 5x5 平面，行优先）
    ///
    /// 平面依次为：己方棋子、对方棋子、中子、阶段（移动中子时全 1）。
    /// 黑方走子时棋盘上下镜像，使双方看到的己方底线都在第 4 行。
    pub fn encode(&self) -> Vec<f32> {
        let mut tensor = vec![0.0; ENCODED_STATE_SIZE];
        let own = self.current.piece();
        let opponent = self.current.opponent().piece();

        for cell in 0..NUM_CELLS {
            let pos = match Position::from_cell(cell) {
                Some(pos) => pos,
                None => continue,
            };
            let encoded = match self.current {
                Side::White => pos,
                Side::Black => pos.flip_vertical(),
            }
            .to_cell();

            let kind = self.board.get(pos);
            if kind == own {
                tensor[encoded] = 1.0;
            } else if kind == opponent {
                tensor[NUM_CELLS + encoded] = 1.0;
            } else if kind == PieceKind::Neutron {
                tensor[2 * NUM_CELLS + encoded] = 1.0;
            }
        }

        if self.phase == Phase::MoveNeutron {
            tensor[3 * NUM_CELLS..].fill(1.0);
        }

        tensor
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.board)?;
        let side = match self.current {
            Side::Black => "Black",
            Side::White => "White",
        };
        let phase = match self.phase {
            Phase::MoveNeutron => "neutron",
            Phase::MovePiece => "piece",
        };
        write!(f, "{} to move ({})", side, phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new_unchecked(row, col)
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::initial();
        assert_eq!(state.current, Side::White);
        assert_eq!(state.phase, Phase::MoveNeutron);
        assert!(!state.is_terminal());
        assert_eq!(state.winner(), None);

        // 开局中子八个方向都能滑动
        assert_eq!(state.legal_actions().len(), 8);
    }

    #[test]
    fn test_phase_bookkeeping() {
        let state = GameState::initial();
        let after_neutron = state.apply_action(state.legal_actions()[0]).unwrap();
        assert_eq!(after_neutron.phase, Phase::MovePiece);
        assert_eq!(after_neutron.current, Side::White);

        let after_piece = after_neutron.apply_action(after_neutron.legal_actions()[0]).unwrap();
        assert_eq!(after_piece.phase, Phase::MoveNeutron);
        assert_eq!(after_piece.current, Side::Black);
    }

    #[test]
    fn test_legal_actions_are_legal() {
        let mut state = GameState::initial();
        for _ in 0..6 {
            let actions = state.legal_actions();
            assert!(!actions.is_empty());
            for &action in &actions {
                let from = action.origin();
                let to = action.destination().expect("合法动作不会越界");
                let next = state.apply_action(action).unwrap();
                assert_eq!(next.board.get(from), PieceKind::Empty);
                assert_eq!(next.board.get(to), state.board.get(from));
                // 只能滑到底：再走一步必然越界或被阻挡
                let (_, direction, _) = action.decode();
                assert!(to.step(direction).map_or(true, |p| !state.board.get(p).is_empty()));
            }
            let next = state.apply_action(*actions.last().unwrap()).unwrap();
            if next.is_terminal() {
                break;
            }
            state = next;
        }
    }

    #[test]
    fn test_off_board_action_rejected() {
        let state = GameState::initial();
        let action = Action::new(pos(0, 2).to_cell(), Direction::North, 1).unwrap();
        assert!(matches!(
            state.apply_action(action),
            Err(RuleError::IllegalAction { row: -1, col: 2, .. })
        ));
    }

    #[test]
    fn test_home_row_terminal() {
        let mut board = Board::initial();
        board = board.with_move(pos(2, 2), pos(1, 2));
        board = board.with_move(pos(0, 2), pos(1, 1));
        board = board.with_move(pos(1, 2), pos(0, 2));
        let state = GameState::new(board, Side::White, Phase::MoveNeutron);
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Some(Side::Black));

        let mut board = Board::initial();
        board = board.with_move(pos(4, 0), pos(3, 0));
        board = board.with_move(pos(2, 2), pos(4, 0));
        let state = GameState::new(board, Side::Black, Phase::MovePiece);
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Some(Side::White));
    }

    #[test]
    fn test_stuck_side_loses() {
        // 中子被完全包围，轮到黑方移动中子
        let mut board = Board::empty();
        board.set(pos(2, 2), PieceKind::Neutron);
        for (dr, dc) in [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)] {
            let p = pos(2, 2).offset(dr, dc).unwrap();
            board.set(p, if dr < 0 { PieceKind::Black } else { PieceKind::White });
        }
        let state = GameState::new(board, Side::Black, Phase::MoveNeutron);
        assert!(state.legal_actions().is_empty());
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Some(Side::White));
    }

    #[test]
    fn test_encode_planes() {
        let state = GameState::initial();
        let tensor = state.encode();
        assert_eq!(tensor.len(), ENCODED_STATE_SIZE);

        // 白方视角不翻转：白子在第 4 行
        assert!(tensor[20..25].iter().all(|&v| v == 1.0));
        assert!(tensor[25..30].iter().all(|&v| v == 1.0));
        assert_eq!(tensor[50 + 12], 1.0);
        assert!(tensor[75..100].iter().all(|&v| v == 1.0));
        assert_eq!(tensor.iter().sum::<f32>(), 5.0 + 5.0 + 1.0 + 25.0);
    }

    #[test]
    fn test_encode_is_symmetric_for_black() {
        // 初始局面上下对称，双方视角的编码应完全一致
        let white_view = GameState::new(Board::initial(), Side::White, Phase::MovePiece).encode();
        let black_view = GameState::new(Board::initial(), Side::Black, Phase::MovePiece).encode();
        assert_eq!(white_view, black_view);
        assert!(black_view[75..100].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_display() {
        let text = GameState::initial().to_string();
        assert!(text.ends_with("White to move (neutron)"));
    }
}
