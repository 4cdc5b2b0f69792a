//! 动作编码
//!
//! 动作 = (起始格, 方向, 距离)，编码为 `cell * 32 + direction * 4 + (distance - 1)`，
//! 取值范围 [0, 800)。

use serde::{Deserialize, Serialize};

use crate::constants::{ACTION_SIZE, MAX_DISTANCE, NUM_CELLS, NUM_DIRECTIONS};
use crate::error::RuleError;
use crate::piece::{Direction, Position};

/// 动作编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub struct Action(u16);

impl Action {
    /// 由 (格子, 方向, 距离) 编码
    pub fn new(cell: usize, direction: Direction, distance: u8) -> Result<Self, RuleError> {
        if cell >= NUM_CELLS || distance == 0 || distance as usize > MAX_DISTANCE {
            return Err(RuleError::InvalidActionIndex {
                index: cell * NUM_DIRECTIONS * MAX_DISTANCE
                    + direction.index() * MAX_DISTANCE
                    + (distance as usize).saturating_sub(1),
                max: ACTION_SIZE,
            });
        }
        let index = cell * NUM_DIRECTIONS * MAX_DISTANCE
            + direction.index() * MAX_DISTANCE
            + (distance as usize - 1);
        Ok(Action(index as u16))
    }

    /// 从编号创建
    pub fn from_index(index: usize) -> Result<Self, RuleError> {
        if index < ACTION_SIZE {
            Ok(Action(index as u16))
        } else {
            Err(RuleError::InvalidActionIndex {
                index,
                max: ACTION_SIZE,
            })
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// 解码为 (格子, 方向, 距离)
    pub fn decode(self) -> (usize, Direction, u8) {
        let index = self.index();
        let cell = index / (NUM_DIRECTIONS * MAX_DISTANCE);
        let remainder = index % (NUM_DIRECTIONS * MAX_DISTANCE);
        let direction = Direction::ALL[remainder / MAX_DISTANCE];
        let distance = (remainder % MAX_DISTANCE) as u8 + 1;
        (cell, direction, distance)
    }

    /// 起始位置
    pub fn origin(self) -> Position {
        let (cell, _, _) = self.decode();
        Position::from_cell(cell).unwrap_or(Position::new_unchecked(0, 0))
    }

    /// 目标位置，越出棋盘时返回 None
    pub fn destination(self) -> Option<Position> {
        let (_, direction, distance) = self.decode();
        let (d_row, d_col) = direction.delta();
        let distance = distance as i8;
        self.origin().offset(d_row * distance, d_col * distance)
    }

    /// (起点, 终点)，终点越界时返回 `IllegalAction`
    pub fn endpoints(self) -> Result<(Position, Position), RuleError> {
        let from = self.origin();
        let to = self.destination().ok_or_else(|| {
            let (_, direction, distance) = self.decode();
            let (d_row, d_col) = direction.delta();
            RuleError::IllegalAction {
                action: self.0,
                row: from.row as i8 + d_row * distance as i8,
                col: from.col as i8 + d_col * distance as i8,
            }
        })?;
        Ok((from, to))
    }

    /// 上下翻转（二号玩家视角）
    pub fn flip(self) -> Action {
        let (_, direction, distance) = self.decode();
        let flipped_cell = self.origin().flip_vertical().to_cell();
        let index = flipped_cell * NUM_DIRECTIONS * MAX_DISTANCE
            + direction.flip_vertical().index() * MAX_DISTANCE
            + (distance as usize - 1);
        Action(index as u16)
    }
}

impl From<Action> for u16 {
    fn from(action: Action) -> u16 {
        action.0
    }
}

impl TryFrom<u16> for Action {
    type Error = RuleError;

    fn try_from(index: u16) -> Result<Self, Self::Error> {
        Action::from_index(index as usize)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (_, direction, distance) = self.decode();
        write!(f, "#{} {}->{:?}x{}", self.0, self.origin(), direction, distance)
    }
}

/// 翻转整条策略向量：`flipped[flip(a)] = policy[a]`
///
/// 长度不足 800 的部分按 0 处理。
pub fn flip_policy(policy: &[f32]) -> Vec<f32> {
    let mut flipped = vec![0.0; ACTION_SIZE];
    for (index, &value) in policy.iter().enumerate().take(ACTION_SIZE) {
        flipped[Action(index as u16).flip().index()] = value;
    }
    flipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_all_triples() {
        for cell in 0..NUM_CELLS {
            for direction in Direction::ALL {
                for distance in 1..=MAX_DISTANCE as u8 {
                    let action = Action::new(cell, direction, distance).unwrap();
                    assert_eq!(action.decode(), (cell, direction, distance));
                    assert_eq!(
                        action.index(),
                        cell * 32 + direction.index() * 4 + (distance as usize - 1)
                    );
                }
            }
        }
    }

    #[test]
    fn test_invalid_actions() {
        assert!(Action::new(25, Direction::North, 1).is_err());
        assert!(Action::new(0, Direction::North, 0).is_err());
        assert!(Action::new(0, Direction::North, 5).is_err());
        assert!(Action::from_index(800).is_err());
        assert!(Action::from_index(799).is_ok());
    }

    #[test]
    fn test_flip_is_involution() {
        for index in 0..ACTION_SIZE {
            let action = Action::from_index(index).unwrap();
            assert_eq!(action.flip().flip(), action);
        }
    }

    #[test]
    fn test_flip_mirrors_geometry() {
        // (row 3, col 1) 向北 2 格 -> (row 1, col 1) 向南 2 格
        let action = Action::new(16, Direction::North, 2).unwrap();
        let flipped = action.flip();
        assert_eq!(flipped.decode(), (6, Direction::South, 2));
        assert_eq!(
            flipped.destination().map(|p| p.flip_vertical()),
            action.destination()
        );
    }

    #[test]
    fn test_flip_policy_is_involution() {
        let policy: Vec<f32> = (0..ACTION_SIZE).map(|i| i as f32 * 0.5).collect();
        let flipped = flip_policy(&policy);
        assert_ne!(flipped, policy);
        assert_eq!(flip_policy(&flipped), policy);

        let action = Action::new(3, Direction::SouthWest, 1).unwrap();
        assert_eq!(flipped[action.flip().index()], policy[action.index()]);
    }

    #[test]
    fn test_destination_off_board() {
        // 第 0 行向北一定越界
        let action = Action::new(2, Direction::North, 1).unwrap();
        assert_eq!(action.destination(), None);
        assert!(matches!(
            action.endpoints(),
            Err(RuleError::IllegalAction { row: -1, col: 2, .. })
        ));
        let action = Action::new(12, Direction::East, 2).unwrap();
        assert_eq!(action.destination(), Some(Position::new_unchecked(2, 4)));
        assert_eq!(
            action.endpoints(),
            Ok((Position::new_unchecked(2, 2), Position::new_unchecked(2, 4)))
        );
    }

    #[test]
    fn test_serde_as_integer() {
        let action = Action::from_index(417).unwrap();
        assert_eq!(serde_json::to_string(&action).unwrap(), "417");
        assert_eq!(serde_json::from_str::<Action>("417").unwrap(), action);
        assert!(serde_json::from_str::<Action>("800").is_err());
    }
}
