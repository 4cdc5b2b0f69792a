//! 棋局评估函数
//!
//! 只看中子：已到底线直接判定胜负，否则按中子下一步能滑到哪条底线计分。

use protocol::{Board, Side};

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 中子已在己方底线
    pub const WIN_SCORE: i32 = i16::MAX as i32;
    /// 中子已在对方底线
    pub const LOSS_SCORE: i32 = i16::MIN as i32;
    /// 中子每个能滑到对方底线的落点
    pub const THREAT_PENALTY: i32 = -5000;
    /// 中子每个能滑到己方底线的落点
    pub const CHANCE_BONUS: i32 = 1000;

    /// 评估棋局（`side` 视角，正值对 `side` 有利）
    pub fn evaluate(board: &Board, side: Side) -> i32 {
        let neutron = match board.find_neutron() {
            Some(pos) => pos,
            None => return 0,
        };

        let own_row = side.home_row();
        let opponent_row = side.opponent().home_row();

        if neutron.row == opponent_row {
            return Self::LOSS_SCORE;
        }
        if neutron.row == own_row {
            return Self::WIN_SCORE;
        }

        board
            .destinations(neutron)
            .into_iter()
            .map(|pos| {
                if pos.row == opponent_row {
                    Self::THREAT_PENALTY
                } else if pos.row == own_row {
                    Self::CHANCE_BONUS
                } else {
                    0
                }
            })
            .sum()
    }
}
