//! 走法与完整走法的生成

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::RuleError;
use crate::piece::{PieceKind, Position, Side};

/// 单步记录：棋子所在（或到达）的位置及棋子类型
///
/// 同一结构既表示"棋子当前位置"也表示"棋子目标位置"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: u8,
    pub col: u8,
    pub kind: PieceKind,
}

impl Move {
    /// 创建新记录
    pub fn new(pos: Position, kind: PieceKind) -> Self {
        Self {
            row: pos.row,
            col: pos.col,
            kind,
        }
    }

    /// 记录对应的位置
    pub fn position(&self) -> Position {
        Position::new_unchecked(self.row, self.col)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.position())
    }
}

/// 完整走法：中子起点、中子终点、己方棋子起点、己方棋子终点，外加评分
///
/// 不含任何步骤的完整走法表示叶子评估，只携带分数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFullMove")]
pub struct FullMove {
    moves: Vec<Move>,
    pub score: i32,
}

#[derive(Deserialize)]
struct RawFullMove {
    moves: Vec<Move>,
    score: i32,
}

impl TryFrom<RawFullMove> for FullMove {
    type Error = RuleError;

    fn try_from(raw: RawFullMove) -> Result<Self, Self::Error> {
        FullMove::from_moves(raw.moves, raw.score)
    }
}

impl FullMove {
    /// 创建包含四步的完整走法
    pub fn new(
        neutron_from: Position,
        neutron_to: Position,
        piece_from: Position,
        piece_to: Position,
        piece: PieceKind,
        score: i32,
    ) -> Self {
        Self {
            moves: vec![
                Move::new(neutron_from, PieceKind::Neutron),
                Move::new(neutron_to, PieceKind::Neutron),
                Move::new(piece_from, piece),
                Move::new(piece_to, piece),
            ],
            score,
        }
    }

    /// 叶子评估（没有走法，只有分数）
    pub fn leaf(score: i32) -> Self {
        Self {
            moves: Vec::new(),
            score,
        }
    }

    /// 从步骤列表创建，步骤数必须为 0 或 4
    pub fn from_moves(moves: Vec<Move>, score: i32) -> Result<Self, RuleError> {
        match moves.len() {
            0 | 4 => Ok(Self { moves, score }),
            len => Err(RuleError::MalformedFullMove { len }),
        }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// 换一个分数
    pub fn with_score(&self, score: i32) -> Self {
        Self {
            moves: self.moves.clone(),
            score,
        }
    }

    /// 中子的 (起点, 终点)
    pub fn neutron_step(&self) -> Option<(Move, Move)> {
        match self.moves.as_slice() {
            [from, to, _, _] => Some((*from, *to)),
            _ => None,
        }
    }

    /// 己方棋子的 (起点, 终点)
    pub fn piece_step(&self) -> Option<(Move, Move)> {
        match self.moves.as_slice() {
            [_, _, from, to] => Some((*from, *to)),
            _ => None,
        }
    }
}

impl std::fmt::Display for FullMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.moves.as_slice() {
            [nf, nt, pf, pt] => write!(f, "{}-{} {}-{} ({})", nf, nt, pf, pt, self.score),
            _ => write!(f, "<empty> ({})", self.score),
        }
    }
}

/// 完整走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 中子的候选落点
    ///
    /// 丢弃落在对方底线的（自杀），若有落在己方底线的则只保留第一个（直接获胜）。
    pub fn neutron_destinations(board: &Board, side: Side) -> Vec<Position> {
        let neutron = match board.find_neutron() {
            Some(pos) => pos,
            None => return Vec::new(),
        };

        let destinations: Vec<Position> = board
            .destinations(neutron)
            .into_iter()
            .filter(|pos| pos.row != side.opponent().home_row())
            .collect();

        if let Some(&winning) = destinations.iter().find(|pos| pos.row == side.home_row()) {
            return vec![winning];
        }

        destinations
    }

    /// 生成指定阵营的所有完整走法
    ///
    /// 每个中子落点在棋盘副本上展开，不修改传入的棋盘。
    pub fn full_moves(board: &Board, side: Side) -> Vec<FullMove> {
        let neutron = match board.find_neutron() {
            Some(pos) => pos,
            None => return Vec::new(),
        };
        let piece = side.piece();
        let pieces = board.pieces(piece);

        // 理论上限：8 个中子落点 × 5 枚棋子 × 8 个方向
        let mut full_moves = Vec::with_capacity(256);

        for neutron_to in Self::neutron_destinations(board, side) {
            let after_neutron = board.with_move(neutron, neutron_to);
            let before = full_moves.len();

            for &from in &pieces {
                for to in after_neutron.destinations(from) {
                    full_moves.push(FullMove::new(neutron, neutron_to, from, to, piece, 0));
                }
            }

            // 中子已到己方底线但棋子动弹不得：胜着不能丢，棋子原地不动
            if full_moves.len() == before && neutron_to.row == side.home_row() {
                if let Some(&from) = pieces.first() {
                    full_moves.push(FullMove::new(neutron, neutron_to, from, from, piece, 0));
                }
            }
        }

        full_moves
    }
}
