//! 棋子、阵营、位置与方向定义

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, NUM_CELLS};
use crate::error::RuleError;

/// 棋子类型（格子内容）
///
/// 判别值即线上编码：1=黑子 2=白子 3=中子 4=空格。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum PieceKind {
    /// 黑子
    Black = 1,
    /// 白子
    White = 2,
    /// 中子（双方共用）
    Neutron = 3,
    /// 空格
    Empty = 4,
}

impl PieceKind {
    /// 线上编码
    pub fn code(self) -> u8 {
        self as u8
    }

    /// 从线上编码解析
    ///
    /// 5-8 是界面层的"选中"变体，这里归一化为对应的基础类型。
    pub fn from_code(code: u8) -> Result<Self, RuleError> {
        match code {
            1 | 5 => Ok(PieceKind::Black),
            2 | 6 => Ok(PieceKind::White),
            3 | 8 => Ok(PieceKind::Neutron),
            4 | 7 => Ok(PieceKind::Empty),
            _ => Err(RuleError::InvalidPieceCode { code: code as i16 }),
        }
    }

    /// 强化学习表示的编码：0=空 1=白(一号玩家) 2=黑(二号玩家) 3=中子
    pub fn rl_code(self) -> i8 {
        match self {
            PieceKind::Empty => 0,
            PieceKind::White => 1,
            PieceKind::Black => 2,
            PieceKind::Neutron => 3,
        }
    }

    /// 从强化学习编码解析
    pub fn from_rl_code(code: i8) -> Result<Self, RuleError> {
        match code {
            0 => Ok(PieceKind::Empty),
            1 => Ok(PieceKind::White),
            2 => Ok(PieceKind::Black),
            3 => Ok(PieceKind::Neutron),
            _ => Err(RuleError::InvalidPieceCode { code: code as i16 }),
        }
    }

    pub fn is_empty(self) -> bool {
        self == PieceKind::Empty
    }

    /// 棋子所属阵营（中子和空格没有阵营）
    pub fn side(self) -> Option<Side> {
        match self {
            PieceKind::Black => Some(Side::Black),
            PieceKind::White => Some(Side::White),
            _ => None,
        }
    }

    /// 显示字符
    pub fn display_char(self) -> char {
        match self {
            PieceKind::Black => 'B',
            PieceKind::White => 'W',
            PieceKind::Neutron => 'N',
            PieceKind::Empty => '.',
        }
    }
}

impl From<PieceKind> for u8 {
    fn from(kind: PieceKind) -> u8 {
        kind.code()
    }
}

impl TryFrom<u8> for PieceKind {
    type Error = RuleError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PieceKind::from_code(code)
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 黑方（底线为第 0 行）
    #[default]
    Black,
    /// 白方（底线为第 4 行）
    White,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// 己方底线：中子到达此行即获胜
    pub fn home_row(&self) -> u8 {
        match self {
            Side::Black => 0,
            Side::White => (BOARD_SIZE - 1) as u8,
        }
    }

    /// 己方棋子
    pub fn piece(&self) -> PieceKind {
        match self {
            Side::Black => PieceKind::Black,
            Side::White => PieceKind::White,
        }
    }

    /// 强化学习表示中的玩家编号（白=1，黑=2）
    pub fn player_number(&self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 2,
        }
    }

    /// 从玩家编号解析
    pub fn from_player_number(n: u8) -> Option<Side> {
        match n {
            1 => Some(Side::White),
            2 => Some(Side::Black),
            _ => None,
        }
    }
}

/// 滑动方向
///
/// 判别值即罗盘序号，动作编码依赖这个顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    /// 罗盘顺序
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// 完整走法生成器的扫描顺序（先正交，后斜向）
    pub const SCAN_ORDER: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// 罗盘序号
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Direction> {
        Self::ALL.get(index).copied()
    }

    /// 行列增量 (d_row, d_col)，北为行号减小
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// 上下翻转：北↔南，东北↔东南，西北↔西南，东西不变
    pub fn flip_vertical(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthEast,
            Direction::East => Direction::East,
            Direction::SouthEast => Direction::NorthEast,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthWest,
            Direction::West => Direction::West,
            Direction::NorthWest => Direction::SouthWest,
        }
    }
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 行 (0-4)，第 0 行为黑方底线
    pub row: u8,
    /// 列 (0-4)
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// 获取偏移后的位置
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if row >= 0 && (row as usize) < BOARD_SIZE && col >= 0 && (col as usize) < BOARD_SIZE {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 沿方向走一格
    pub fn step(&self, direction: Direction) -> Option<Position> {
        let (d_row, d_col) = direction.delta();
        self.offset(d_row, d_col)
    }

    /// 行优先格子编号（动作编码、张量编码使用）
    pub fn to_cell(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从行优先格子编号转换
    pub fn from_cell(cell: usize) -> Option<Self> {
        if cell < NUM_CELLS {
            Some(Position {
                row: (cell / BOARD_SIZE) as u8,
                col: (cell % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 列优先线上索引（`col * 5 + row`）
    pub fn to_wire_index(&self) -> usize {
        self.col as usize * BOARD_SIZE + self.row as usize
    }

    /// 从列优先线上索引转换
    pub fn from_wire_index(index: usize) -> Option<Self> {
        if index < NUM_CELLS {
            Some(Position {
                row: (index % BOARD_SIZE) as u8,
                col: (index / BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 上下镜像
    pub fn flip_vertical(&self) -> Position {
        Position {
            row: (BOARD_SIZE - 1) as u8 - self.row,
            col: self.col,
        }
    }
}

impl std::fmt::Display for Position {
    /// 代数记号：列 a-e，行号自下而上 1-5
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (b'a' + self.col) as char;
        write!(f, "{}{}", file, BOARD_SIZE as u8 - self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_codes() {
        assert_eq!(PieceKind::from_code(1), Ok(PieceKind::Black));
        assert_eq!(PieceKind::from_code(4), Ok(PieceKind::Empty));
        assert_eq!(PieceKind::Neutron.code(), 3);

        // 选中变体归一化
        assert_eq!(PieceKind::from_code(5), Ok(PieceKind::Black));
        assert_eq!(PieceKind::from_code(6), Ok(PieceKind::White));
        assert_eq!(PieceKind::from_code(7), Ok(PieceKind::Empty));
        assert_eq!(PieceKind::from_code(8), Ok(PieceKind::Neutron));

        assert!(PieceKind::from_code(0).is_err());
        assert!(PieceKind::from_code(9).is_err());
    }

    #[test]
    fn test_rl_codes() {
        for kind in [PieceKind::Black, PieceKind::White, PieceKind::Neutron, PieceKind::Empty] {
            assert_eq!(PieceKind::from_rl_code(kind.rl_code()), Ok(kind));
        }
        assert_eq!(PieceKind::White.rl_code(), 1);
        assert_eq!(PieceKind::Black.rl_code(), 2);
        assert!(PieceKind::from_rl_code(4).is_err());
    }

    #[test]
    fn test_side() {
        assert_eq!(Side::Black.opponent(), Side::White);
        assert_eq!(Side::White.opponent(), Side::Black);
        assert_eq!(Side::Black.home_row(), 0);
        assert_eq!(Side::White.home_row(), 4);
        assert_eq!(Side::from_player_number(Side::Black.player_number()), Some(Side::Black));
        assert_eq!(Side::from_player_number(3), None);
    }

    #[test]
    fn test_direction_flip() {
        for dir in Direction::ALL {
            assert_eq!(dir.flip_vertical().flip_vertical(), dir);
            let (dr, dc) = dir.delta();
            let (fr, fc) = dir.flip_vertical().delta();
            assert_eq!((fr, fc), (-dr, dc));
        }
        assert_eq!(Direction::from_index(4), Some(Direction::South));
        assert_eq!(Direction::from_index(8), None);
    }

    #[test]
    fn test_position_indices() {
        let pos = Position::new(1, 3).unwrap();
        assert_eq!(pos.to_cell(), 8);
        assert_eq!(pos.to_wire_index(), 16);
        assert_eq!(Position::from_cell(8), Some(pos));
        assert_eq!(Position::from_wire_index(16), Some(pos));
        assert!(Position::new(5, 0).is_none());
        assert!(Position::from_cell(25).is_none());
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new_unchecked(0, 0).to_string(), "a5");
        assert_eq!(Position::new_unchecked(4, 4).to_string(), "e1");
        assert_eq!(Position::new_unchecked(2, 2).to_string(), "c3");
    }

    #[test]
    fn test_step_off_board() {
        let corner = Position::new_unchecked(0, 0);
        assert!(corner.step(Direction::North).is_none());
        assert!(corner.step(Direction::West).is_none());
        assert_eq!(corner.step(Direction::SouthEast), Some(Position::new_unchecked(1, 1)));
    }
}
