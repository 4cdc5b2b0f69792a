//! 棋盘状态
//!
//! `Board` 是不可变的值类型：所有走子都返回新棋盘，
//! 两种外部表示（列优先线上编码、行优先强化学习编码）只在边界处转换。

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, NEUTRON_START_CELL, NUM_CELLS};
use crate::error::RuleError;
use crate::moves::FullMove;
use crate::piece::{Direction, PieceKind, Position};

/// 棋盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// 5x5 棋盘，行优先，索引为 row * 5 + col
    cells: [PieceKind; NUM_CELLS],
}

impl Board {
    /// 创建空棋盘（没有中子，只用于摆局）
    pub fn empty() -> Self {
        Self {
            cells: [PieceKind::Empty; NUM_CELLS],
        }
    }

    /// 创建初始棋盘：黑子在第 0 行，白子在第 4 行，中子居中
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for col in 0..BOARD_SIZE as u8 {
            board.set(Position::new_unchecked(0, col), PieceKind::Black);
            board.set(Position::new_unchecked(4, col), PieceKind::White);
        }
        board.cells[NEUTRON_START_CELL] = PieceKind::Neutron;
        board
    }

    /// 从列优先线上编码解析（`index = col * 5 + row`，1-4，5-8 视为选中变体）
    pub fn from_wire(codes: &[u8]) -> Result<Self, RuleError> {
        if codes.len() != NUM_CELLS {
            return Err(RuleError::InvalidBoardLength {
                len: codes.len(),
                expected: NUM_CELLS,
            });
        }

        let mut board = Self::empty();
        for (index, &code) in codes.iter().enumerate() {
            if code > 4 {
                tracing::trace!("归一化选中格子编码 {} (索引 {})", code, index);
            }
            let pos = Position::from_wire_index(index).ok_or(RuleError::InvalidBoardLength {
                len: codes.len(),
                expected: NUM_CELLS,
            })?;
            board.set(pos, PieceKind::from_code(code)?);
        }
        Ok(board)
    }

    /// 转换为列优先线上编码
    pub fn to_wire(&self) -> [u8; NUM_CELLS] {
        let mut codes = [PieceKind::Empty.code(); NUM_CELLS];
        for (cell, kind) in self.cells.iter().enumerate() {
            let pos = Position::new_unchecked((cell / BOARD_SIZE) as u8, (cell % BOARD_SIZE) as u8);
            codes[pos.to_wire_index()] = kind.code();
        }
        codes
    }

    /// 从行优先强化学习编码解析（0=空 1=白 2=黑 3=中子）
    pub fn from_rl_cells(cells: &[i8; NUM_CELLS]) -> Result<Self, RuleError> {
        let mut board = Self::empty();
        for (cell, &code) in cells.iter().enumerate() {
            board.cells[cell] = PieceKind::from_rl_code(code)?;
        }
        Ok(board)
    }

    /// 转换为行优先强化学习编码
    pub fn to_rl_cells(&self) -> [i8; NUM_CELLS] {
        let mut cells = [0i8; NUM_CELLS];
        for (cell, kind) in self.cells.iter().enumerate() {
            cells[cell] = kind.rl_code();
        }
        cells
    }

    /// 获取指定位置的内容（越界视为空）
    pub fn get(&self, pos: Position) -> PieceKind {
        if pos.is_valid() {
            self.cells[pos.to_cell()]
        } else {
            PieceKind::Empty
        }
    }

    /// 按行优先格子编号获取内容
    pub fn get_cell(&self, cell: usize) -> PieceKind {
        self.cells.get(cell).copied().unwrap_or(PieceKind::Empty)
    }

    /// 设置指定位置的内容
    pub fn set(&mut self, pos: Position, kind: PieceKind) {
        if pos.is_valid() {
            self.cells[pos.to_cell()] = kind;
        }
    }

    /// 返回移动棋子后的新棋盘（不检查规则）
    ///
    /// 起点与终点相同时棋盘不变。
    pub fn with_move(&self, from: Position, to: Position) -> Board {
        let mut next = *self;
        if from != to {
            let piece = self.get(from);
            next.set(to, piece);
            next.set(from, PieceKind::Empty);
        }
        next
    }

    /// 返回执行完整走法后的新棋盘
    pub fn apply_full_move(&self, full_move: &FullMove) -> Board {
        match full_move.moves() {
            [neutron_from, neutron_to, piece_from, piece_to] => self
                .with_move(neutron_from.position(), neutron_to.position())
                .with_move(piece_from.position(), piece_to.position()),
            _ => *self,
        }
    }

    /// 查找中子位置
    pub fn find_neutron(&self) -> Option<Position> {
        self.cells
            .iter()
            .position(|&kind| kind == PieceKind::Neutron)
            .and_then(Position::from_cell)
    }

    /// 获取指定类型的所有棋子位置
    ///
    /// 按列优先线上顺序返回，完整走法的生成顺序依赖这一点。
    pub fn pieces(&self, kind: PieceKind) -> Vec<Position> {
        (0..NUM_CELLS)
            .filter_map(Position::from_wire_index)
            .filter(|&pos| self.get(pos) == kind)
            .collect()
    }

    /// 沿方向滑动的最大距离（0 表示紧邻即被阻挡）
    pub fn slide_distance(&self, from: Position, direction: Direction) -> u8 {
        let mut distance = 0;
        let mut current = from;
        while let Some(next) = current.step(direction) {
            if !self.get(next).is_empty() {
                break;
            }
            distance += 1;
            current = next;
        }
        distance
    }

    /// 沿方向滑到底的终点，无法移动时返回 None
    pub fn slide_end(&self, from: Position, direction: Direction) -> Option<Position> {
        let distance = self.slide_distance(from, direction) as i8;
        if distance == 0 {
            return None;
        }
        let (d_row, d_col) = direction.delta();
        from.offset(d_row * distance, d_col * distance)
    }

    /// 指定棋子的所有落点（每个方向一个，按扫描顺序）
    pub fn destinations(&self, from: Position) -> Vec<Position> {
        Direction::SCAN_ORDER
            .iter()
            .filter_map(|&direction| self.slide_end(from, direction))
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  a b c d e")?;
        for row in 0..BOARD_SIZE as u8 {
            write!(f, "{} ", BOARD_SIZE as u8 - row)?;
            for col in 0..BOARD_SIZE as u8 {
                write!(f, "{} ", self.get(Position::new_unchecked(row, col)).display_char())?;
            }
            if row + 1 < BOARD_SIZE as u8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board() {
        let board = Board::initial();

        assert_eq!(board.get(Position::new_unchecked(0, 3)), PieceKind::Black);
        assert_eq!(board.get(Position::new_unchecked(4, 1)), PieceKind::White);
        assert_eq!(board.get(Position::new_unchecked(2, 2)), PieceKind::Neutron);
        assert_eq!(board.get(Position::new_unchecked(1, 1)), PieceKind::Empty);
        assert_eq!(board.pieces(PieceKind::Black).len(), 5);
        assert_eq!(board.pieces(PieceKind::White).len(), 5);
    }

    #[test]
    fn test_wire_layout() {
        let wire = Board::initial().to_wire();
        // 列优先：每列依次为 黑 空 空 空 白，中间列第 2 行为中子
        assert_eq!(&wire[0..5], &[1, 4, 4, 4, 2]);
        assert_eq!(&wire[10..15], &[1, 4, 3, 4, 2]);
        assert_eq!(wire[12], 3);
    }

    #[test]
    fn test_wire_round_trip() {
        let board = Board::initial()
            .with_move(Position::new_unchecked(2, 2), Position::new_unchecked(1, 3))
            .with_move(Position::new_unchecked(4, 0), Position::new_unchecked(1, 0));
        let decoded = Board::from_wire(&board.to_wire()).unwrap();
        assert_eq!(decoded, board);
    }

    #[test]
    fn test_rl_round_trip() {
        let board = Board::initial()
            .with_move(Position::new_unchecked(0, 4), Position::new_unchecked(3, 1));
        let cells = board.to_rl_cells();
        assert_eq!(Board::from_rl_cells(&cells).unwrap(), board);

        // 行优先：第 0 行是黑子（RL 编码 2），第 4 行是白子（RL 编码 1）
        let initial = Board::initial().to_rl_cells();
        assert_eq!(&initial[0..5], &[2, 2, 2, 2, 2]);
        assert_eq!(&initial[20..25], &[1, 1, 1, 1, 1]);
        assert_eq!(initial[12], 3);
    }

    #[test]
    fn test_wire_and_rl_agree() {
        let board = Board::initial()
            .with_move(Position::new_unchecked(2, 2), Position::new_unchecked(2, 4));
        let wire = board.to_wire();
        let rl = board.to_rl_cells();
        for cell in 0..NUM_CELLS {
            let pos = Position::from_cell(cell).unwrap();
            let from_wire = PieceKind::from_code(wire[pos.to_wire_index()]).unwrap();
            let from_rl = PieceKind::from_rl_code(rl[cell]).unwrap();
            assert_eq!(from_wire, from_rl, "格子 {} 不一致", cell);
        }
    }

    #[test]
    fn test_from_wire_errors() {
        assert_eq!(
            Board::from_wire(&[4; 24]),
            Err(RuleError::InvalidBoardLength { len: 24, expected: 25 })
        );
        let mut codes = Board::initial().to_wire();
        codes[7] = 0;
        assert_eq!(Board::from_wire(&codes), Err(RuleError::InvalidPieceCode { code: 0 }));
    }

    #[test]
    fn test_from_wire_selection_variants() {
        let mut codes = Board::initial().to_wire();
        codes[0] = 5;
        codes[12] = 8;
        codes[1] = 7;
        assert_eq!(Board::from_wire(&codes).unwrap(), Board::initial());
    }

    #[test]
    fn test_with_move_is_copy() {
        let board = Board::initial();
        let from = Position::new_unchecked(2, 2);
        let to = Position::new_unchecked(1, 2);
        let moved = board.with_move(from, to);

        assert_eq!(board.get(from), PieceKind::Neutron);
        assert_eq!(moved.get(from), PieceKind::Empty);
        assert_eq!(moved.get(to), PieceKind::Neutron);

        // 原地不动
        assert_eq!(board.with_move(from, from), board);
    }

    #[test]
    fn test_slide_stops_before_piece() {
        let board = Board::initial();
        let center = Position::new_unchecked(2, 2);

        assert_eq!(board.slide_distance(center, Direction::North), 1);
        assert_eq!(board.slide_end(center, Direction::North), Some(Position::new_unchecked(1, 2)));
        assert_eq!(board.slide_distance(center, Direction::East), 2);
        assert_eq!(board.slide_end(center, Direction::East), Some(Position::new_unchecked(2, 4)));

        // 黑子向北紧贴边界
        assert_eq!(board.slide_end(Position::new_unchecked(0, 0), Direction::North), None);
    }

    #[test]
    fn test_opening_neutron_destinations() {
        let board = Board::initial();
        let neutron = board.find_neutron().unwrap();
        let destinations = board.destinations(neutron);

        // 开局中子八个方向都畅通，每个方向恰好一个落点
        assert_eq!(destinations.len(), 8);
        assert!(destinations.iter().all(|pos| pos.row != 0 && pos.row != 4));
        assert_eq!(destinations[0], Position::new_unchecked(1, 2));
        assert_eq!(destinations[1], Position::new_unchecked(3, 2));
    }

    #[test]
    fn test_display() {
        let text = Board::initial().to_string();
        assert!(text.starts_with("  a b c d e\n5 B B B B B"));
        assert!(text.contains("3 . . N . ."));
    }
}
