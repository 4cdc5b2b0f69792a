//! 协议常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 5;

/// 棋盘格子数
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// 滑动方向数
pub const NUM_DIRECTIONS: usize = 8;

/// 单步最大滑动距离
pub const MAX_DISTANCE: usize = BOARD_SIZE - 1;

/// 动作空间大小（25 格 × 8 方向 × 4 距离）
pub const ACTION_SIZE: usize = NUM_CELLS * NUM_DIRECTIONS * MAX_DISTANCE;

/// 神经网络输入平面数（己方 / 对方 / 中子 / 阶段）
pub const INPUT_PLANES: usize = 4;

/// 神经网络输入长度
pub const ENCODED_STATE_SIZE: usize = INPUT_PLANES * NUM_CELLS;

/// 中子初始所在格（行优先索引，棋盘中心）
pub const NEUTRON_START_CELL: usize = 12;
