//! 搜索引擎
//!
//! 实现 Minimax + Alpha-Beta 剪枝，搜索对象是完整走法（中子一步 + 己方棋子一步）。
//! 所有分数都以根节点走子方的视角计算。

use protocol::{Board, FullMove, MoveGenerator, Side};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluate::Evaluator;

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub max_depth: u32,
}

impl AiConfig {
    /// 指定搜索深度（宿主在每次请求中传入）
    pub fn with_depth(depth: u32) -> Self {
        Self { max_depth: depth }
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            nodes_searched: 0,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 搜索 `side` 的最佳完整走法
    ///
    /// 根节点窗口为整个 i32 范围。没有可走的完整走法或已是终局时，
    /// 返回不含步骤的叶子评估。
    pub fn search(&mut self, board: &Board, side: Side) -> FullMove {
        self.nodes_searched = 0;
        let result = self.max_value(board, self.config.max_depth, i32::MIN, i32::MAX, side, side);
        debug!(
            "minimax 深度 {} 搜索 {} 个节点, 结果 {}",
            self.config.max_depth, self.nodes_searched, result
        );
        result
    }

    /// 极大层：`player` 就是根节点走子方
    fn max_value(
        &mut self,
        board: &Board,
        depth: u32,
        alpha: i32,
        beta: i32,
        player: Side,
        root: Side,
    ) -> FullMove {
        self.nodes_searched += 1;

        if let Some(leaf) = Self::leaf(board, depth, root) {
            return leaf;
        }

        let full_moves = MoveGenerator::full_moves(board, player);
        if full_moves.is_empty() {
            // 无路可走即告负
            return FullMove::leaf(Evaluator::LOSS_SCORE);
        }

        let mut best: Option<&FullMove> = None;
        let mut best_score = alpha;

        for full_move in &full_moves {
            let next = board.apply_full_move(full_move);
            let reply = self.min_value(&next, depth - 1, best_score, beta, player.opponent(), root);

            if reply.score > best_score {
                best_score = reply.score;
                best = Some(full_move);
            }

            // Beta 剪枝
            if best_score >= beta {
                return full_move.with_score(beta);
            }
        }

        match best {
            Some(full_move) => full_move.with_score(best_score),
            None => Self::fallback(board, &full_moves, root, true).with_score(best_score),
        }
    }

    /// 极小层：`player` 是根节点走子方的对手
    fn min_value(
        &mut self,
        board: &Board,
        depth: u32,
        alpha: i32,
        beta: i32,
        player: Side,
        root: Side,
    ) -> FullMove {
        self.nodes_searched += 1;

        if let Some(leaf) = Self::leaf(board, depth, root) {
            return leaf;
        }

        let full_moves = MoveGenerator::full_moves(board, player);
        if full_moves.is_empty() {
            return FullMove::leaf(Evaluator::WIN_SCORE);
        }

        let mut best: Option<&FullMove> = None;
        let mut best_score = beta;

        for full_move in &full_moves {
            let next = board.apply_full_move(full_move);
            let reply =
                self.max_value(&next, depth - 1, alpha, best_score, player.opponent(), root);

            if reply.score < best_score {
                best_score = reply.score;
                best = Some(full_move);
            }

            // Alpha 剪枝
            if alpha >= best_score {
                return full_move.with_score(alpha);
            }
        }

        match best {
            Some(full_move) => full_move.with_score(best_score),
            None => Self::fallback(board, &full_moves, root, false).with_score(best_score),
        }
    }

    /// 深度耗尽或中子已到底线时的叶子评估
    fn leaf(board: &Board, depth: u32, root: Side) -> Option<FullMove> {
        let on_home_row = board
            .find_neutron()
            .map_or(true, |pos| {
                pos.row == Side::Black.home_row() || pos.row == Side::White.home_row()
            });

        if depth == 0 || on_home_row {
            Some(FullMove::leaf(Evaluator::evaluate(board, root)))
        } else {
            None
        }
    }

    /// 没有子节点能改善窗口时，按一层静态评估挑一个走法
    ///
    /// 只决定附带的走法，分数仍沿用窗口边界。
    fn fallback(board: &Board, full_moves: &[FullMove], root: Side, maximize: bool) -> FullMove {
        // 并列时取第一个
        let mut chosen: Option<(&FullMove, i32)> = None;
        for full_move in full_moves {
            let score = Evaluator::evaluate(&board.apply_full_move(full_move), root);
            let better = match chosen {
                None => true,
                Some((_, best)) if maximize => score > best,
                Some((_, best)) => score < best,
            };
            if better {
                chosen = Some((full_move, score));
            }
        }

        match chosen {
            Some((full_move, score)) => full_move.with_score(score),
            None => FullMove::leaf(Evaluator::evaluate(board, root)),
        }
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}
