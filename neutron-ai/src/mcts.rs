//! 蒙特卡洛树搜索（PUCT）
//!
//! 节点存放在连续的数组里，用 `NodeId` 互相引用。
//! 一个回合内中子阶段和棋子阶段属于同一走子方，
//! 因此只有父子节点走子方不同时才翻转价值的符号。

use protocol::{flip_policy, Action, GameState, Side};
use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Dirichlet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AiError, Result};
use crate::inference::Inference;

/// 节点编号（数组下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// 搜索树节点
#[derive(Debug, Clone)]
pub struct Node {
    pub state: GameState,
    /// 从父节点到达本节点的动作，根节点为 None
    pub action: Option<Action>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub prior: f32,
    pub visit_count: u32,
    /// 以本节点走子方视角累计的价值
    pub value_sum: f32,
}

impl Node {
    fn new(state: GameState, action: Option<Action>, parent: Option<NodeId>, prior: f32) -> Self {
        Self {
            state,
            action,
            parent,
            children: Vec::new(),
            prior,
            visit_count: 0,
            value_sum: 0.0,
        }
    }

    /// 平均价值，未访问时为 0
    pub fn q_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f32
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// 搜索树
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    /// 只含根节点的树
    pub fn new(state: GameState) -> Self {
        Self {
            nodes: vec![Node::new(state, None, None, 1.0)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 挂一个子节点
    pub fn add_child(
        &mut self,
        parent: NodeId,
        action: Action,
        state: GameState,
        prior: f32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(state, Some(action), Some(parent), prior));
        self.get_mut(parent).children.push(id);
        id
    }

    /// 按 PUCT 选择子节点：Q + c_puct * P * sqrt(N) / (1 + n)
    ///
    /// 子节点属于对手时 Q 取反。分数相同时取第一个。
    pub fn select_child(&self, id: NodeId, c_puct: f32) -> Option<NodeId> {
        let node = self.get(id);
        let sqrt_visits = (node.visit_count as f32).sqrt();

        let mut best: Option<(NodeId, f32)> = None;
        for &child_id in &node.children {
            let child = self.get(child_id);
            let q = if child.state.current != node.state.current {
                -child.q_value()
            } else {
                child.q_value()
            };
            let u = c_puct * child.prior * sqrt_visits / (1.0 + child.visit_count as f32);
            let score = q + u;

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// 从叶子回传价值到根
    pub fn backpropagate(&mut self, leaf: NodeId, value: f32) {
        let mut current = Some(leaf);
        let mut value = value;

        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visit_count += 1;
            node.value_sum += value;
            let player = node.state.current;
            current = node.parent;

            if let Some(parent) = current {
                if self.get(parent).state.current != player {
                    value = -value;
                }
            }
        }
    }

    /// 根节点各子节点的 (动作, 访问次数, 先验)，按动作编号升序
    pub fn root_statistics(&self) -> Vec<(Action, u32, f32)> {
        let mut stats: Vec<(Action, u32, f32)> = self
            .get(self.root())
            .children
            .iter()
            .filter_map(|&id| {
                let child = self.get(id);
                child.action.map(|action| (action, child.visit_count, child.prior))
            })
            .collect();
        stats.sort_by_key(|&(action, _, _)| action);
        stats
    }
}

/// MCTS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MctsConfig {
    pub num_simulations: u32,
    pub c_puct: f32,
    /// 0 表示贪心选择访问最多的动作
    pub temperature: f32,
    pub dirichlet_alpha: f32,
    /// 根节点噪声权重，0 表示不加噪声
    pub dirichlet_epsilon: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 800,
            c_puct: 1.5,
            temperature: 0.0,
            dirichlet_alpha: 0.3,
            dirichlet_epsilon: 0.0,
        }
    }
}

/// MCTS 搜索器
pub struct Mcts {
    config: MctsConfig,
    rng: ChaCha8Rng,
}

impl Mcts {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// 固定随机种子（温度采样和根节点噪声可复现）
    pub fn with_seed(config: MctsConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn set_num_simulations(&mut self, num_simulations: u32) {
        self.config.num_simulations = num_simulations;
    }

    pub fn set_temperature(&mut self, temperature: f32) {
        self.config.temperature = temperature;
    }

    /// 搜索并选出一个动作
    pub fn search(&mut self, state: &GameState, inference: &dyn Inference) -> Result<Action> {
        let tree = self.run(state, inference)?;
        let stats = tree.root_statistics();
        let action = self.select_action(&stats)?;
        debug!(
            "MCTS {} 次模拟, {} 个节点, 选择 {}",
            self.config.num_simulations,
            tree.len(),
            action
        );
        Ok(action)
    }

    /// 搜索并返回根节点各动作的访问概率（按动作编号升序）
    pub fn search_with_probs(
        &mut self,
        state: &GameState,
        inference: &dyn Inference,
    ) -> Result<Vec<(Action, f32)>> {
        let tree = self.run(state, inference)?;
        Ok(Self::visit_probabilities(&tree.root_statistics()))
    }

    /// 建树：展开根节点，加噪声，依次执行模拟
    fn run(&mut self, state: &GameState, inference: &dyn Inference) -> Result<SearchTree> {
        if state.is_terminal() {
            return Err(AiError::TerminalState);
        }

        let mut tree = SearchTree::new(*state);
        let root = tree.root();
        self.expand(&mut tree, root, inference)?;
        self.add_dirichlet_noise(&mut tree);

        for _ in 0..self.config.num_simulations {
            self.simulate(&mut tree, inference)?;
        }

        Ok(tree)
    }

    /// 单次模拟：选择、展开与评估、回传
    fn simulate(&mut self, tree: &mut SearchTree, inference: &dyn Inference) -> Result<()> {
        let mut id = tree.root();
        while !tree.get(id).is_leaf() && !tree.get(id).state.is_terminal() {
            match tree.select_child(id, self.config.c_puct) {
                Some(child) => id = child,
                None => break,
            }
        }

        let state = tree.get(id).state;
        let value = if state.is_terminal() {
            match state.winner() {
                Some(winner) if winner == state.current => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            }
        } else {
            self.expand(tree, id, inference)?
        };

        tree.backpropagate(id, value);
        Ok(())
    }

    /// 推理并展开节点，返回网络给出的价值
    fn expand(
        &mut self,
        tree: &mut SearchTree,
        id: NodeId,
        inference: &dyn Inference,
    ) -> Result<f32> {
        let state = tree.get(id).state;
        let output = inference.infer(&state.encode())?;
        output.validate()?;

        // 黑方的策略是镜像视角，翻回绝对动作空间
        let logits = match state.current {
            Side::White => output.policy_logits,
            Side::Black => flip_policy(&output.policy_logits),
        };

        let actions = state.legal_actions();
        if actions.is_empty() {
            return Ok(output.value);
        }

        let max_logit = actions
            .iter()
            .map(|a| logits[a.index()])
            .fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = actions
            .iter()
            .map(|a| (logits[a.index()] - max_logit).exp())
            .collect();
        let sum: f32 = exps.iter().sum();

        for (&action, exp) in actions.iter().zip(exps) {
            let child = state.apply_action(action)?;
            tree.add_child(id, action, child, exp / sum);
        }

        Ok(output.value)
    }

    /// 根节点先验混入 Dirichlet 噪声
    fn add_dirichlet_noise(&mut self, tree: &mut SearchTree) {
        let epsilon = self.config.dirichlet_epsilon;
        let children = tree.get(tree.root()).children.clone();
        if epsilon <= 0.0 || children.len() < 2 {
            return;
        }

        let alpha = vec![self.config.dirichlet_alpha as f64; children.len()];
        let dirichlet = match Dirichlet::new(&alpha) {
            Ok(dirichlet) => dirichlet,
            Err(e) => {
                warn!("Dirichlet 参数无效 (alpha={}): {}", self.config.dirichlet_alpha, e);
                return;
            }
        };

        let noise: Vec<f64> = dirichlet.sample(&mut self.rng);
        for (id, n) in children.into_iter().zip(noise) {
            let child = tree.get_mut(id);
            child.prior = (1.0 - epsilon) * child.prior + epsilon * n as f32;
        }
    }

    /// 没有任何访问时退回到先验
    fn weights(stats: &[(Action, u32, f32)]) -> Vec<f32> {
        let total: u32 = stats.iter().map(|&(_, visits, _)| visits).sum();
        if total == 0 {
            stats.iter().map(|&(_, _, prior)| prior).collect()
        } else {
            stats.iter().map(|&(_, visits, _)| visits as f32).collect()
        }
    }

    fn select_action(&mut self, stats: &[(Action, u32, f32)]) -> Result<Action> {
        let weights = Self::weights(stats);

        if self.config.temperature <= 0.0 {
            // 访问次数相同时取编号最小的动作
            let mut best: Option<(Action, f32)> = None;
            for (&(action, _, _), &weight) in stats.iter().zip(&weights) {
                if best.map_or(true, |(_, best_weight)| weight > best_weight) {
                    best = Some((action, weight));
                }
            }
            return best
                .map(|(action, _)| action)
                .ok_or(AiError::TerminalState);
        }

        // 先按最大值归一化，避免 1/T 次幂溢出
        let max = weights.iter().cloned().fold(0.0f32, f32::max);
        let exponent = 1.0 / self.config.temperature as f64;
        let scaled: Vec<f64> = weights
            .iter()
            .map(|&w| if max > 0.0 { (w as f64 / max as f64).powf(exponent) } else { 0.0 })
            .collect();

        match WeightedIndex::new(&scaled) {
            Ok(dist) => Ok(stats[dist.sample(&mut self.rng)].0),
            Err(_) => stats
                .first()
                .map(|&(action, _, _)| action)
                .ok_or(AiError::TerminalState),
        }
    }

    fn visit_probabilities(stats: &[(Action, u32, f32)]) -> Vec<(Action, f32)> {
        let weights = Self::weights(stats);
        let total: f32 = weights.iter().sum();
        stats
            .iter()
            .zip(weights)
            .map(|(&(action, _, _), w)| (action, if total > 0.0 { w / total } else { 0.0 }))
            .collect()
    }
}
