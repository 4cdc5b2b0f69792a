//! 引擎服务
//!
//! 每个请求都在 tokio 的阻塞线程池中执行。强化学习代理全进程只有一个，
//! 首次使用时创建，由一把互斥锁保护；minimax 每次新建引擎，不共享状态。

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use neutron_ai::{AiConfig, AiEngine, AiError, JsonModelLoader, ModelLoader, NeutronAgent};
use protocol::{Board, EngineRequest, EngineResponse, FullMove, RuleError, Side};
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};

type SharedAgent = Arc<Mutex<Option<NeutronAgent>>>;

/// 引擎服务
#[derive(Clone)]
pub struct EngineService {
    agent: SharedAgent,
    loader: Arc<dyn ModelLoader + Send + Sync>,
    config: ServiceConfig,
}

impl EngineService {
    /// 使用 JSON 模型加载器
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_loader(config, Arc::new(JsonModelLoader))
    }

    pub fn with_loader(config: ServiceConfig, loader: Arc<dyn ModelLoader + Send + Sync>) -> Self {
        Self {
            agent: Arc::new(Mutex::new(None)),
            loader,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// 在阻塞线程池中运行，任务崩溃视为内部错误
    async fn run_blocking<T, F>(task: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        tokio::task::spawn_blocking(task)
            .await
            .map_err(|e| ServiceError::Internal(format!("worker failed: {}", e)))?
    }

    /// 解析线上棋盘，必须含有中子
    fn parse_board(codes: &[u8]) -> Result<Board> {
        let board = Board::from_wire(codes)?;
        board.find_neutron().ok_or(RuleError::MissingNeutron)?;
        Ok(board)
    }

    /// 经典搜索：`side` 视角，给定深度
    pub async fn minimax(&self, board: Vec<u8>, side: Side, depth: u32) -> Result<FullMove> {
        Self::run_blocking(move || {
            let board = Self::parse_board(&board)?;
            let mut engine = AiEngine::new(AiConfig::with_depth(depth));
            let result = engine.search(&board, side);
            debug!("minimax {:?} 深度 {} 节点 {}", side, depth, engine.nodes_searched());
            Ok(result)
        })
        .await
    }

    /// 加载模型（首次调用时创建代理）
    pub async fn load_model(&self, path: PathBuf) -> Result<()> {
        let agent = Arc::clone(&self.agent);
        let loader = Arc::clone(&self.loader);
        let config = self.config.clone();

        Self::run_blocking(move || {
            let mut guard = lock(&agent);
            let agent = guard.get_or_insert_with(|| new_agent(&config));
            agent.load_model(loader.as_ref(), &path)?;
            info!("模型已加载: {:?}", path);
            Ok(())
        })
        .await
    }

    /// 强化学习走子
    ///
    /// `simulations` 优先于 `difficulty`；两者都没有时用配置中的难度。
    pub async fn rl_move(
        &self,
        board: Vec<u8>,
        side: Side,
        difficulty: Option<String>,
        simulations: Option<u32>,
    ) -> Result<FullMove> {
        let agent = Arc::clone(&self.agent);
        let default_difficulty = self.config.difficulty;

        Self::run_blocking(move || {
            let board = Self::parse_board(&board)?;

            let mut guard = lock(&agent);
            let agent = guard
                .as_mut()
                .filter(|agent| agent.is_ready())
                .ok_or(AiError::AgentNotReady)?;

            match (simulations, difficulty) {
                (Some(simulations), _) => {
                    let temperature = agent.difficulty_config().temperature;
                    agent.set_simulations(simulations, temperature);
                }
                (None, Some(name)) => agent.set_difficulty_by_name(&name)?,
                (None, None) => agent.set_difficulty(default_difficulty),
            }

            Ok(agent.best_full_move(&board, side)?)
        })
        .await
    }

    /// 处理一个请求，错误转换为错误响应
    pub async fn handle(&self, request: EngineRequest) -> EngineResponse {
        let result = match request {
            EngineRequest::Minimax { board, depth, side } => {
                self.minimax(board, side, depth).await.map(EngineResponse::Move)
            }
            EngineRequest::LoadModel { path } => self
                .load_model(PathBuf::from(path))
                .await
                .map(|_| EngineResponse::ModelLoaded),
            EngineRequest::RlMove {
                board,
                side,
                difficulty,
                simulations,
            } => self
                .rl_move(board, side, difficulty, simulations)
                .await
                .map(EngineResponse::Move),
        };

        result.unwrap_or_else(|e| error_response(&e))
    }

    /// 处理一行 JSON 请求，返回一行 JSON 响应
    pub async fn handle_line(&self, line: &str) -> String {
        let response = match serde_json::from_str::<EngineRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => error_response(&ServiceError::from(e)),
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(
                r#"{{"type":"error","code":"InternalError","message":"{}"}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }
}

fn new_agent(config: &ServiceConfig) -> NeutronAgent {
    let mut agent = match config.seed {
        Some(seed) => NeutronAgent::with_seed(seed),
        None => NeutronAgent::new(),
    };
    agent.set_difficulty(config.difficulty);
    agent
}

/// 搜索树是局部的，崩溃的搜索不会破坏代理，锁中毒后直接继续使用
fn lock(agent: &SharedAgent) -> MutexGuard<'_, Option<NeutronAgent>> {
    agent.lock().unwrap_or_else(|poisoned| {
        warn!("代理锁已中毒，继续使用");
        PoisonError::into_inner(poisoned)
    })
}

fn error_response(e: &ServiceError) -> EngineResponse {
    warn!("请求失败: {}", e);
    EngineResponse::Error {
        code: e.code(),
        message: e.to_string(),
    }
}
