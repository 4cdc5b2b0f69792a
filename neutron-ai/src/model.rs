//! 模型加载
//!
//! `JsonModelLoader` 读取一个线性策略/价值模型：
//! 策略头 800x100 权重加偏置，价值头 100 权重加偏置后取 tanh。

use std::fs;
use std::path::Path;

use protocol::{ACTION_SIZE, ENCODED_STATE_SIZE};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AiError, Result};
use crate::inference::{check_input, Inference, InferenceOutput};

/// 模型加载器
pub trait ModelLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn Inference>>;
}

/// 线性模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// 800 行，每行 100 个权重
    pub policy_weights: Vec<Vec<f32>>,
    pub policy_bias: Vec<f32>,
    pub value_weights: Vec<f32>,
    pub value_bias: f32,
}

impl LinearModel {
    /// 全零模型（与均匀推理等价）
    pub fn zeros() -> Self {
        Self {
            policy_weights: vec![vec![0.0; ENCODED_STATE_SIZE]; ACTION_SIZE],
            policy_bias: vec![0.0; ACTION_SIZE],
            value_weights: vec![0.0; ENCODED_STATE_SIZE],
            value_bias: 0.0,
        }
    }

    /// 检查各层形状
    pub fn validate(&self) -> Result<()> {
        if self.policy_weights.len() != ACTION_SIZE {
            return Err(AiError::ModelLoad(format!(
                "policy_weights: expected {} rows, got {}",
                ACTION_SIZE,
                self.policy_weights.len()
            )));
        }
        if let Some((row, weights)) = self
            .policy_weights
            .iter()
            .enumerate()
            .find(|(_, weights)| weights.len() != ENCODED_STATE_SIZE)
        {
            return Err(AiError::ModelLoad(format!(
                "policy_weights[{}]: expected {} columns, got {}",
                row,
                ENCODED_STATE_SIZE,
                weights.len()
            )));
        }
        if self.policy_bias.len() != ACTION_SIZE {
            return Err(AiError::ModelLoad(format!(
                "policy_bias: expected {} values, got {}",
                ACTION_SIZE,
                self.policy_bias.len()
            )));
        }
        if self.value_weights.len() != ENCODED_STATE_SIZE {
            return Err(AiError::ModelLoad(format!(
                "value_weights: expected {} values, got {}",
                ENCODED_STATE_SIZE,
                self.value_weights.len()
            )));
        }
        Ok(())
    }
}

fn dot(weights: &[f32], input: &[f32]) -> f32 {
    weights.iter().zip(input).map(|(w, x)| w * x).sum()
}

impl Inference for LinearModel {
    fn infer(&self, tensor: &[f32]) -> Result<InferenceOutput> {
        check_input(tensor)?;

        let policy_logits = self
            .policy_weights
            .iter()
            .zip(&self.policy_bias)
            .map(|(weights, bias)| dot(weights, tensor) + bias)
            .collect();
        let value = (dot(&self.value_weights, tensor) + self.value_bias).tanh();

        Ok(InferenceOutput { policy_logits, value })
    }
}

/// 从 JSON 文件加载 `LinearModel`
#[derive(Debug, Clone, Default)]
pub struct JsonModelLoader;

impl ModelLoader for JsonModelLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn Inference>> {
        let json = fs::read_to_string(path)?;
        let model: LinearModel = serde_json::from_str(&json)
            .map_err(|e| AiError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        model.validate()?;
        info!("已加载模型 {}", path.display());
        Ok(Box::new(model))
    }
}
