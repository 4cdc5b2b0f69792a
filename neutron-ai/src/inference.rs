//! 推理接口
//!
//! 输入为 100 个浮点数（4 个 5x5 平面），输出 800 个策略 logits 和一个 [-1, 1] 的价值。
//! 策略以走子方视角给出，二号玩家（黑方）的输出需要翻转回绝对动作空间。

use protocol::{ACTION_SIZE, ENCODED_STATE_SIZE};

use crate::error::{AiError, Result};

/// 单次推理的结果
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOutput {
    /// 每个动作的 logit，长度 800
    pub policy_logits: Vec<f32>,
    /// 走子方视角的价值
    pub value: f32,
}

impl InferenceOutput {
    /// 检查输出形状和数值
    pub fn validate(&self) -> Result<()> {
        if self.policy_logits.len() != ACTION_SIZE {
            return Err(AiError::Inference(format!(
                "expected {} policy logits, got {}",
                ACTION_SIZE,
                self.policy_logits.len()
            )));
        }
        if let Some(index) = self.policy_logits.iter().position(|l| !l.is_finite()) {
            return Err(AiError::Inference(format!(
                "non-finite policy logit at {}",
                index
            )));
        }
        if !self.value.is_finite() {
            return Err(AiError::Inference(format!("non-finite value {}", self.value)));
        }
        Ok(())
    }
}

/// 推理后端
pub trait Inference: Send {
    /// 对单个编码后的局面推理
    fn infer(&self, tensor: &[f32]) -> Result<InferenceOutput>;

    /// 批量推理，默认逐个调用 `infer`
    fn infer_batch(&self, tensors: &[Vec<f32>]) -> Result<Vec<InferenceOutput>> {
        tensors.iter().map(|tensor| self.infer(tensor)).collect()
    }
}

/// 检查输入长度
pub(crate) fn check_input(tensor: &[f32]) -> Result<()> {
    if tensor.len() != ENCODED_STATE_SIZE {
        return Err(AiError::Inference(format!(
            "invalid board tensor size: expected {}, got {}",
            ENCODED_STATE_SIZE,
            tensor.len()
        )));
    }
    Ok(())
}

/// 均匀推理：所有 logits 为 0，价值为 0
///
/// 没有模型时用于测试和兜底对局。
#[derive(Debug, Clone, Default)]
pub struct UniformInference;

impl UniformInference {
    pub fn new() -> Self {
        Self
    }
}

impl Inference for UniformInference {
    fn infer(&self, tensor: &[f32]) -> Result<InferenceOutput> {
        check_input(tensor)?;
        Ok(InferenceOutput {
            policy_logits: vec![0.0; ACTION_SIZE],
            value: 0.0,
        })
    }
}
