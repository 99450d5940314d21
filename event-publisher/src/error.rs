//! 发布器统一错误定义
//!
//! 覆盖建连、通道、声明、发布与序列化几类失败，
//! 便于调用方按阶段区分处理或仅记录日志。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PublishError {
    // --- 建连/初始化 ---
    #[error("connect error: {reason}")]
    Connect { reason: String },
    #[error("channel error: {reason}")]
    Channel { reason: String },
    #[error("declare exchange failed: exchange={exchange}, reason={reason}")]
    DeclareExchange { exchange: String, reason: String },

    // --- 单次发布 ---
    #[error("declare queue failed: queue={queue}, reason={reason}")]
    DeclareQueue { queue: String, reason: String },
    #[error("publish failed: target={target}, reason={reason}")]
    Publish { target: String, reason: String },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

/// 统一 Result 类型别名
pub type PublishResult<T> = Result<T, PublishError>;

impl PublishError {
    pub fn connect(reason: impl Into<String>) -> Self {
        Self::Connect {
            reason: reason.into(),
        }
    }

    pub fn channel(reason: impl Into<String>) -> Self {
        Self::Channel {
            reason: reason.into(),
        }
    }

    pub fn declare_exchange(exchange: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeclareExchange {
            exchange: exchange.into(),
            reason: reason.into(),
        }
    }

    pub fn declare_queue(queue: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeclareQueue {
            queue: queue.into(),
            reason: reason.into(),
        }
    }

    pub fn publish(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Publish {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// 是否属于初始化阶段（建连、开通道、声明交换机）的失败
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. } | Self::Channel { .. } | Self::DeclareExchange { .. }
        )
    }
}
