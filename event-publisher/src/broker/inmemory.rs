//! 内存版消息代理（InMemoryBroker）
//!
//! 按调用顺序记录每一次声明与发布，满足 `BrokerConnector` 与 `BrokerChannel`：
//! - `open`：返回共享同一份记录的通道；
//! - `ops` / `published`：读取记录，便于断言。
//!
//! 典型用途：测试环境、示例与本地开发。
//!
use super::{BrokerChannel, BrokerConnector};
use crate::config::ExchangeKind;
use crate::error::PublishResult as Result;
use crate::message::OutboundMessage;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrokerOp {
    Open {
        url: String,
    },
    DeclareExchange {
        name: String,
        kind: ExchangeKind,
    },
    DeclareQueue {
        name: String,
    },
    Publish {
        exchange: String,
        routing_key: String,
        message: OutboundMessage,
    },
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryBroker {
    ops: Arc<Mutex<Vec<BrokerOp>>>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<BrokerOp>> {
        // 记录仅追加，锁中毒时沿用已有数据
        self.ops.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: BrokerOp) {
        self.log().push(op);
    }

    /// 全部操作记录的快照
    pub fn ops(&self) -> Vec<BrokerOp> {
        self.log().clone()
    }

    /// 已发布的 (exchange, routing_key, message)
    pub fn published(&self) -> Vec<(String, String, OutboundMessage)> {
        self.log()
            .iter()
            .filter_map(|op| match op {
                BrokerOp::Publish {
                    exchange,
                    routing_key,
                    message,
                } => Some((exchange.clone(), routing_key.clone(), message.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log().clear();
    }
}

#[async_trait]
impl BrokerChannel for InMemoryBroker {
    async fn declare_exchange(&self, name: &str, kind: &ExchangeKind) -> Result<()> {
        self.record(BrokerOp::DeclareExchange {
            name: name.to_string(),
            kind: kind.clone(),
        });
        Ok(())
    }

    async fn declare_queue(&self, name: &str) -> Result<()> {
        self.record(BrokerOp::DeclareQueue {
            name: name.to_string(),
        });
        Ok(())
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        message: &OutboundMessage,
    ) -> Result<()> {
        self.record(BrokerOp::Publish {
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            message: message.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl BrokerConnector for InMemoryBroker {
    async fn open(&self, url: &str) -> Result<Arc<dyn BrokerChannel>> {
        self.record(BrokerOp::Open {
            url: url.to_string(),
        });
        Ok(Arc::new(self.clone()))
    }
}
