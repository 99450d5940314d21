//! 消息代理接口（broker）
//!
//! 发布器只依赖两项能力：
//! - `BrokerConnector`：拨号并打开一个通道；
//! - `BrokerChannel`：声明交换机/队列与发布消息。
//!
//! 协议本身交给客户端库实现；`InMemoryBroker` 用于测试与本地开发，
//! `AmqpConnector`（`amqp` 特性）对接 RabbitMQ。
//!
use crate::{config::ExchangeKind, error::PublishResult as Result, message::OutboundMessage};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(feature = "amqp")]
pub mod amqp;
pub mod inmemory;

#[cfg(feature = "amqp")]
pub use amqp::{AmqpChannel, AmqpConnectionProperties, AmqpConnector};
pub use inmemory::{BrokerOp, InMemoryBroker};

/// 默认交换机（按队列名直投）
pub const DEFAULT_EXCHANGE: &str = "";

/// 已打开的通道，实现方需保证可被并发调用
#[async_trait]
pub trait BrokerChannel: Send + Sync {
    /// 声明持久化、非自动删除的交换机
    async fn declare_exchange(&self, name: &str, kind: &ExchangeKind) -> Result<()>;

    /// 声明持久化、非自动删除、非排他的队列；重复声明是幂等的
    async fn declare_queue(&self, name: &str) -> Result<()>;

    /// 发布到指定交换机，`exchange` 为空串时走默认交换机
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        message: &OutboundMessage,
    ) -> Result<()>;
}

#[async_trait]
pub trait BrokerConnector: Send + Sync {
    /// 建立连接并打开一个通道；连接在通道存活期间保持打开
    async fn open(&self, url: &str) -> Result<Arc<dyn BrokerChannel>>;
}
