//! RabbitMQ 通道（基于 lapin）
//!
//! `lapin::Channel` 支持并发发布，这里不再额外加锁。
//! 连接随通道一起持有，直至进程退出。
//!
use super::{BrokerChannel, BrokerConnector};
use crate::config::ExchangeKind;
use crate::error::{PublishError, PublishResult as Result};
use crate::message::OutboundMessage;
use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use std::sync::Arc;

pub use lapin::ConnectionProperties as AmqpConnectionProperties;

#[derive(Clone, Default)]
pub struct AmqpConnector {
    properties: ConnectionProperties,
}

impl AmqpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: ConnectionProperties) -> Self {
        Self { properties }
    }
}

#[async_trait]
impl BrokerConnector for AmqpConnector {
    async fn open(&self, url: &str) -> Result<Arc<dyn BrokerChannel>> {
        let connection = Connection::connect(url, self.properties.clone())
            .await
            .map_err(|e| PublishError::connect(e.to_string()))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| PublishError::channel(e.to_string()))?;

        Ok(Arc::new(AmqpChannel {
            _connection: connection,
            channel,
        }))
    }
}

pub struct AmqpChannel {
    _connection: Connection,
    channel: Channel,
}

fn lapin_kind(kind: &ExchangeKind) -> lapin::ExchangeKind {
    match kind {
        ExchangeKind::Direct => lapin::ExchangeKind::Direct,
        ExchangeKind::Fanout => lapin::ExchangeKind::Fanout,
        ExchangeKind::Headers => lapin::ExchangeKind::Headers,
        ExchangeKind::Topic => lapin::ExchangeKind::Topic,
        ExchangeKind::Custom(kind) => lapin::ExchangeKind::Custom(kind.clone()),
    }
}

fn properties(message: &OutboundMessage) -> BasicProperties {
    let timestamp = u64::try_from(message.occurred_at().timestamp()).unwrap_or_default();
    BasicProperties::default()
        .with_content_type(message.content_type().into())
        .with_message_id(message.message_id().to_string().into())
        .with_timestamp(timestamp)
}

#[async_trait]
impl BrokerChannel for AmqpChannel {
    async fn declare_exchange(&self, name: &str, kind: &ExchangeKind) -> Result<()> {
        let options = ExchangeDeclareOptions {
            durable: true,
            auto_delete: false,
            internal: false,
            nowait: false,
            ..Default::default()
        };
        self.channel
            .exchange_declare(name, lapin_kind(kind), options, FieldTable::default())
            .await
            .map_err(|e| PublishError::declare_exchange(name, e.to_string()))
    }

    async fn declare_queue(&self, name: &str) -> Result<()> {
        let options = QueueDeclareOptions {
            durable: true,
            auto_delete: false,
            exclusive: false,
            nowait: false,
            ..Default::default()
        };
        self.channel
            .queue_declare(name, options, FieldTable::default())
            .await
            .map(|_| ())
            .map_err(|e| PublishError::declare_queue(name, e.to_string()))
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        message: &OutboundMessage,
    ) -> Result<()> {
        let options = BasicPublishOptions {
            mandatory: false,
            immediate: false,
        };
        // 不等待 publisher confirm
        self.channel
            .basic_publish(
                exchange,
                routing_key,
                options,
                message.body(),
                properties(message),
            )
            .await
            .map(|_confirm| ())
            .map_err(|e| {
                let target = if exchange.is_empty() {
                    routing_key
                } else {
                    exchange
                };
                PublishError::publish(target, e.to_string())
            })
    }
}
