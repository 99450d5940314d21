//! 事件发布器（EventPublisher）
//!
//! 只有两种稳定状态：
//! - `Disabled`：未配置连接串或初始化失败，所有操作均为空操作；
//! - `Enabled`：初始化成功后保持不变，单次发布失败不会回退为 Disabled。
//!
//! 发布器由组合根在启动时构造一次，之后以引用或 `Arc` 共享给调用方。
//!
use crate::broker::{BrokerChannel, BrokerConnector, DEFAULT_EXCHANGE};
use crate::config::PublisherConfig;
use crate::envelope::{EnrichedEnvelope, EnvelopeMetadata};
use crate::error::{PublishError, PublishResult as Result};
use crate::message::OutboundMessage;
use crate::session::SessionCache;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisabledReason {
    /// 未设置 `RABBITMQ_URL`
    NotConfigured,
    /// 建连、开通道或声明交换机失败
    SetupFailed(String),
}

impl fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => f.write_str("not configured"),
            Self::SetupFailed(reason) => write!(f, "setup failed: {reason}"),
        }
    }
}

/// 已就绪的发布器
pub struct ActivePublisher {
    config: PublisherConfig,
    channel: Arc<dyn BrokerChannel>,
    sessions: Arc<dyn SessionCache>,
}

impl ActivePublisher {
    /// 以已打开（且已完成交换机声明）的通道构造
    pub fn new(
        config: PublisherConfig,
        channel: Arc<dyn BrokerChannel>,
        sessions: Arc<dyn SessionCache>,
    ) -> Self {
        Self {
            config,
            channel,
            sessions,
        }
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub fn should_publish(&self, event_type: &str) -> bool {
        self.config.events().allows(event_type)
    }

    /// 按配置选择交换机或队列路径发布，不做过滤
    async fn route(&self, message: &OutboundMessage, queue_override: Option<&str>) -> Result<()> {
        if let Some(exchange) = self.config.exchange() {
            let routing_key = exchange.routing_key_for(message.event_type());
            let result = self
                .channel
                .publish(exchange.name(), routing_key, message)
                .await;
            match &result {
                Ok(()) => debug!(
                    exchange = exchange.name(),
                    routing_key,
                    "Published message to RabbitMQ exchange"
                ),
                Err(err) => error!(
                    error = %err,
                    exchange = exchange.name(),
                    routing_key,
                    "Could not publish to RabbitMQ exchange"
                ),
            }
            return result;
        }

        let queue = self.config.queue_for(queue_override);
        if let Err(err) = self.channel.declare_queue(queue).await {
            error!(error = %err, queue, "Could not declare RabbitMQ queue");
            return Err(err);
        }

        let result = self.channel.publish(DEFAULT_EXCHANGE, queue, message).await;
        match &result {
            Ok(()) => debug!(queue, "Published message to RabbitMQ"),
            Err(err) => error!(error = %err, queue, "Could not publish to RabbitMQ"),
        }
        result
    }

    fn metadata(&self, token: &str, user_id: &str) -> EnvelopeMetadata {
        let instance_name = self
            .sessions
            .lookup(token)
            .map(|info| info.name().to_string())
            .unwrap_or_default();

        EnvelopeMetadata {
            token: token.to_string(),
            user_id: user_id.to_string(),
            instance_name,
            server_url: self.config.server_url().to_string(),
        }
    }
}

pub enum EventPublisher {
    Disabled(DisabledReason),
    Enabled(ActivePublisher),
}

impl fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled(reason) => f.debug_tuple("Disabled").field(reason).finish(),
            Self::Enabled(active) => f
                .debug_struct("Enabled")
                .field("config", &active.config)
                .finish_non_exhaustive(),
        }
    }
}

impl EventPublisher {
    pub fn disabled() -> Self {
        Self::Disabled(DisabledReason::NotConfigured)
    }

    /// 初始化发布器；失败时降级为 Disabled 并记录日志，不向宿主返回错误
    pub async fn connect<C>(
        config: PublisherConfig,
        connector: &C,
        sessions: Arc<dyn SessionCache>,
    ) -> Self
    where
        C: BrokerConnector + ?Sized,
    {
        match Self::try_connect(config, connector, sessions).await {
            Ok(Some(active)) => {
                info!(
                    queue = active.config.queue(),
                    "RabbitMQ connection established."
                );
                Self::Enabled(active)
            }
            Ok(None) => {
                info!("RABBITMQ_URL is not set. RabbitMQ publishing disabled.");
                Self::Disabled(DisabledReason::NotConfigured)
            }
            Err(err) => {
                match &err {
                    PublishError::Connect { .. } => {
                        error!(error = %err, "Could not connect to RabbitMQ")
                    }
                    PublishError::Channel { .. } => {
                        error!(error = %err, "Could not open RabbitMQ channel")
                    }
                    PublishError::DeclareExchange { exchange, .. } => {
                        error!(error = %err, exchange = %exchange, "Could not declare RabbitMQ exchange")
                    }
                    _ => error!(error = %err, "Could not initialize RabbitMQ publisher"),
                }
                Self::Disabled(DisabledReason::SetupFailed(err.to_string()))
            }
        }
    }

    /// 与 `connect` 相同，但将初始化错误返回给调用方；未配置连接串时返回 `Ok(None)`
    pub async fn try_connect<C>(
        config: PublisherConfig,
        connector: &C,
        sessions: Arc<dyn SessionCache>,
    ) -> Result<Option<ActivePublisher>>
    where
        C: BrokerConnector + ?Sized,
    {
        let Some(url) = config.url() else {
            return Ok(None);
        };

        let channel = connector.open(url).await?;

        if let Some(exchange) = config.exchange() {
            channel
                .declare_exchange(exchange.name(), exchange.kind())
                .await?;
            info!(
                exchange = exchange.name(),
                kind = %exchange.kind(),
                "RabbitMQ exchange declared"
            );
        }

        Ok(Some(ActivePublisher::new(config, channel, sessions)))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    pub fn disabled_reason(&self) -> Option<&DisabledReason> {
        match self {
            Self::Disabled(reason) => Some(reason),
            Self::Enabled(_) => None,
        }
    }

    pub fn config(&self) -> Option<&PublisherConfig> {
        match self {
            Self::Enabled(active) => Some(active.config()),
            Self::Disabled(_) => None,
        }
    }

    pub fn should_publish(&self, event_type: &str) -> bool {
        match self {
            Self::Enabled(active) => active.should_publish(event_type),
            Self::Disabled(_) => false,
        }
    }

    /// 发布已序列化的 JSON 载荷
    ///
    /// 被过滤或发布器未启用时直接返回 `Ok(())`；
    /// 声明队列或发布失败时记录日志并返回错误，调用方不做重试。
    pub async fn publish(
        &self,
        payload: &[u8],
        event_type: &str,
        queue_override: Option<&str>,
    ) -> Result<()> {
        let active = match self {
            Self::Enabled(active) if active.should_publish(event_type) => active,
            _ => {
                debug!(event = event_type, "RabbitMQ filter skipped event");
                return Ok(());
            }
        };

        let message = OutboundMessage::json(payload, event_type);
        active.route(&message, queue_override).await
    }

    /// 注入调用方元信息后发布；错误仅记录日志
    ///
    /// 载荷无法解析为 JSON 对象时按原样发布。
    pub async fn publish_enriched(
        &self,
        payload: &[u8],
        event_type: &str,
        token: &str,
        user_id: &str,
        queue_override: Option<&str>,
    ) {
        let Self::Enabled(active) = self else {
            debug!("RabbitMQ publishing is disabled, not sending message");
            return;
        };

        let body = match EnrichedEnvelope::wrap(payload, active.metadata(token, user_id)) {
            Ok(enriched) => Cow::Owned(enriched),
            Err(err) => {
                debug!(
                    error = %err,
                    event = event_type,
                    "payload is not a JSON object, forwarding unchanged"
                );
                Cow::Borrowed(payload)
            }
        };

        if let Err(err) = self.publish(&body, event_type, queue_override).await {
            error!(error = %err, event = event_type, "Failed to publish to RabbitMQ");
        }
    }
}
