//! 发布器配置（PublisherConfig）
//!
//! 启动时从环境变量一次性解析：
//! - `RABBITMQ_URL`：连接串，缺失则禁用发布；
//! - `RABBITMQ_QUEUE`：默认队列，缺省 `whatsapp_events`；
//! - `RABBITMQ_EXCHANGE` / `RABBITMQ_EXCHANGE_TYPE` / `RABBITMQ_ROUTING_KEY`：交换机路由；
//! - `RABBITMQ_EVENTS`：事件白名单；
//! - `SERVER_URL`：注入到增强载荷的 `serverUrl`。
//!
use crate::filter::EventFilter;
use bon::Builder;
use std::fmt;

pub const ENV_URL: &str = "RABBITMQ_URL";
pub const ENV_QUEUE: &str = "RABBITMQ_QUEUE";
pub const ENV_EXCHANGE: &str = "RABBITMQ_EXCHANGE";
pub const ENV_EXCHANGE_TYPE: &str = "RABBITMQ_EXCHANGE_TYPE";
pub const ENV_ROUTING_KEY: &str = "RABBITMQ_ROUTING_KEY";
pub const ENV_EVENTS: &str = "RABBITMQ_EVENTS";
pub const ENV_SERVER_URL: &str = "SERVER_URL";

pub const DEFAULT_QUEUE: &str = "whatsapp_events";

/// 交换机类型
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExchangeKind {
    Direct,
    Fanout,
    Headers,
    #[default]
    Topic,
    /// 插件提供的类型（如 `x-delayed-message`），原样交给代理
    Custom(String),
}

impl ExchangeKind {
    /// 原样匹配，不做大小写或空白归一化
    pub fn parse(kind: &str) -> Self {
        match kind {
            "" | "topic" => Self::Topic,
            "direct" => Self::Direct,
            "fanout" => Self::Fanout,
            "headers" => Self::Headers,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Direct => "direct",
            Self::Fanout => "fanout",
            Self::Headers => "headers",
            Self::Topic => "topic",
            Self::Custom(kind) => kind,
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 交换机路由配置
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct ExchangeConfig {
    #[builder(into)]
    name: String,
    #[builder(default)]
    kind: ExchangeKind,
    /// 为空时以事件类型作为 routing key
    #[builder(into)]
    routing_key: Option<String>,
}

impl ExchangeConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ExchangeKind {
        &self.kind
    }

    pub fn routing_key(&self) -> Option<&str> {
        self.routing_key.as_deref()
    }

    /// 计算某事件的 routing key：优先使用覆盖值，否则为事件类型
    pub fn routing_key_for<'a>(&'a self, event_type: &'a str) -> &'a str {
        self.routing_key().unwrap_or(event_type)
    }
}

#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct PublisherConfig {
    #[builder(into)]
    url: Option<String>,
    #[builder(into, default = DEFAULT_QUEUE.to_string())]
    queue: String,
    exchange: Option<ExchangeConfig>,
    #[builder(default)]
    events: EventFilter,
    #[builder(into, default)]
    server_url: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PublisherConfig {
    /// 从进程环境变量解析
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 以任意键值来源解析，空字符串视同未设置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let exchange = get(ENV_EXCHANGE).map(|name| ExchangeConfig {
            name,
            kind: get(ENV_EXCHANGE_TYPE)
                .map(|k| ExchangeKind::parse(&k))
                .unwrap_or_default(),
            routing_key: get(ENV_ROUTING_KEY),
        });

        Self {
            url: get(ENV_URL),
            queue: get(ENV_QUEUE).unwrap_or_else(|| DEFAULT_QUEUE.to_string()),
            exchange,
            events: EventFilter::parse(&lookup(ENV_EVENTS).unwrap_or_default()),
            server_url: get(ENV_SERVER_URL).unwrap_or_default(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn exchange(&self) -> Option<&ExchangeConfig> {
        self.exchange.as_ref()
    }

    pub fn events(&self) -> &EventFilter {
        &self.events
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// 解析本次发布的目标队列：非空覆盖值优先
    pub fn queue_for<'a>(&'a self, queue_override: Option<&'a str>) -> &'a str {
        queue_override
            .filter(|q| !q.is_empty())
            .unwrap_or(self.queue.as_str())
    }
}
