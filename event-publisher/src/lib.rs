//! 事件发布组件（event-publisher）
//!
//! 将业务侧已序列化的 JSON 事件可选地转发到 RabbitMQ：
//! - 配置（`config`）完全来自环境变量，启动时解析一次；
//! - 过滤（`filter`）按事件类型白名单决定是否发布；
//! - 信封（`envelope`）为载荷注入调用方 token、用户与实例元信息；
//! - 代理接口（`broker`）抽象声明与发布，提供内存实现与基于 lapin 的 AMQP 实现；
//! - 发布器（`publisher`）以 `Disabled | Enabled` 两种状态对外提供发布入口。
//!
//! 发布失败不会影响宿主流程：连接/声明失败时发布器自动降级为 Disabled，
//! 单次发布错误仅返回给直接调用方。
//!
//! 典型用法：
//! 1. 在组合根中调用 `PublisherConfig::from_env()`；
//! 2. 通过 `EventPublisher::connect` 建立唯一一个发布器并共享给调用方；
//! 3. 业务代码调用 `publish` 或 `publish_enriched`。
//!
pub mod broker;
pub mod config;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod message;
pub mod publisher;
pub mod session;

pub use config::{ExchangeConfig, ExchangeKind, PublisherConfig};
pub use error::{PublishError, PublishResult};
pub use filter::EventFilter;
pub use message::OutboundMessage;
pub use publisher::{ActivePublisher, DisabledReason, EventPublisher};
pub use session::{InMemorySessionCache, NoSessions, SessionCache, SessionInfo};
