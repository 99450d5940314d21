//! 出站消息（OutboundMessage）
//!
//! 已序列化的 JSON 字节与事件类型标签，附带消息 ID 与发生时间，
//! 由代理实现映射到 AMQP 标准属性。消息不落盘、不重试。
//!
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    message_id: Uuid,
    event_type: String,
    body: Vec<u8>,
    occurred_at: DateTime<Utc>,
}

impl OutboundMessage {
    pub fn json(body: impl Into<Vec<u8>>, event_type: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            event_type: event_type.into(),
            body: body.into(),
            occurred_at: Utc::now(),
        }
    }

    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
