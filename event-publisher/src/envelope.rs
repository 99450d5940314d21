//! 增强信封（EnrichedEnvelope）
//!
//! 在原始 JSON 对象的顶层注入 `token`、`userID`、`instanceName`、`serverUrl`。
//! 载荷不是 JSON 对象时返回 `PublishError::Serde`，由调用方决定是否原样转发。
//!
use crate::error::PublishResult as Result;
use serde::Serialize;
use serde_json::{Map, Value};

const TOKEN_FIELD: &str = "token";
const USER_ID_FIELD: &str = "userID";
const INSTANCE_NAME_FIELD: &str = "instanceName";
const SERVER_URL_FIELD: &str = "serverUrl";

/// 注入到载荷中的调用方元信息
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EnvelopeMetadata {
    pub token: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "instanceName")]
    pub instance_name: String,
    #[serde(rename = "serverUrl")]
    pub server_url: String,
}

#[derive(Debug, Serialize)]
pub struct EnrichedEnvelope {
    #[serde(flatten)]
    payload: Map<String, Value>,
    #[serde(flatten)]
    metadata: EnvelopeMetadata,
}

impl EnrichedEnvelope {
    /// 仅接受 JSON 对象；同名字段以元信息为准
    pub fn new(mut payload: Map<String, Value>, metadata: EnvelopeMetadata) -> Self {
        for field in [
            TOKEN_FIELD,
            USER_ID_FIELD,
            INSTANCE_NAME_FIELD,
            SERVER_URL_FIELD,
        ] {
            payload.remove(field);
        }
        Self { payload, metadata }
    }

    /// 将载荷解码为 JSON 对象并附上元信息
    pub fn decode(payload: &[u8], metadata: EnvelopeMetadata) -> Result<Self> {
        let map: Map<String, Value> = serde_json::from_slice(payload)?;
        Ok(Self::new(map, metadata))
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// 解码并增强后重新序列化
    pub fn wrap(payload: &[u8], metadata: EnvelopeMetadata) -> Result<Vec<u8>> {
        Self::decode(payload, metadata)?.encode()
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn metadata(&self) -> &EnvelopeMetadata {
        &self.metadata
    }
}
