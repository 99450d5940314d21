//! 会话信息缓存（SessionCache）
//!
//! 增强发布时按 token 查找会话，读取其 `Name` 属性作为实例名。
//!
use dashmap::DashMap;
use std::collections::HashMap;

pub const NAME_ATTRIBUTE: &str = "Name";

/// 会话属性集合
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionInfo {
    attributes: HashMap<String, String>,
}

impl SessionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self::new().with_attribute(NAME_ATTRIBUTE, name)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// 实例名，未设置时为空串
    pub fn name(&self) -> &str {
        self.get(NAME_ATTRIBUTE).unwrap_or_default()
    }
}

pub trait SessionCache: Send + Sync {
    fn lookup(&self, token: &str) -> Option<SessionInfo>;
}

/// 始终查不到会话的缓存
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSessions;

impl SessionCache for NoSessions {
    fn lookup(&self, _token: &str) -> Option<SessionInfo> {
        None
    }
}

/// 基于 DashMap 的并发会话缓存
#[derive(Debug, Default)]
pub struct InMemorySessionCache {
    sessions: DashMap<String, SessionInfo>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: impl Into<String>, info: SessionInfo) -> Option<SessionInfo> {
        self.sessions.insert(token.into(), info)
    }

    pub fn remove(&self, token: &str) -> Option<SessionInfo> {
        self.sessions.remove(token).map(|(_, info)| info)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionCache for InMemorySessionCache {
    fn lookup(&self, token: &str) -> Option<SessionInfo> {
        self.sessions.get(token).map(|e| e.value().clone())
    }
}
