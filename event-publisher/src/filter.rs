//! 事件类型过滤（EventFilter）
//!
//! 对应 `RABBITMQ_EVENTS`：逗号分隔的事件类型白名单，
//! 为空或为 `All`（不区分大小写）时放行全部事件。
//!
use std::collections::HashSet;

/// 名单内的通配成员（区分大小写）
pub const WILDCARD_EVENT: &str = "All";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    AllowAll,
    Only(HashSet<String>),
}

impl EventFilter {
    /// 解析白名单描述
    ///
    /// 仅由分隔符组成的值（如 `" , "`）会得到空名单，此时拒绝所有事件。
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(WILDCARD_EVENT) {
            return Self::AllowAll;
        }

        let set = raw
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();

        Self::Only(set)
    }

    pub fn only<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(events.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, event_type: &str) -> bool {
        match self {
            Self::AllowAll => true,
            // 名单内出现字面量 "All" 时同样放行
            Self::Only(set) => set.contains(event_type) || set.contains(WILDCARD_EVENT),
        }
    }

    pub fn is_allow_all(&self) -> bool {
        matches!(self, Self::AllowAll)
    }
}
