//! Heartbeat intake records.
//!
//! A heartbeat is the phone-unlock signal sent by MacroDroid/Tasker. Each
//! one becomes an entry in the in-process session ledger; the most recent
//! entry is what the welfare check describes to the text generator.

use serde::Serialize;
use uuid::Uuid;

use crate::utils::human_age;

/// One received heartbeat.
#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatEntry {
    pub id: String,
    /// Receive timestamp in milliseconds.
    pub ts: u64,
    /// Caller-supplied label ("MacroDroid", "Browser Test Button", ...).
    pub source: String,
    /// Free-form extras from the automation, e.g. battery level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl HeartbeatEntry {
    pub fn new(source: impl Into<String>, metadata: Option<serde_json::Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ts: now_ms(),
            source: source.into(),
            metadata,
        }
    }

    /// Age relative to `now` in whole seconds (zero if the clock ran
    /// backwards).
    pub fn age_secs(&self, now: u64) -> u64 {
        now.saturating_sub(self.ts) / 1000
    }
}

/// Current timestamp in milliseconds since the epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Describe the most recent heartbeat for prompts and log lines:
/// `"MacroDroid, 3h 12m ago"` or `"no heartbeat observed"`.
pub fn describe_last(entry: Option<&HeartbeatEntry>, now: u64) -> String {
    match entry {
        Some(entry) => format!("{}, {} ago", entry.source, human_age(entry.age_secs(now))),
        None => "no heartbeat observed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_has_unique_id_and_fresh_ts() {
        let a = HeartbeatEntry::new("test", None);
        let b = HeartbeatEntry::new("test", None);
        assert_ne!(a.id, b.id);
        assert!(a.ts > 0);
    }

    #[test]
    fn age_is_clamped_to_zero() {
        let entry = HeartbeatEntry::new("test", None);
        assert_eq!(entry.age_secs(entry.ts.saturating_sub(5000)), 0);
        assert_eq!(entry.age_secs(entry.ts + 5000), 5);
    }

    #[test]
    fn describe_last_none() {
        assert_eq!(describe_last(None, now_ms()), "no heartbeat observed");
    }

    #[test]
    fn describe_last_with_entry() {
        let mut entry = HeartbeatEntry::new("MacroDroid", None);
        entry.ts = 1_000_000;
        let described = describe_last(Some(&entry), 1_000_000 + 2 * 3600 * 1000);
        assert_eq!(described, "MacroDroid, 2h ago");
    }

    #[test]
    fn metadata_serializes_only_when_present() {
        let bare = HeartbeatEntry::new("phone", None);
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("metadata").is_none());

        let with = HeartbeatEntry::new("phone", Some(serde_json::json!({"battery": 82})));
        let json = serde_json::to_value(&with).unwrap();
        assert_eq!(json["metadata"]["battery"], 82);
    }
}
