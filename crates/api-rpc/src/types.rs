//! Request/Response Types
//!
//! JSON-RPC method parameters and results, plus the HTTP `/queue` body.

use drainq_core::domain::QueueSnapshot;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// queue.submit.v1 - Push an item into a named queue
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub queue: String,
    pub content: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub queue: String,
    pub accepted: bool,
    pub length: usize,
}

/// queue.snapshot.v1 - Every queue with its length and purge count
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    pub queues: Vec<QueueSnapshot>,
    pub total_queues: usize,
}

/// admin.stats.v1 - Store-wide totals
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_queues: usize,
    pub total_items: usize,
    pub total_purges: u64,
    pub default_capacity: usize,
    pub uptime_seconds: u64,
}

/// POST /queue body
///
/// Field names match ASCII case-insensitively (`content`, `Content`,
/// `CONTENT`, ...). An exact lower-case key wins over other spellings.
/// Both fields are required.
#[derive(Debug)]
pub struct QueuePayload {
    pub content: Value,
    pub queue: String,
}

impl<'de> Deserialize<'de> for QueuePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields: Map<String, Value> = Map::deserialize(deserializer)?;

        let content =
            take_field(&mut fields, "content").ok_or_else(|| de::Error::missing_field("content"))?;
        let queue = match take_field(&mut fields, "type") {
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "field `type` must be a string, got {}",
                    other
                )))
            }
            None => return Err(de::Error::missing_field("type")),
        };

        Ok(Self { content, queue })
    }
}

/// Remove `name` from `fields`, falling back to the first key equal to it
/// ignoring ASCII case
fn take_field(fields: &mut Map<String, Value>, name: &str) -> Option<Value> {
    if let Some(value) = fields.remove(name) {
        return Some(value);
    }
    let key = fields.keys().find(|k| k.eq_ignore_ascii_case(name))?.clone();
    fields.remove(&key)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub queue: String,
    pub status: String,
}
