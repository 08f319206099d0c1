// Snapshot loading
// Reads a host schedule export (sessions + conflict side list) from JSON.
// Entries that fail to decode are reported and skipped, never fatal.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::grid::conflict_overlay::ConflictSnapshot;
use crate::models::session::Session;

/// A session entry that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotIssue {
    pub index: usize,
    pub id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    pub sessions: Vec<Session>,
    pub conflicts: ConflictSnapshot,
    pub issues: Vec<SnapshotIssue>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    sessions: Vec<Value>,
    #[serde(default)]
    conflicts: ConflictSnapshot,
}

pub fn load_snapshot(path: &Path) -> Result<ScheduleSnapshot> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read schedule from {}", path.display()))?;
    parse_snapshot(&data).with_context(|| format!("failed to parse schedule in {}", path.display()))
}

/// Accepts either `{ "sessions": [..], "conflicts": {..} }` or a bare array
/// of sessions.
pub fn parse_snapshot(data: &str) -> Result<ScheduleSnapshot> {
    let value: Value = serde_json::from_str(data)?;
    let raw = match value {
        Value::Array(sessions) => RawSnapshot {
            sessions,
            conflicts: ConflictSnapshot::default(),
        },
        other => serde_json::from_value(other)?,
    };

    let mut snapshot = ScheduleSnapshot {
        conflicts: raw.conflicts,
        ..ScheduleSnapshot::default()
    };

    for (index, entry) in raw.sessions.into_iter().enumerate() {
        let id = entry.get("id").and_then(Value::as_str).map(str::to_string);
        let decoded = serde_json::from_value::<Session>(entry)
            .map_err(|e| e.to_string())
            .and_then(|session| session.validate().map(|_| session).map_err(|e| e.to_string()));

        match decoded {
            Ok(session) => snapshot.sessions.push(session),
            Err(message) => {
                log::warn!("Skipping session #{} ({:?}): {}", index, id, message);
                snapshot.issues.push(SnapshotIssue { index, id, message });
            }
        }
    }

    log::debug!(
        "Loaded {} sessions, {} conflict entries, {} issues",
        snapshot.sessions.len(),
        snapshot.conflicts.len(),
        snapshot.issues.len()
    );
    Ok(snapshot)
}
