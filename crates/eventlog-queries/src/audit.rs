// audit.rs
// Traza de auditoría: acciones de usuario registradas como `user_action`.
use chrono::{DateTime, Utc};
use eventlog::{EventDetails, EventRecord, EventType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
  pub timestamp: DateTime<Utc>,
  pub action: String,
  pub user_name: Option<String>,
}

/// Acciones de usuario en orden del log. Los registros mal formados se
/// saltan.
pub fn audit(records: &[EventRecord]) -> Vec<AuditEntry> {
  records.iter()
         .filter(|r| r.event_type == EventType::UserAction)
         .filter_map(|r| match r.details() {
           Ok(EventDetails::UserAction { action, user_name }) => {
             Some(AuditEntry { timestamp: r.timestamp, action, user_name })
           }
           Ok(_) => None,
           Err(e) => {
             log::debug!("user_action {} ignorado: {}", r.id, e);
             None
           }
         })
         .collect()
}
