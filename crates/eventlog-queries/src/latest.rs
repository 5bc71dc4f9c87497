// latest.rs
// Localiza la ejecución (update) más reciente a partir de los eventos
// `create_update`.
use chrono::{DateTime, Utc};
use eventlog::{EventDetails, EventLogError, EventRecord, EventType, Result};
use serde::{Deserialize, Serialize};

/// Resumen de una ejecución creada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
  pub update_id: String,
  pub timestamp: DateTime<Utc>,
  pub cause: Option<String>,
  pub full_refresh: bool,
}

/// `create_update` con `update_id`, junto con su posición en el log.
fn create_updates(records: &[EventRecord]) -> impl Iterator<Item = (usize, &EventRecord, &str)> {
  records.iter()
         .enumerate()
         .filter(|(_, r)| r.event_type == EventType::CreateUpdate)
         .filter_map(|(i, r)| r.update_id().map(|id| (i, r, id)))
}

/// `update_id` del `create_update` con mayor `timestamp`. Con timestamps
/// empatados gana el registro posterior en el log.
///
/// Falla con `EventLogError::NotFound` si no hay ningún `create_update`.
pub fn latest(records: &[EventRecord]) -> Result<String> {
  create_updates(records).max_by_key(|(i, r, _)| (r.timestamp, *i))
                         .map(|(_, _, id)| id.to_string())
                         .ok_or_else(|| EventLogError::NotFound("ningún evento create_update".into()))
}

/// Las `n` ejecuciones más recientes, de la más nueva a la más antigua.
pub fn latest_n(records: &[EventRecord], n: usize) -> Vec<RunSummary> {
  let mut runs: Vec<(usize, &EventRecord, &str)> = create_updates(records).collect();
  runs.sort_by(|a, b| (b.1.timestamp, b.0).cmp(&(a.1.timestamp, a.0)));
  runs.into_iter()
      .take(n)
      .map(|(_, r, id)| {
        let (cause, full_refresh) = match r.details() {
          Ok(EventDetails::CreateUpdate { cause, full_refresh }) => (cause, full_refresh),
          _ => (None, false),
        };
        RunSummary { update_id: id.to_string(), timestamp: r.timestamp, cause, full_refresh }
      })
      .collect()
}
