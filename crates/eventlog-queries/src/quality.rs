// quality.rs
// Agregado de métricas de calidad (expectations) por dataset y nombre de
// restricción para una ejecución.
use eventlog::{EventDetails, EventRecord, EventType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fila del agregado: `(dataset, expectation, passing, failing)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationSummary {
  pub dataset: String,
  pub expectation: String,
  pub passing_records: u64,
  pub failing_records: u64,
}

/// Suma los registros aprobados/fallidos de cada `(dataset, expectation)`
/// en los `flow_progress` de `update_id`.
///
/// Las filas salen en orden de primera aparición. Un registro cuyo
/// `details` no se puede parsear no aporta filas.
pub fn aggregate(records: &[EventRecord], update_id: &str) -> Vec<ExpectationSummary> {
  let mut totals: IndexMap<(String, String), (u64, u64)> = IndexMap::new();
  for record in records.iter()
                       .filter(|r| r.event_type == EventType::FlowProgress && r.belongs_to(update_id))
  {
    let expectations = match record.details() {
      Ok(EventDetails::FlowProgress { expectations, .. }) => expectations,
      Ok(_) => continue,
      Err(e) => {
        log::debug!("flow_progress {} ignorado: {}", record.id, e);
        continue;
      }
    };
    for exp in expectations {
      let entry = totals.entry((exp.dataset, exp.name)).or_insert((0, 0));
      entry.0 = entry.0.saturating_add(exp.passed_records);
      entry.1 = entry.1.saturating_add(exp.failed_records);
    }
  }
  totals.into_iter()
        .map(|((dataset, expectation), (passing_records, failing_records))| ExpectationSummary { dataset,
                                                                                                 expectation,
                                                                                                 passing_records,
                                                                                                 failing_records })
        .collect()
}
