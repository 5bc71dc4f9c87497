use std::error::Error;
use std::str::FromStr;
use std::sync::Arc;

use eventlog::{EventLogSource, InMemoryEventLog, JsonLinesEventLog};
use eventlog_queries::EventLogQueries;
use tracing::Level;

mod config;

use config::ReportConfig;

/// Reporte de texto sobre un log de eventos exportado en JSON-lines.
///
/// Secciones:
/// 1) Ejecuciones recientes y la ejecución reportada
/// 2) Auditoría (acciones de usuario)
/// 3) Linaje directo de la ejecución
/// 4) Linaje por profundidad (L1..Ln) de cada dataset
/// 5) Métricas de calidad de datos
///
/// Uso: `eventlog-report [ruta.jsonl]` (o `EVENTLOG_PATH`).
fn main() -> Result<(), Box<dyn Error>> {
    let level = std::env::var("EVENTLOG_LOG_LEVEL").ok()
                                                   .and_then(|l| Level::from_str(&l).ok())
                                                   .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let cfg = ReportConfig::from_env(std::env::args().nth(1))?;
    // Una sola lectura del archivo; las consultas trabajan sobre la instantánea.
    let records = JsonLinesEventLog::new(&cfg.event_log_path).read_events()?;
    log::info!("{} eventos cargados de {}", records.len(), cfg.event_log_path.display());
    let queries = EventLogQueries::new(Arc::new(InMemoryEventLog::from_records(records)));

    println!("\n== Ejecuciones recientes ==");
    for run in queries.recent_updates(cfg.recent_updates)? {
        println!("{} | {} | {}{}",
                 run.timestamp,
                 run.update_id,
                 run.cause.unwrap_or_else(|| "-".into()),
                 if run.full_refresh { " (full refresh)" } else { "" });
    }

    let update_id = match cfg.update_id.clone() {
        Some(id) => id,
        None => queries.latest_update_id()?,
    };
    println!("\nUpdate ID reportado: {}", update_id);

    println!("\n== Auditoría ==");
    for entry in queries.audit_trail()? {
        println!("{} | {} | {}",
                 entry.timestamp,
                 entry.action,
                 entry.user_name.unwrap_or_else(|| "<sin usuario>".into()));
    }

    println!("\n== Linaje directo ==");
    for def in queries.flow_definitions(&update_id)? {
        println!("{} <- [{}]", def.output_dataset, def.input_datasets.join(", "));
    }

    println!("\n== Linaje por profundidad ==");
    for (output, levels) in queries.lineage_all(&update_id, cfg.lineage_depth)? {
        let cols: Vec<String> = levels.iter()
                                      .map(|(depth, names)| {
                                          format!("L{}=[{}]",
                                                  depth,
                                                  names.iter().map(String::as_str).collect::<Vec<_>>().join(", "))
                                      })
                                      .collect();
        println!("{} | {}", output, cols.join(" | "));
    }

    println!("\n== Calidad de datos ==");
    println!("DATASET | EXPECTATION | PASSING | FAILING");
    for row in queries.data_quality(&update_id)? {
        println!("{} | {} | {} | {}", row.dataset, row.expectation, row.passing_records, row.failing_records);
    }
    Ok(())
}
