// Archivo: config.rs
// Propósito: configuración del binario de reportes a partir de variables de
// entorno (y de un `.env` si existe, vía dotenvy).
use eventlog::EventLogError;
use eventlog_queries::MAX_LINEAGE_DEPTH;
use std::path::PathBuf;

/// Profundidad de linaje por defecto (la del reporte original: L1..L3).
pub const DEFAULT_LINEAGE_DEPTH: usize = 3;
/// Número de ejecuciones recientes a listar por defecto.
pub const DEFAULT_RECENT_UPDATES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Archivo JSON-lines con el log exportado (`EVENTLOG_PATH`).
    pub event_log_path: PathBuf,
    /// `EVENTLOG_LINEAGE_DEPTH`, entre 1 y `MAX_LINEAGE_DEPTH`.
    pub lineage_depth: usize,
    /// `EVENTLOG_RECENT_UPDATES`.
    pub recent_updates: usize,
    /// `EVENTLOG_UPDATE_ID`: fuerza la ejecución a reportar en lugar de la
    /// más reciente.
    pub update_id: Option<String>,
}

impl ReportConfig {
    /// Carga la configuración desde el entorno. `path_override` (p.ej. el
    /// primer argumento de la línea de comandos) tiene prioridad sobre
    /// `EVENTLOG_PATH`.
    pub fn from_env(path_override: Option<String>) -> Result<Self, EventLogError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(path_override, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(path_override: Option<String>, lookup: F) -> Result<Self, EventLogError>
        where F: Fn(&str) -> Option<String>
    {
        let path = path_override.or_else(|| lookup("EVENTLOG_PATH"))
                                .ok_or_else(|| EventLogError::InvalidArgument("EVENTLOG_PATH no está definido".into()))?;
        let lineage_depth = parse_usize(&lookup, "EVENTLOG_LINEAGE_DEPTH", DEFAULT_LINEAGE_DEPTH)?;
        if lineage_depth == 0 || lineage_depth > MAX_LINEAGE_DEPTH {
            return Err(EventLogError::InvalidArgument(format!("EVENTLOG_LINEAGE_DEPTH debe estar entre 1 y {}",
                                                              MAX_LINEAGE_DEPTH)));
        }
        let recent_updates = parse_usize(&lookup, "EVENTLOG_RECENT_UPDATES", DEFAULT_RECENT_UPDATES)?;
        let update_id = lookup("EVENTLOG_UPDATE_ID").filter(|s| !s.trim().is_empty());
        Ok(Self { event_log_path: PathBuf::from(path),
                  lineage_depth,
                  recent_updates,
                  update_id })
    }
}

fn parse_usize<F>(lookup: &F, key: &str, default: usize) -> Result<usize, EventLogError>
    where F: Fn(&str) -> Option<String>
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim()
                        .parse()
                        .map_err(|_| EventLogError::InvalidArgument(format!("{} inválido: {}", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = ReportConfig::from_lookup(None, lookup_from(&[("EVENTLOG_PATH", "/tmp/events.jsonl")])).unwrap();
        assert_eq!(cfg.event_log_path, PathBuf::from("/tmp/events.jsonl"));
        assert_eq!(cfg.lineage_depth, DEFAULT_LINEAGE_DEPTH);
        assert_eq!(cfg.recent_updates, DEFAULT_RECENT_UPDATES);
        assert_eq!(cfg.update_id, None);
    }

    #[test]
    fn override_wins_over_env() {
        let cfg = ReportConfig::from_lookup(Some("cli.jsonl".into()),
                                            lookup_from(&[("EVENTLOG_PATH", "env.jsonl"), ("EVENTLOG_LINEAGE_DEPTH", "5")]))
                  .unwrap();
        assert_eq!(cfg.event_log_path, PathBuf::from("cli.jsonl"));
        assert_eq!(cfg.lineage_depth, 5);
    }

    #[test]
    fn rejects_missing_path_and_zero_depth() {
        assert!(ReportConfig::from_lookup(None, lookup_from(&[])).is_err());
        let err = ReportConfig::from_lookup(None, lookup_from(&[("EVENTLOG_PATH", "x"), ("EVENTLOG_LINEAGE_DEPTH", "0")]));
        assert!(matches!(err, Err(EventLogError::InvalidArgument(_))));
        let err = ReportConfig::from_lookup(None,
                                            lookup_from(&[("EVENTLOG_PATH", "x"), ("EVENTLOG_LINEAGE_DEPTH", "1000000000")]));
        assert!(matches!(err, Err(EventLogError::InvalidArgument(_))));
        let err = ReportConfig::from_lookup(None, lookup_from(&[("EVENTLOG_PATH", "x"), ("EVENTLOG_RECENT_UPDATES", "many")]));
        assert!(err.is_err());
    }
}
