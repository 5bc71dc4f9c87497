// Archivo: jsonl.rs
// Propósito: fuente de eventos respaldada por un archivo JSON-lines (un
// objeto `EventRecord` por línea), típico de una exportación del log.
use crate::domain::EventRecord;
use crate::errors::Result;
use crate::repository::EventLogSource;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Log de eventos leído desde un archivo JSON-lines.
///
/// Las líneas vacías se ignoran. Una línea que no se puede deserializar se
/// descarta con un `warn!` y no aborta la lectura; un error de E/S sí se
/// propaga como `EventLogError::Storage`.
#[derive(Debug, Clone)]
pub struct JsonLinesEventLog {
    path: PathBuf,
}

impl JsonLinesEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLogSource for JsonLinesEventLog {
    fn read_events(&self) -> Result<Vec<EventRecord>> {
        let bytes = std::fs::read(&self.path)?;
        let records = parse_json_lines(&bytes);
        log::debug!("{} registros leídos de {}", records.len(), self.path().display());
        Ok(records)
    }
}

/// Parsea un contenido JSON-lines en paralelo conservando el orden del log.
///
/// Cada línea se decodifica por separado: una línea con UTF-8 inválido se
/// descarta igual que cualquier otra línea mal formada.
pub fn parse_json_lines(bytes: &[u8]) -> Vec<EventRecord> {
    let lines: Vec<(usize, &[u8])> = bytes.split(|b| *b == b'\n')
                                          .enumerate()
                                          .filter(|(_, l)| !l.iter().all(u8::is_ascii_whitespace))
                                          .collect();
    let parsed: Vec<(usize, serde_json::Result<EventRecord>)> =
        lines.par_iter()
             .map(|(n, l)| (*n, serde_json::from_slice::<EventRecord>(l)))
             .collect();

    let mut records = Vec::with_capacity(parsed.len());
    for (n, res) in parsed {
        match res {
            Ok(r) => records.push(r),
            Err(e) => log::warn!("línea {} descartada: {}", n + 1, e),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventType;

    #[test]
    fn skips_blank_and_broken_lines() {
        let text = concat!(r#"{"event_type":"create_update","timestamp":"2022-05-01T10:00:00Z","origin":{"update_id":"u1"},"details":{}}"#,
                           "\n\n",
                           "{broken\n",
                           r#"{"event_type":"user_action","timestamp":"2022-05-01T10:01:00Z","details":"{\"user_action\":{\"action\":\"START\"}}"}"#,
                           "\n");
        let records = parse_json_lines(text.as_bytes());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event_type, EventType::CreateUpdate);
        assert_eq!(records[0].update_id(), Some("u1"));
        assert_eq!(records[1].event_type, EventType::UserAction);
        assert!(records[1].id.is_nil());
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(br#"{"event_type":"create_update","timestamp":"2022-05-01T10:00:00Z","origin":{"update_id":"u1"}}"#);
        bytes.extend_from_slice(b"\n\xff\xfe garbage\r\n");
        bytes.extend_from_slice(br#"{"event_type":"create_update","timestamp":"2022-05-01T11:00:00Z","origin":{"update_id":"u2"}}"#);
        bytes.push(b'\n');

        let records = parse_json_lines(&bytes);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].update_id(), Some("u1"));
        assert_eq!(records[1].update_id(), Some("u2"));
    }
}
