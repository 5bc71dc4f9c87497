// Archivo: repository.rs
// Propósito: definir el contrato de lectura `EventLogSource`. El log lo
// escribe una plataforma externa; aquí sólo se describe cómo obtener una
// instantánea de sus registros.
use crate::domain::{EventRecord, EventType};
use crate::errors::Result;

/// Fuente de sólo lectura del log de eventos.
///
/// Cada llamada devuelve una instantánea completa en orden del log. Las
/// consultas son funciones puras sobre esa instantánea, por lo que las
/// implementaciones no necesitan coordinar lecturas concurrentes.
pub trait EventLogSource: Send + Sync {
    /// Lee todos los registros disponibles, en orden del log.
    fn read_events(&self) -> Result<Vec<EventRecord>>;

    /// Lee sólo los registros de un `event_type`.
    fn read_by_type(&self, event_type: &EventType) -> Result<Vec<EventRecord>> {
        Ok(self.read_events()?
               .into_iter()
               .filter(|r| &r.event_type == event_type)
               .collect())
    }

    /// Lee los registros de una ejecución (`origin.update_id`).
    fn read_update(&self, update_id: &str) -> Result<Vec<EventRecord>> {
        Ok(self.read_events()?
               .into_iter()
               .filter(|r| r.belongs_to(update_id))
               .collect())
    }
}
