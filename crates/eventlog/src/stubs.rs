// Archivo: stubs.rs
// Propósito: implementación en memoria de `EventLogSource` para pruebas y
// wiring rápido. No es durable.
use crate::domain::EventRecord;
use crate::errors::{EventLogError, Result};
use crate::repository::EventLogSource;
use std::sync::{Mutex, MutexGuard};

/// Log de eventos en memoria, sólo de anexado.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    records: Mutex<Vec<EventRecord>>,
}

impl InMemoryEventLog {
    /// Crea un log vacío.
    pub fn new() -> Self {
        Self { records: Mutex::new(Vec::new()) }
    }

    /// Crea un log a partir de registros ya existentes.
    pub fn from_records(records: Vec<EventRecord>) -> Self {
        Self { records: Mutex::new(records) }
    }

    /// Anexa un registro al final del log.
    pub fn append(&self, record: EventRecord) -> Result<()> {
        self.lock()?.push(record);
        Ok(())
    }

    /// Número de registros almacenados.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Helper para mapear `Mutex::lock()` en un `Result` con
    /// `EventLogError::Storage`.
    fn lock(&self) -> std::result::Result<MutexGuard<'_, Vec<EventRecord>>, EventLogError> {
        self.records
            .lock()
            .map_err(|e| EventLogError::Storage(format!("mutex poisoned: {:?}", e)))
    }
}

impl EventLogSource for InMemoryEventLog {
    fn read_events(&self) -> Result<Vec<EventRecord>> {
        Ok(self.lock()?.clone())
    }
}
