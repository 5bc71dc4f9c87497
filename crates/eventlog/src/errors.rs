// Archivo: errors.rs
// Propósito: definir los errores del log de eventos y el alias Result<T>
// usado por las APIs de los crates `eventlog` y `eventlog-queries`.
use thiserror::Error;

/// Errores comunes al leer y consultar el log de eventos.
///
/// - `NotFound`: no existe el registro buscado (p.ej. ningún `create_update`).
/// - `InvalidArgument`: parámetros inválidos (p.ej. profundidad 0).
/// - `MalformedRecord`: el `details` de un registro no tiene la forma
///   esperada. Es un error local: las consultas saltan el registro.
/// - `Storage`: error de E/S al leer la fuente del log.
#[derive(Error, Debug)]
pub enum EventLogError {
    /// Registro no encontrado.
    #[error("No encontrado: {0}")]
    NotFound(String),
    /// Argumento inválido pasado a una consulta.
    #[error("Argumento inválido: {0}")]
    InvalidArgument(String),
    /// Payload `details` que no corresponde al `event_type`.
    #[error("Registro mal formado: {0}")]
    MalformedRecord(String),
    /// Error al acceder a la fuente del log (archivo, tabla, etc.).
    #[error("Error de almacenamiento: {0}")]
    Storage(String),
}

impl From<std::io::Error> for EventLogError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl EventLogError {
    /// Indica si el error sólo afecta a un registro y debe saltarse.
    pub fn is_record_local(&self) -> bool {
        matches!(self, EventLogError::MalformedRecord(_))
    }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, EventLogError>;
