//! Crate `eventlog` — modelo y lectura del log de eventos de pipelines
//!
//! Define el registro inmutable `EventRecord` (fila de un log sólo de
//! anexado escrito por una plataforma externa de orquestación), la unión
//! etiquetada `EventDetails` con una forma concreta por `event_type`, el
//! contrato de lectura `EventLogSource` y dos implementaciones:
//! `InMemoryEventLog` (pruebas) y `JsonLinesEventLog` (archivo exportado).
//!
//! Ejemplo rápido:
//! ```rust
//! use eventlog::{EventLogSource, EventRecord, EventType, InMemoryEventLog, Origin};
//! use serde_json::json;
//! let log = InMemoryEventLog::new();
//! log.append(EventRecord::new(EventType::CreateUpdate,
//!                             chrono::Utc::now(),
//!                             Origin::for_update("u1"),
//!                             json!({}))).unwrap();
//! assert_eq!(log.read_events().unwrap().len(), 1);
//! ```
pub mod domain;
pub mod errors;
pub mod jsonl;
pub mod repository;
pub mod stubs;

pub use domain::*;
pub use errors::*;
pub use jsonl::*;
pub use repository::*;
pub use stubs::*;
