//! eventlog-queries: consultas sobre el log de eventos de pipelines
//!
//! Funciones puras sobre una instantánea de `eventlog::EventRecord`:
//! - `latest`: ejecución más reciente (y las últimas N),
//! - `audit`: traza de acciones de usuario,
//! - `lineage`: grafo de linaje por ejecución y ancestros por profundidad,
//! - `quality`: agregado de expectations por dataset.
//!
//! `EventLogQueries` combina una `EventLogSource` con estas consultas.

pub mod audit;
pub mod latest;
pub mod lineage;
pub mod quality;
pub mod service;

pub use audit::AuditEntry;
pub use latest::RunSummary;
pub use lineage::{LineageEdge, LineageGraph, LineageLevels, MAX_LINEAGE_DEPTH};
pub use quality::ExpectationSummary;
pub use service::EventLogQueries;
