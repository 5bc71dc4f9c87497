// Archivo: service.rs
// Propósito: implementar `EventLogQueries`, una capa orquestadora que lee
// una instantánea de la fuente y aplica las consultas del crate. Pensada
// para ser invocada desde un binario de reportes o desde otros servicios.
use crate::audit::{self, AuditEntry};
use crate::latest::{self, RunSummary};
use crate::lineage::{LineageGraph, LineageLevels};
use crate::quality::{self, ExpectationSummary};
use eventlog::{EventLogSource, FlowDefinition, Result};
use indexmap::IndexMap;
use std::sync::Arc;

/// Servicio de alto nivel sobre una fuente del log de eventos.
///
/// Cada operación lee una instantánea nueva de la fuente, por lo que el
/// servicio no guarda estado entre llamadas.
pub struct EventLogQueries<S> where S: EventLogSource
{
  source: Arc<S>,
}

impl<S> EventLogQueries<S> where S: EventLogSource
{
  pub fn new(source: Arc<S>) -> Self {
    Self { source }
  }

  /// `update_id` de la ejecución más reciente.
  pub fn latest_update_id(&self) -> Result<String> {
    latest::latest(&self.source.read_events()?)
  }

  /// Las `n` ejecuciones más recientes.
  pub fn recent_updates(&self, n: usize) -> Result<Vec<RunSummary>> {
    Ok(latest::latest_n(&self.source.read_events()?, n))
  }

  /// Acciones de usuario de todo el log.
  pub fn audit_trail(&self) -> Result<Vec<AuditEntry>> {
    Ok(audit::audit(&self.source.read_events()?))
  }

  /// Grafo de linaje de una ejecución.
  pub fn lineage_graph(&self, update_id: &str) -> Result<LineageGraph> {
    let records = self.source.read_update(update_id)?;
    Ok(LineageGraph::from_records(&records, update_id))
  }

  /// Linaje directo (salida -> entradas) de una ejecución.
  pub fn flow_definitions(&self, update_id: &str) -> Result<Vec<FlowDefinition>> {
    Ok(self.lineage_graph(update_id)?.flow_definitions())
  }

  /// Ancestros de `root` por profundidad dentro de una ejecución.
  pub fn lineage(&self, update_id: &str, root: &str, max_depth: usize) -> Result<LineageLevels> {
    self.lineage_graph(update_id)?.resolve(root, max_depth)
  }

  /// Ancestros por profundidad de todos los datasets de una ejecución.
  pub fn lineage_all(&self, update_id: &str, max_depth: usize) -> Result<IndexMap<String, LineageLevels>> {
    self.lineage_graph(update_id)?.resolve_all(max_depth)
  }

  /// Métricas de calidad agregadas de una ejecución.
  pub fn data_quality(&self, update_id: &str) -> Result<Vec<ExpectationSummary>> {
    let records = self.source.read_update(update_id)?;
    Ok(quality::aggregate(&records, update_id))
  }
}
