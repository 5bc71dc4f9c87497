// lineage.rs
// Linaje de datasets a partir de los eventos `flow_definition` de una
// ejecución. El grafo se indexa por dataset de salida (salida -> entradas) y
// se recorre en anchura con un contador de profundidad.
use eventlog::{EventDetails, EventLogError, EventRecord, EventType, FlowDefinition, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Profundidad (1..=max_depth) -> datasets ancestros a esa distancia.
pub type LineageLevels = BTreeMap<usize, BTreeSet<String>>;

/// Profundidad máxima aceptada por `resolve`. Valores mayores fallan con
/// `InvalidArgument`.
pub const MAX_LINEAGE_DEPTH: usize = 1024;

/// Arista dirigida `input_dataset -> output_dataset`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageEdge {
  pub input_dataset: String,
  pub output_dataset: String,
}

impl LineageEdge {
  pub fn new(input_dataset: impl Into<String>, output_dataset: impl Into<String>) -> Self {
    Self { input_dataset: input_dataset.into(), output_dataset: output_dataset.into() }
  }
}

/// Grafo de linaje indexado por dataset de salida.
///
/// Se supone acíclico pero no se verifica: el recorrido está acotado por
/// `max_depth`, así que un ciclo sólo hace reaparecer datasets cada
/// `periodo` niveles.
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
  inputs_of: IndexMap<String, Vec<String>>,
}

impl LineageGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Construye el grafo acumulando aristas sueltas.
  pub fn from_edges<I>(edges: I) -> Self
    where I: IntoIterator<Item = LineageEdge>
  {
    let mut graph = Self::new();
    for edge in edges {
      let inputs = graph.inputs_of.entry(edge.output_dataset).or_default();
      if !inputs.contains(&edge.input_dataset) {
        inputs.push(edge.input_dataset);
      }
    }
    graph
  }

  /// Construye el grafo desde definiciones de flujo. Si un dataset de salida
  /// aparece más de una vez gana la última definición.
  pub fn from_definitions<I>(definitions: I) -> Self
    where I: IntoIterator<Item = FlowDefinition>
  {
    let mut graph = Self::new();
    for def in definitions {
      graph.insert(def);
    }
    graph
  }

  /// Construye el grafo con los `flow_definition` de la ejecución
  /// `update_id`. Los registros con `details` mal formado se saltan.
  pub fn from_records(records: &[EventRecord], update_id: &str) -> Self {
    let mut graph = Self::new();
    for record in records.iter()
                         .filter(|r| r.event_type == EventType::FlowDefinition && r.belongs_to(update_id))
    {
      match record.details() {
        Ok(EventDetails::FlowDefinition(def)) => graph.insert(def),
        Ok(_) => {}
        Err(e) => log::debug!("flow_definition {} ignorado: {}", record.id, e),
      }
    }
    graph
  }

  /// Registra (o reemplaza) la definición de un dataset de salida.
  pub fn insert(&mut self, definition: FlowDefinition) {
    self.inputs_of.insert(definition.output_dataset, definition.input_datasets);
  }

  /// Entradas directas de `output`; vacío si no está definido.
  pub fn inputs_of(&self, output: &str) -> &[String] {
    self.inputs_of.get(output).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Datasets de salida en orden de primera aparición.
  pub fn outputs(&self) -> impl Iterator<Item = &str> {
    self.inputs_of.keys().map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.inputs_of.is_empty()
  }

  /// Linaje directo: una definición por dataset de salida.
  pub fn flow_definitions(&self) -> Vec<FlowDefinition> {
    self.inputs_of
        .iter()
        .map(|(out, ins)| FlowDefinition { output_dataset: out.clone(), input_datasets: ins.clone() })
        .collect()
  }

  /// Todas las aristas `input -> output` del grafo.
  pub fn edges(&self) -> Vec<LineageEdge> {
    self.inputs_of
        .iter()
        .flat_map(|(out, ins)| ins.iter().map(move |i| LineageEdge::new(i.clone(), out.clone())))
        .collect()
  }

  /// Ancestros de `root` agrupados por distancia, de 1 a `max_depth`.
  ///
  /// Todas las profundidades están presentes en el resultado; las que
  /// superan la profundidad real del grafo quedan vacías, igual que cuando
  /// `root` no aparece en el grafo. Un dataset alcanzable por caminos de
  /// distinta longitud aparece en cada una de esas profundidades.
  pub fn resolve(&self, root: &str, max_depth: usize) -> Result<LineageLevels> {
    check_depth(max_depth)?;
    let mut levels = LineageLevels::new();
    let mut frontier: BTreeSet<String> = BTreeSet::from([root.to_string()]);
    for depth in 1..=max_depth {
      if frontier.is_empty() {
        levels.insert(depth, BTreeSet::new());
        continue;
      }
      let next: BTreeSet<String> = frontier.iter()
                                           .flat_map(|d| self.inputs_of(d).iter().cloned())
                                           .collect();
      levels.insert(depth, next.clone());
      frontier = next;
    }
    Ok(levels)
  }

  /// Linaje de todos los datasets de salida, en orden de primera
  /// aparición. Se omiten las salidas sin ninguna entrada.
  pub fn resolve_all(&self, max_depth: usize) -> Result<IndexMap<String, LineageLevels>> {
    check_depth(max_depth)?;
    let mut all = IndexMap::new();
    for output in self.outputs() {
      let levels = self.resolve(output, max_depth)?;
      if levels.values().any(|s| !s.is_empty()) {
        all.insert(output.to_string(), levels);
      }
    }
    Ok(all)
  }
}

/// Resuelve el linaje de `root` sobre un conjunto de aristas.
pub fn resolve(edges: &[LineageEdge], root: &str, max_depth: usize) -> Result<LineageLevels> {
  LineageGraph::from_edges(edges.iter().cloned()).resolve(root, max_depth)
}

fn check_depth(max_depth: usize) -> Result<()> {
  if max_depth == 0 {
    return Err(EventLogError::InvalidArgument("max_depth debe ser mayor que 0".into()));
  }
  if max_depth > MAX_LINEAGE_DEPTH {
    return Err(EventLogError::InvalidArgument(format!("max_depth {} supera el máximo {}",
                                                      max_depth, MAX_LINEAGE_DEPTH)));
  }
  Ok(())
}
