// Archivo: domain.rs
// Propósito: tipos del dominio del log de eventos. `EventRecord` es la fila
// inmutable del log; `EventDetails` es la unión etiquetada que resulta de
// parsear su `details` según el `event_type`.
use crate::errors::{EventLogError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tipo de evento del log. Los tipos que no usan las consultas se conservan
/// como `Other` en lugar de rechazar el registro.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    CreateUpdate,
    UserAction,
    FlowDefinition,
    FlowProgress,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::CreateUpdate => "create_update",
            EventType::UserAction => "user_action",
            EventType::FlowDefinition => "flow_definition",
            EventType::FlowProgress => "flow_progress",
            EventType::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "create_update" => EventType::CreateUpdate,
            "user_action" => EventType::UserAction,
            "flow_definition" => EventType::FlowDefinition,
            "flow_progress" => EventType::FlowProgress,
            other => EventType::Other(other.to_string()),
        })
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        t.as_str().to_string()
    }
}

/// Identificadores de origen del evento. Sólo `update_id` es relevante para
/// las consultas; las claves desconocidas se ignoran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Origin {
    pub update_id: Option<String>,
    pub pipeline_id: Option<String>,
    pub pipeline_name: Option<String>,
    pub flow_id: Option<String>,
    pub flow_name: Option<String>,
}

impl Origin {
    /// Origen mínimo asociado a una ejecución (update).
    pub fn for_update(update_id: &str) -> Self {
        Self { update_id: Some(update_id.to_string()),
               ..Default::default() }
    }
}

/// Registro inmutable del log de eventos.
///
/// `details` se guarda sin parsear: puede llegar como objeto JSON o como
/// string con un objeto JSON dentro (la plataforma lo almacena como
/// columna de texto). Se interpreta bajo demanda con `details()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default = "Uuid::nil")]
    pub id: Uuid,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub details: JsonValue,
}

impl EventRecord {
    /// Construye un registro con id aleatorio.
    pub fn new(event_type: EventType, timestamp: DateTime<Utc>, origin: Origin, details: JsonValue) -> Self {
        Self { id: Uuid::new_v4(),
               event_type,
               timestamp,
               origin,
               details }
    }

    /// `update_id` del origen, si existe.
    pub fn update_id(&self) -> Option<&str> {
        self.origin.update_id.as_deref()
    }

    /// Verdadero si el registro pertenece a la ejecución `update_id`.
    pub fn belongs_to(&self, update_id: &str) -> bool {
        self.update_id() == Some(update_id)
    }

    /// Parsea `details` según `event_type`.
    ///
    /// Devuelve `EventLogError::MalformedRecord` cuando el payload no tiene
    /// la forma esperada; las consultas tratan ese caso como "sin
    /// contribución" y continúan con el resto del log.
    pub fn details(&self) -> Result<EventDetails> {
        let payload = self.payload()?;
        match &self.event_type {
            EventType::CreateUpdate => {
                let sec: CreateUpdateSection = section(&payload, "create_update")?.unwrap_or_default();
                Ok(EventDetails::CreateUpdate { cause: sec.cause,
                                                full_refresh: sec.full_refresh })
            }
            EventType::UserAction => {
                let sec: UserActionSection = required_section(&payload, "user_action")?;
                Ok(EventDetails::UserAction { action: sec.action,
                                              user_name: sec.user_name })
            }
            EventType::FlowDefinition => {
                let sec: FlowDefinitionSection = required_section(&payload, "flow_definition")?;
                let inputs = sec.input_datasets.map(DatasetList::into_names).unwrap_or_default();
                Ok(EventDetails::FlowDefinition(FlowDefinition::new(sec.output_dataset, inputs)))
            }
            EventType::FlowProgress => {
                let sec: FlowProgressSection = required_section(&payload, "flow_progress")?;
                let expectations = sec.data_quality
                                      .and_then(|dq| dq.expectations)
                                      .unwrap_or_default();
                Ok(EventDetails::FlowProgress { status: sec.status,
                                                expectations })
            }
            EventType::Other(_) => Ok(EventDetails::Other),
        }
    }

    /// Normaliza `details` a un objeto JSON (decodificando el string si hace
    /// falta).
    fn payload(&self) -> Result<Cow<'_, JsonValue>> {
        match &self.details {
            JsonValue::Object(_) => Ok(Cow::Borrowed(&self.details)),
            JsonValue::Null => Ok(Cow::Owned(JsonValue::Object(Default::default()))),
            JsonValue::String(raw) => {
                let v: JsonValue = serde_json::from_str(raw).map_err(|e| {
                                                               EventLogError::MalformedRecord(format!("details de {} no es JSON: {}",
                                                                                                      self.id, e))
                                                           })?;
                if v.is_object() {
                    Ok(Cow::Owned(v))
                } else {
                    Err(EventLogError::MalformedRecord(format!("details de {} no es un objeto", self.id)))
                }
            }
            _ => Err(EventLogError::MalformedRecord(format!("details de {} no es un objeto", self.id))),
        }
    }
}

/// Payload parseado, una forma concreta por `event_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventDetails {
    CreateUpdate { cause: Option<String>, full_refresh: bool },
    UserAction { action: String, user_name: Option<String> },
    FlowDefinition(FlowDefinition),
    FlowProgress { status: Option<String>, expectations: Vec<Expectation> },
    Other,
}

/// Entradas declaradas de un dataset de salida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub output_dataset: String,
    pub input_datasets: Vec<String>,
}

impl FlowDefinition {
    /// Crea la definición eliminando entradas repetidas (se conserva el
    /// orden de primera aparición).
    pub fn new(output_dataset: impl Into<String>, input_datasets: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(input_datasets.len());
        for name in input_datasets {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { output_dataset: output_dataset.into(),
               input_datasets: unique }
    }
}

/// Métrica de calidad de datos de una restricción con nombre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    pub name: String,
    pub dataset: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub passed_records: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub failed_records: u64,
}

// Los contadores son enteros anulables en el log; SUM ignora los nulos.
fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
    where D: Deserializer<'de>
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

#[derive(Debug, Default, Deserialize)]
struct CreateUpdateSection {
    #[serde(default)]
    cause: Option<String>,
    #[serde(default)]
    full_refresh: bool,
}

#[derive(Debug, Deserialize)]
struct UserActionSection {
    action: String,
    #[serde(default)]
    user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlowDefinitionSection {
    output_dataset: String,
    #[serde(default)]
    input_datasets: Option<DatasetList>,
}

#[derive(Debug, Deserialize)]
struct FlowProgressSection {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data_quality: Option<DataQualitySection>,
}

#[derive(Debug, Deserialize)]
struct DataQualitySection {
    #[serde(default)]
    expectations: Option<Vec<Expectation>>,
}

/// `input_datasets` llega como arreglo JSON o como string que lo contiene.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetList {
    Names(Vec<String>),
    Encoded(String),
}

impl DatasetList {
    fn into_names(self) -> Vec<String> {
        match self {
            DatasetList::Names(names) => names,
            DatasetList::Encoded(raw) => quoted_names(&raw),
        }
    }
}

/// Extrae los textos entre comillas dobles: `["a","b"]` -> `a`, `b`.
fn quoted_names(raw: &str) -> Vec<String> {
    raw.split('"')
       .skip(1)
       .step_by(2)
       .filter(|s| !s.is_empty())
       .map(str::to_string)
       .collect()
}

fn section<T: DeserializeOwned>(payload: &JsonValue, key: &str) -> Result<Option<T>> {
    match payload.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => T::deserialize(v).map(Some)
                                    .map_err(|e| EventLogError::MalformedRecord(format!("{}: {}", key, e))),
    }
}

fn required_section<T: DeserializeOwned>(payload: &JsonValue, key: &str) -> Result<T> {
    section(payload, key)?.ok_or_else(|| EventLogError::MalformedRecord(format!("falta la sección {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(event_type: EventType, details: JsonValue) -> EventRecord {
        EventRecord::new(event_type, Utc::now(), Origin::for_update("u1"), details)
    }

    #[test]
    fn event_type_roundtrips_unknown_tags() {
        let t: EventType = serde_json::from_value(json!("maintenance_progress")).unwrap();
        assert_eq!(t, EventType::Other("maintenance_progress".into()));
        assert_eq!(serde_json::to_value(&t).unwrap(), json!("maintenance_progress"));
        let t: EventType = serde_json::from_value(json!("flow_definition")).unwrap();
        assert_eq!(t, EventType::FlowDefinition);
    }

    #[test]
    fn quoted_names_matches_notebook_extraction() {
        assert_eq!(quoted_names(r#"["raw","ref"]"#), vec!["raw", "ref"]);
        assert_eq!(quoted_names(r#"[ "a" , "b.c" ]"#), vec!["a", "b.c"]);
        assert!(quoted_names("[]").is_empty());
    }

    #[test]
    fn flow_definition_accepts_encoded_inputs() {
        let r = record(EventType::FlowDefinition,
                       json!({"flow_definition": {"output_dataset": "silver", "input_datasets": "[\"bronze\",\"bronze\"]"}}));
        match r.details().unwrap() {
            EventDetails::FlowDefinition(def) => {
                assert_eq!(def.output_dataset, "silver");
                assert_eq!(def.input_datasets, vec!["bronze"]);
            }
            other => panic!("variante inesperada: {:?}", other),
        }
    }

    #[test]
    fn details_as_string_is_decoded() {
        let raw = json!({"user_action": {"action": "START", "user_name": "ana@example.com"}}).to_string();
        let r = record(EventType::UserAction, JsonValue::String(raw));
        assert_eq!(r.details().unwrap(),
                   EventDetails::UserAction { action: "START".into(),
                                              user_name: Some("ana@example.com".into()) });
    }

    #[test]
    fn malformed_details_are_record_local() {
        let r = record(EventType::FlowProgress, JsonValue::String("{not json".into()));
        let err = r.details().unwrap_err();
        assert!(err.is_record_local());

        let r = record(EventType::FlowProgress,
                       json!({"flow_progress": {"data_quality": {"expectations": "oops"}}}));
        assert!(r.details().unwrap_err().is_record_local());
    }

    #[test]
    fn null_counts_become_zero() {
        let r = record(EventType::FlowProgress,
                       json!({"flow_progress": {"status": "COMPLETED", "data_quality": {"expectations": [
                           {"name": "valid_id", "dataset": "orders", "passed_records": null, "failed_records": 4}
                       ]}}}));
        match r.details().unwrap() {
            EventDetails::FlowProgress { status, expectations } => {
                assert_eq!(status.as_deref(), Some("COMPLETED"));
                assert_eq!(expectations[0].passed_records, 0);
                assert_eq!(expectations[0].failed_records, 4);
            }
            other => panic!("variante inesperada: {:?}", other),
        }
    }
}
