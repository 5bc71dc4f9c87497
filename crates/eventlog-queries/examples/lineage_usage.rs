use eventlog::errors::EventLogError;
use eventlog::{EventRecord, EventType, InMemoryEventLog, Origin};
use eventlog_queries::EventLogQueries;
use serde_json::json;
use std::sync::Arc;

fn main() -> Result<(), EventLogError> {
    // Log en memoria con una ejecución y tres tablas encadenadas
    let log = Arc::new(InMemoryEventLog::new());
    let now = chrono::Utc::now();
    log.append(EventRecord::new(EventType::CreateUpdate, now, Origin::for_update("demo"), json!({})))?;
    for (output, inputs) in [("raw", json!([])), ("clean", json!(["raw"])), ("report", json!(["clean", "raw"]))] {
        let details = json!({"flow_definition": {"output_dataset": output, "input_datasets": inputs}});
        log.append(EventRecord::new(EventType::FlowDefinition, now, Origin::for_update("demo"), details))?;
    }

    let queries = EventLogQueries::new(log);
    let update_id = queries.latest_update_id()?;
    println!("latest update: {}\n", update_id);

    // `raw` aparece a profundidad 1 y 2 de `report`
    for (depth, datasets) in queries.lineage(&update_id, "report", 3)? {
        println!("L{}: {:?}", depth, datasets);
    }
    Ok(())
}
