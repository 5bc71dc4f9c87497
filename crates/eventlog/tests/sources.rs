use chrono::{TimeZone, Utc};
use eventlog::{EventLogError, EventLogSource, EventRecord, EventType, InMemoryEventLog, JsonLinesEventLog, Origin};
use serde_json::json;
use std::io::Write;
use uuid::Uuid;

fn at(min: u32) -> chrono::DateTime<Utc> {
  Utc.with_ymd_and_hms(2022, 5, 1, 10, min, 0).unwrap()
}

#[test]
fn in_memory_filters_by_type_and_update() {
  let log = InMemoryEventLog::new();
  assert!(log.is_empty().unwrap());
  log.append(EventRecord::new(EventType::CreateUpdate, at(0), Origin::for_update("u1"), json!({}))).unwrap();
  log.append(EventRecord::new(EventType::FlowDefinition,
                              at(1),
                              Origin::for_update("u1"),
                              json!({"flow_definition": {"output_dataset": "silver", "input_datasets": ["bronze"]}})))
     .unwrap();
  log.append(EventRecord::new(EventType::CreateUpdate, at(2), Origin::for_update("u2"), json!({}))).unwrap();

  assert!(!log.is_empty().unwrap());
  assert_eq!(log.len().unwrap(), 3);
  assert_eq!(log.read_by_type(&EventType::CreateUpdate).unwrap().len(), 2);
  let u1 = log.read_update("u1").unwrap();
  assert_eq!(u1.len(), 2);
  assert!(u1.iter().all(|r| r.belongs_to("u1")));
}

#[test]
fn json_lines_file_is_read_in_log_order() {
  let path = std::env::temp_dir().join(format!("eventlog-{}.jsonl", Uuid::new_v4()));
  {
    let mut f = std::fs::File::create(&path).unwrap();
    for i in 0..20u32 {
      let r = EventRecord::new(EventType::CreateUpdate, at(i), Origin::for_update(&format!("u{}", i)), json!({}));
      writeln!(f, "{}", serde_json::to_string(&r).unwrap()).unwrap();
    }
    writeln!(f, "not json at all").unwrap();
  }

  let source = JsonLinesEventLog::new(&path);
  let records = source.read_events().unwrap();
  assert_eq!(records.len(), 20);
  for (i, r) in records.iter().enumerate() {
    assert_eq!(r.update_id(), Some(format!("u{}", i).as_str()));
  }
  std::fs::remove_file(&path).ok();
}

#[test]
fn missing_file_is_storage_error() {
  let source = JsonLinesEventLog::new("/nonexistent/dir/events.jsonl");
  match source.read_events() {
    Err(EventLogError::Storage(_)) => {}
    other => panic!("se esperaba Storage, se obtuvo {:?}", other),
  }
}

#[test]
fn json_lines_file_skips_non_utf8_line() {
  let path = std::env::temp_dir().join(format!("eventlog-{}.jsonl", Uuid::new_v4()));
  {
    let mut f = std::fs::File::create(&path).unwrap();
    let r = EventRecord::new(EventType::CreateUpdate, at(0), Origin::for_update("u1"), json!({}));
    writeln!(f, "{}", serde_json::to_string(&r).unwrap()).unwrap();
    f.write_all(b"\xff\xfe garbage\n").unwrap();
  }

  let source = JsonLinesEventLog::new(&path);
  assert_eq!(source.path(), path.as_path());
  let records = source.read_events().expect("una línea inválida no debe abortar la lectura");
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].update_id(), Some("u1"));
  std::fs::remove_file(&path).ok();
}
