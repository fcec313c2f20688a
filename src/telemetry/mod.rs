//! Flight-log tables built from the decoded messages the client uploads.

pub mod analysis;

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Message types that carry file/parameter dumps rather than time series.
const SKIPPED_TYPES: [&str; 2] = ["FILE", "PARM"];

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// One message type's samples, column-major, columns in upload order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self { name: name.into(), columns }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    /// Builds a table from `{ field: [values] | { index: value } }`.
    /// Fails when `fields` is not an object or its columns differ in length.
    fn from_fields(name: String, fields: &Value) -> Result<Self, String> {
        let Value::Object(fields) = fields else {
            return Err("expected an object of fields".to_string());
        };
        let columns: Vec<Column> = fields
            .iter()
            .filter_map(|(field, values)| {
                let values = match values {
                    Value::Array(items) => items.clone(),
                    Value::Object(by_index) => by_index.values().cloned().collect(),
                    _ => return None,
                };
                Some(Column { name: field.clone(), values })
            })
            .collect();

        if let Some(first) = columns.first() {
            let rows = first.values.len();
            if let Some(uneven) = columns.iter().find(|c| c.values.len() != rows) {
                return Err(format!(
                    "column {} has {} values, expected {rows} like {}",
                    uneven.name,
                    uneven.values.len(),
                    first.name
                ));
            }
        }
        Ok(Self::new(name, columns))
    }
}

/// `GPS[0]` becomes `GPS_0`; plain names pass through.
pub fn table_name(message_type: &str) -> String {
    match message_type.split_once('[') {
        Some((base, rest)) => {
            let instance = rest.split(']').next().unwrap_or_default();
            format!("{base}_{instance}")
        }
        None => message_type.to_string(),
    }
}

/// Converts the uploaded message map into tables, preserving upload order.
pub fn ingest(parsed_messages: &Map<String, Value>) -> Vec<Table> {
    let mut tables = Vec::new();
    for (message_type, fields) in parsed_messages {
        if SKIPPED_TYPES.contains(&message_type.as_str()) {
            debug!("Skipping {message_type} messages");
            continue;
        }
        match Table::from_fields(table_name(message_type), fields) {
            Ok(table) => tables.push(table),
            Err(reason) => warn!("Ignoring message type {message_type}: {reason}"),
        }
    }
    tables
}

/// Short overview of every table, embedded in the agent's preamble.
pub fn digest(tables: &[Table]) -> String {
    let names: Vec<&str> = tables.iter().map(Table::name).collect();
    let mut out = format!("Available tables: {}\n", names.join(", "));
    for table in tables {
        let columns: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        out.push_str(&format!(
            "\n{} ({} rows): {}",
            table.name,
            table.row_count(),
            columns.join(", ")
        ));
    }
    out
}
