//! Per-upload chat sessions: the telemetry tables, the agent's memory of the
//! conversation, and cached table analyses.

pub mod store;

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::models::Turn;
use crate::telemetry::{self, analysis, Table};

/// Turns replayed to the agent; older ones are forgotten.
const MAX_HISTORY: usize = 10;
const MAX_CACHED_ANALYSES: usize = 20;

#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    tables: Vec<Table>,
    digest: String,
    history: VecDeque<Turn>,
    analyses: VecDeque<(String, String)>,
    last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, tables: Vec<Table>, now: DateTime<Utc>) -> Self {
        let digest = telemetry::digest(&tables);
        Self {
            id: id.into(),
            tables,
            digest,
            history: VecDeque::new(),
            analyses: VecDeque::new(),
            last_seen: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn history(&self) -> impl Iterator<Item = &Turn> {
        self.history.iter()
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    pub fn record_turn(&mut self, turn: Turn) {
        if self.history.len() == MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(turn);
    }

    /// Summary statistics for one table, cached per session.
    pub fn analysis(&mut self, table_name: &str) -> String {
        if let Some((_, cached)) = self.analyses.iter().find(|(name, _)| name == table_name) {
            return cached.clone();
        }

        let result = match self.tables.iter().find(|t| t.name() == table_name) {
            Some(table) => analysis::analyse(table),
            None => {
                let available: Vec<&str> = self.tables.iter().map(Table::name).collect();
                format!(
                    "Error: Table '{table_name}' not found. Available tables: {}",
                    available.join(", ")
                )
            }
        };

        if self.analyses.len() == MAX_CACHED_ANALYSES {
            self.analyses.pop_front();
        }
        self.analyses.push_back((table_name.to_string(), result.clone()));
        result
    }

    /// Digest of all tables plus the analysis of every table the question names.
    pub fn prompt_context(&mut self, question: &str) -> String {
        let mentioned: Vec<String> = self
            .tables
            .iter()
            .map(|t| t.name().to_string())
            .filter(|name| mentions(question, name))
            .collect();

        let mut context = self.digest.clone();
        for name in mentioned {
            context.push_str("\n\n");
            context.push_str(&self.analysis(&name));
        }
        context
    }
}

/// Case-insensitive whole-word match; `_` counts as part of a word.
fn mentions(question: &str, table_name: &str) -> bool {
    let needle = table_name.to_ascii_lowercase();
    question
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| word.to_ascii_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::telemetry::Column;

    fn session_with(tables: Vec<Table>) -> Session {
        Session::new("s-1", tables, Utc::now())
    }

    fn att() -> Table {
        Table::new(
            "ATT",
            vec![Column { name: "Roll".into(), values: vec![json!(1), json!(2), json!(3)] }],
        )
    }

    #[test]
    fn history_keeps_the_last_ten_turns() {
        let mut session = session_with(vec![]);
        for i in 0..12 {
            session.record_turn(Turn::new(format!("q{i}"), format!("a{i}")));
        }

        let questions: Vec<&str> = session.history().map(|t| t.question.as_str()).collect();
        assert_eq!(questions.len(), 10);
        assert_eq!(questions.first(), Some(&"q2"));
        assert_eq!(questions.last(), Some(&"q11"));
    }

    #[test]
    fn unknown_table_analysis_lists_available_tables() {
        let mut session = session_with(vec![att()]);
        assert_eq!(
            session.analysis("GPS_0"),
            "Error: Table 'GPS_0' not found. Available tables: ATT"
        );
    }

    #[test]
    fn analysis_is_cached() {
        let mut session = session_with(vec![att()]);
        let first = session.analysis("ATT");
        assert_eq!(session.analyses.len(), 1);
        assert_eq!(session.analysis("ATT"), first);
        assert_eq!(session.analyses.len(), 1);
    }

    #[test]
    fn analysis_cache_is_bounded() {
        let mut session = session_with(vec![]);
        for i in 0..25 {
            session.analysis(&format!("T{i}"));
        }
        assert_eq!(session.analyses.len(), MAX_CACHED_ANALYSES);
        assert_eq!(session.analyses.front().map(|(n, _)| n.as_str()), Some("T5"));
    }

    #[test]
    fn prompt_context_includes_mentioned_tables_only() {
        let gps = Table::new("GPS_0", vec![]);
        let mut session = session_with(vec![att(), gps]);

        let context = session.prompt_context("Were there spikes in att roll?");

        assert!(context.starts_with("Available tables: ATT, GPS_0"));
        assert!(context.contains("Summary of `ATT` Table"));
        assert!(!context.contains("GPS_0 has no numeric"));
    }

    #[test]
    fn mentions_is_whole_word() {
        assert!(mentions("what about GPS_0?", "GPS_0"));
        assert!(!mentions("what about GPSB?", "GPS"));
        assert!(mentions("gps, please", "GPS"));
    }
}
