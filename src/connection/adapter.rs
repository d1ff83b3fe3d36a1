//! DuckDB connection adapter
//!
//! Forwards statements to a native `duckdb::Connection` and shapes the
//! results into `Row`s. Every call blocks until DuckDB returns; nothing is
//! queued, retried or reordered.

use super::log::QueryLogEntry;
use super::values::{duckdb_to_json, json_to_duckdb};
use super::DatabaseConnection;
use crate::config::ConnectionConfig;
use crate::connector::{Connector, DuckDbConnector};
use crate::error::{Error, Result};
use crate::query::{DuckDbProcessor, Processor, Query, QueryGrammar};
use crate::schema::{SchemaBuilder, SchemaGrammar};
use crate::types::{Expression, JsonValue, Row, DRIVER_NAME};
use duckdb::{params_from_iter, Connection};
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::ops::{ControlFlow, Range};
use std::sync::LazyLock;
use std::time::Instant;

/// Statement terminator: `;` plus trailing whitespace
static TERMINATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";\s*").unwrap());

/// A DuckDB connection exposed through the generic connection contract
pub struct DuckDbConnection {
    /// Native handle
    conn: Connection,
    /// Config the handle was opened with
    config: ConnectionConfig,
    query_grammar: QueryGrammar,
    schema_grammar: SchemaGrammar,
    processor: DuckDbProcessor,
    /// Statements are logged but not executed while set
    pretending: Cell<bool>,
    logging_queries: Cell<bool>,
    query_log: RefCell<Vec<QueryLogEntry>>,
    records_modified: Cell<bool>,
}

impl std::fmt::Debug for DuckDbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbConnection")
            .field("name", &self.config.name)
            .field("database", &self.config.database)
            .field("prefix", &self.config.prefix)
            .finish_non_exhaustive()
    }
}

impl DuckDbConnection {
    /// Wrap an open handle
    pub fn new(conn: Connection, config: ConnectionConfig) -> Self {
        let prefix = config.prefix.clone();
        Self {
            conn,
            query_grammar: QueryGrammar::with_prefix(prefix.clone()),
            schema_grammar: SchemaGrammar::with_prefix(prefix),
            processor: DuckDbProcessor::new(),
            config,
            pretending: Cell::new(false),
            logging_queries: Cell::new(false),
            query_log: RefCell::new(Vec::new()),
            records_modified: Cell::new(false),
        }
    }

    /// Open a connection through the DuckDB connector
    pub fn connect(config: ConnectionConfig) -> Result<Self> {
        let conn = DuckDbConnector::new().connect(&config)?;
        Ok(Self::new(conn, config))
    }

    /// Open a fresh in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::connect(ConnectionConfig::in_memory())
    }

    // ========================================================================
    // Statement execution
    // ========================================================================

    /// Stream the rows of a select to `visit`, one at a time.
    ///
    /// Returning `ControlFlow::Break` from `visit` stops reading further rows.
    pub fn cursor<F>(&self, query: &str, bindings: &[JsonValue], mut visit: F) -> Result<()>
    where
        F: FnMut(Row) -> ControlFlow<()>,
    {
        self.run(query, bindings, |query, bindings| {
            if self.pretending() {
                return Ok(());
            }
            self.for_each_row(query, bindings, &mut visit)
        })
    }

    /// Run `f` without sending anything to DuckDB and return what would have run
    pub fn pretend<F>(&self, f: F) -> Result<Vec<QueryLogEntry>>
    where
        F: FnOnce(&Self) -> Result<()>,
    {
        let was_logging = self.logging_queries.replace(true);
        let saved_log = self.query_log.take();
        self.pretending.set(true);

        let result = f(self);

        self.pretending.set(false);
        self.logging_queries.set(was_logging);
        let pretended = self.query_log.replace(saved_log);

        result.map(|()| pretended)
    }

    /// Whether statements are currently being pretended
    pub fn pretending(&self) -> bool {
        self.pretending.get()
    }

    /// Log every statement run from now on
    pub fn enable_query_log(&self) {
        self.logging_queries.set(true);
    }

    pub fn disable_query_log(&self) {
        self.logging_queries.set(false);
    }

    pub fn logging(&self) -> bool {
        self.logging_queries.get()
    }

    /// Statements logged so far
    pub fn query_log(&self) -> Vec<QueryLogEntry> {
        self.query_log.borrow().clone()
    }

    /// Clear the query log
    pub fn flush_query_log(&self) {
        self.query_log.borrow_mut().clear();
    }

    /// Whether any write has gone through this connection
    pub fn records_have_been_modified(&self) -> bool {
        self.records_modified.get()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Connection identifier from the config
    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    /// Database path (or ":memory:")
    pub fn database_name(&self) -> &str {
        &self.config.database
    }

    /// Change the table prefix used by both grammars
    pub fn set_table_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        self.query_grammar.set_table_prefix(prefix.clone());
        self.schema_grammar.set_table_prefix(prefix.clone());
        self.config.prefix = prefix;
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Engine option from the config's option bag
    pub fn config_value(&self, key: &str) -> Option<&JsonValue> {
        self.config.config.get(key)
    }

    pub fn driver_name(&self) -> &'static str {
        DRIVER_NAME
    }

    /// Version string reported by the engine
    pub fn server_version(&self) -> Result<String> {
        Ok(self.conn.query_row("select version()", [], |row| row.get(0))?)
    }

    /// The native DuckDB handle
    pub fn raw(&self) -> &Connection {
        &self.conn
    }

    /// Start a query against `table`
    pub fn table(&self, table: impl Into<String>) -> Query {
        Query::table(table)
    }

    /// Raw SQL expression
    pub fn raw_expr(&self, sql: impl Into<String>) -> Expression {
        Expression::new(sql)
    }

    /// Schema builder over this connection
    pub fn schema_builder(&self) -> SchemaBuilder<'_, Self> {
        SchemaBuilder::new(self)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Time `f`, log the statement and pass the result through
    fn run<T, F>(&self, query: &str, bindings: &[JsonValue], f: F) -> Result<T>
    where
        F: FnOnce(&str, &[JsonValue]) -> Result<T>,
    {
        let start = Instant::now();
        let result = f(query, bindings);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(_) => {
                tracing::debug!(
                    sql = query,
                    bindings = bindings.len(),
                    elapsed_ms,
                    pretend = self.pretending(),
                    "Executed statement"
                );
                if self.logging_queries.get() {
                    self.query_log.borrow_mut().push(QueryLogEntry::new(
                        query,
                        bindings.to_vec(),
                        elapsed_ms,
                    ));
                }
            }
            Err(e) => tracing::debug!(sql = query, error = %e, "Statement failed"),
        }

        result
    }

    fn for_each_row<F>(&self, query: &str, bindings: &[JsonValue], visit: &mut F) -> Result<()>
    where
        F: FnMut(Row) -> ControlFlow<()>,
    {
        let mut stmt = self.conn.prepare(query)?;
        let mut rows = stmt.query(params_from_iter(bindings.iter().map(json_to_duckdb)))?;
        let columns: Vec<String> = rows
            .as_ref()
            .map(duckdb::Statement::column_names)
            .unwrap_or_default();

        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (i, name) in columns.iter().enumerate() {
                let value: duckdb::types::Value = row.get(i)?;
                record.insert(name.clone(), duckdb_to_json(value));
            }
            if visit(record).is_break() {
                break;
            }
        }

        Ok(())
    }

    fn execute(&self, query: &str, bindings: &[JsonValue]) -> Result<usize> {
        let mut stmt = self.conn.prepare(query)?;
        Ok(stmt.execute(params_from_iter(bindings.iter().map(json_to_duckdb)))?)
    }
}

impl DatabaseConnection for DuckDbConnection {
    fn select(&self, query: &str, bindings: &[JsonValue]) -> Result<Vec<Row>> {
        self.run(query, bindings, |query, bindings| {
            if self.pretending() {
                return Ok(Vec::new());
            }
            let mut rows = Vec::new();
            self.for_each_row(query, bindings, &mut |row| {
                rows.push(row);
                ControlFlow::Continue(())
            })?;
            Ok(rows)
        })
    }

    fn statement(&self, query: &str, bindings: &[JsonValue]) -> Result<bool> {
        self.run(query, bindings, |query, bindings| {
            if self.pretending() {
                return Ok(true);
            }

            let statements = split_statements(query);
            if statements.len() > 1 {
                tracing::debug!(count = statements.len(), "Executing statement batch");
            }

            // A single statement gets every binding; in a batch each statement
            // consumes as many as it has placeholders.
            let batch = statements.len() > 1;
            let mut remaining = bindings;
            for (i, sql) in statements.iter().enumerate() {
                let mut stmt = self.conn.prepare(sql)?;
                let own = if batch {
                    let (own, rest) =
                        remaining.split_at(stmt.parameter_count().min(remaining.len()));
                    if i + 1 == statements.len() && !rest.is_empty() {
                        return Err(Error::invalid_query(format!(
                            "{} binding(s) left over after the last statement",
                            rest.len()
                        )));
                    }
                    remaining = rest;
                    own
                } else {
                    remaining
                };
                stmt.execute(params_from_iter(own.iter().map(json_to_duckdb)))?;
            }

            self.records_modified.set(true);
            Ok(true)
        })
    }

    fn affecting_statement(&self, query: &str, bindings: &[JsonValue]) -> Result<usize> {
        self.run(query, bindings, |query, bindings| {
            if self.pretending() {
                return Ok(0);
            }
            let changed = self.execute(query, bindings)?;
            if changed > 0 {
                self.records_modified.set(true);
            }
            Ok(changed)
        })
    }

    fn unprepared(&self, query: &str) -> Result<bool> {
        self.run(query, &[], |query, _| {
            if self.pretending() {
                return Ok(true);
            }
            self.conn.execute_batch(query)?;
            self.records_modified.set(true);
            Ok(true)
        })
    }

    fn table_prefix(&self) -> &str {
        &self.config.prefix
    }

    fn query_grammar(&self) -> &QueryGrammar {
        &self.query_grammar
    }

    fn schema_grammar(&self) -> &SchemaGrammar {
        &self.schema_grammar
    }

    fn post_processor(&self) -> &dyn Processor {
        &self.processor
    }
}

/// Split SQL text into statements at `;` terminators followed by a word.
///
/// Terminators inside `'...'` strings and `"..."` identifiers are skipped.
pub fn split_statements(sql: &str) -> Vec<&str> {
    let sql = sql.trim();
    let quoted = quoted_regions(sql);
    let mut parts = Vec::new();
    let mut start = 0;

    for m in TERMINATOR_REGEX.find_iter(sql) {
        if quoted.iter().any(|region| region.contains(&m.start())) {
            continue;
        }
        let next = sql[m.end()..].chars().next();
        if next.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            parts.push(&sql[start..m.start()]);
            start = m.end();
        }
    }
    parts.push(&sql[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Byte ranges covered by quoted strings and identifiers.
///
/// A doubled quote character is an escape. An unterminated quote runs to the end.
fn quoted_regions(sql: &str) -> Vec<Range<usize>> {
    let bytes = sql.as_bytes();
    let mut regions = Vec::new();
    let mut open: Option<(u8, usize)> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match open {
            None if b == b'\'' || b == b'"' => open = Some((b, i)),
            Some((quote, start)) if b == quote => {
                if bytes.get(i + 1) == Some(&quote) {
                    i += 1;
                } else {
                    regions.push(start..i + 1);
                    open = None;
                }
            }
            _ => {}
        }
        i += 1;
    }
    if let Some((_, start)) = open {
        regions.push(start..bytes.len());
    }

    regions
}
