//! DuckDB schema grammar
//!
//! DuckDB has no `autoincrement`; auto-incrementing columns are backed by a
//! sequence created just before the table.

use super::blueprint::{Blueprint, ColumnDefinition};
use crate::grammar::{literal, quote_string, wrap_value, Grammar};
use crate::types::QueryValue;

/// Schema grammar for DuckDB
#[derive(Debug, Clone, Default)]
pub struct SchemaGrammar {
    table_prefix: String,
}

impl Grammar for SchemaGrammar {
    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }
}

impl SchemaGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: prefix.into(),
        }
    }

    pub fn set_table_prefix(&mut self, prefix: impl Into<String>) {
        self.table_prefix = prefix.into();
    }

    // ========================================================================
    // Table creation
    // ========================================================================

    /// Every statement needed to create the blueprint's table
    pub fn compile_blueprint_create(&self, blueprint: &Blueprint) -> Vec<String> {
        let mut statements = self.compile_sequences(blueprint);
        statements.push(self.compile_create(blueprint));
        statements
    }

    /// `create table "<name>" (<column definitions>)`
    pub fn compile_create(&self, blueprint: &Blueprint) -> String {
        let mut definitions: Vec<String> = blueprint
            .columns()
            .iter()
            .map(|column| self.compile_column(blueprint, column))
            .collect();

        if !blueprint.primary_key().is_empty() {
            definitions.push(format!(
                "primary key ({})",
                self.columnize(blueprint.primary_key())
            ));
        }

        format!(
            "create table {} ({})",
            self.wrap_table(blueprint.table()),
            definitions.join(", ")
        )
    }

    /// Sequences backing auto-incrementing columns
    pub fn compile_sequences(&self, blueprint: &Blueprint) -> Vec<String> {
        blueprint
            .columns()
            .iter()
            .filter(|c| c.column_type.is_auto_increment())
            .map(|c| {
                format!(
                    "create sequence if not exists {}",
                    self.wrap_sequence(blueprint.table(), &c.name)
                )
            })
            .collect()
    }

    /// Name of the sequence for an auto-incrementing column, schema-qualified
    /// when the table is
    pub fn sequence_name(&self, table: &str, column: &str) -> String {
        match table.rsplit_once('.') {
            Some((schema, name)) => format!("{schema}.{}{name}_{column}_seq", self.table_prefix),
            None => format!("{}{table}_{column}_seq", self.table_prefix),
        }
    }

    /// Sequence name wrapped segment by segment
    fn wrap_sequence(&self, table: &str, column: &str) -> String {
        let name = self.sequence_name(table, column);
        match name.rsplit_once('.') {
            Some((schema, sequence)) => format!("{}.{}", wrap_value(schema), wrap_value(sequence)),
            None => wrap_value(&name),
        }
    }

    fn compile_column(&self, blueprint: &Blueprint, column: &ColumnDefinition) -> String {
        let mut sql = format!("{} {}", wrap_value(&column.name), column.column_type.sql());

        if column.column_type.is_auto_increment() {
            let sequence = self.sequence_name(blueprint.table(), &column.name);
            sql.push_str(&format!(
                " primary key default nextval({})",
                quote_string(&sequence)
            ));
            return sql;
        }

        if column.primary {
            sql.push_str(" primary key");
        }
        if column.unique {
            sql.push_str(" unique");
        }
        sql.push_str(if column.nullable { " null" } else { " not null" });
        if let Some(default) = &column.default {
            sql.push_str(" default ");
            sql.push_str(&default_value(default));
        }
        sql
    }

    // ========================================================================
    // Table changes
    // ========================================================================

    pub fn compile_drop(&self, table: &str) -> String {
        format!("drop table {}", self.wrap_table(table))
    }

    pub fn compile_drop_if_exists(&self, table: &str) -> String {
        format!("drop table if exists {}", self.wrap_table(table))
    }

    pub fn compile_rename(&self, from: &str, to: &str) -> String {
        format!(
            "alter table {} rename to {}",
            self.wrap_table(from),
            self.wrap_table(to)
        )
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Existence check for a base table; binds the (prefixed) table name
    pub fn compile_table_exists(&self) -> String {
        "select * from information_schema.tables where table_schema = current_schema() \
         and table_name = ? and table_type = 'BASE TABLE'"
            .to_string()
    }

    /// Column names of a table as `name` rows, in definition order
    pub fn compile_column_listing(&self, table: &str) -> String {
        format!(
            "select column_name as name from information_schema.columns \
             where table_schema = current_schema() and table_name = {} order by ordinal_position",
            quote_string(&format!("{}{table}", self.table_prefix))
        )
    }

    /// Base tables of the current schema as `name` rows, ordered by name
    pub fn compile_tables(&self) -> String {
        "select table_name as name from information_schema.tables \
         where table_schema = current_schema() and table_type = 'BASE TABLE' order by table_name"
            .to_string()
    }
}

fn default_value(value: &QueryValue) -> String {
    match value {
        QueryValue::Raw(expr) => expr.as_str().to_string(),
        QueryValue::Bind(value) => literal(value),
    }
}
