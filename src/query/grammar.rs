//! DuckDB query grammar
//!
//! Compiles a [`Query`] into DuckDB SQL text. Values are rendered as `?`
//! placeholders (or inlined when they are raw expressions); the matching
//! bindings come from [`Query::bindings`] and [`Values::bindings`].

use super::builder::{Direction, Query, Values, WhereClause};
use crate::error::{Error, Result};
use crate::grammar::{wrap_value, Grammar};

/// Query grammar for DuckDB
#[derive(Debug, Clone, Default)]
pub struct QueryGrammar {
    table_prefix: String,
}

impl Grammar for QueryGrammar {
    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }
}

impl QueryGrammar {
    /// Grammar without a table prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Grammar applying `prefix` to table names
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: prefix.into(),
        }
    }

    /// Change the table prefix
    pub fn set_table_prefix(&mut self, prefix: impl Into<String>) {
        self.table_prefix = prefix.into();
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Compile a select statement
    pub fn compile_select(&self, query: &Query) -> Result<String> {
        let columns = if query.columns.is_empty() {
            "*".to_string()
        } else {
            self.columnize(&query.columns)
        };
        let distinct = if query.distinct { "distinct " } else { "" };
        let mut sql = format!(
            "select {distinct}{columns} from {}",
            self.wrap_table(query.table_name()?)
        );
        self.append_tail(&mut sql, query);
        Ok(sql)
    }

    /// Compile an aggregate such as `count(*)`, aliased as `aggregate`
    pub fn compile_aggregate(&self, query: &Query, function: &str, column: &str) -> Result<String> {
        let column = if query.distinct && column != "*" {
            format!("distinct {}", self.wrap(column))
        } else {
            self.wrap(column)
        };
        let mut sql = format!(
            "select {function}({column}) as {} from {}",
            wrap_value("aggregate"),
            self.wrap_table(query.table_name()?)
        );
        let wheres = self.compile_wheres(query);
        if !wheres.is_empty() {
            sql.push(' ');
            sql.push_str(&wheres);
        }
        Ok(sql)
    }

    /// Compile an existence check, returning a boolean column `exists`
    pub fn compile_exists(&self, query: &Query) -> Result<String> {
        let select = self.compile_select(query)?;
        Ok(format!("select exists({select}) as {}", wrap_value("exists")))
    }

    /// Compile an insert of one or more records.
    ///
    /// Columns come from the first record; every record must provide them.
    pub fn compile_insert(&self, query: &Query, records: &[Values]) -> Result<String> {
        let table = self.wrap_table(query.table_name()?);

        let Some(first) = records.first() else {
            return Ok(format!("insert into {table} default values"));
        };
        if first.is_empty() {
            return Ok(format!("insert into {table} default values"));
        }

        let columns = first.columns();
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let mut placeholders = Vec::with_capacity(columns.len());
            for column in &columns {
                let value = record.get(column).ok_or_else(|| {
                    Error::invalid_query(format!("insert record is missing column '{column}'"))
                })?;
                placeholders.push(self.parameter(value));
            }
            rows.push(format!("({})", placeholders.join(", ")));
        }

        Ok(format!(
            "insert into {table} ({}) values {}",
            self.columnize(&columns),
            rows.join(", ")
        ))
    }

    /// Compile an insert that skips rows violating a constraint
    pub fn compile_insert_or_ignore(&self, query: &Query, records: &[Values]) -> Result<String> {
        let mut sql = self.compile_insert(query, records)?;
        sql.replace_range(..6, "insert or ignore");
        Ok(sql)
    }

    /// Compile an insert returning the generated key
    pub fn compile_insert_get_id(&self, query: &Query, values: &Values, key: &str) -> Result<String> {
        let sql = self.compile_insert(query, std::slice::from_ref(values))?;
        Ok(format!("{sql} returning {}", self.wrap(key)))
    }

    /// Compile an update statement
    pub fn compile_update(&self, query: &Query, values: &Values) -> Result<String> {
        if values.is_empty() {
            return Err(Error::invalid_query("update without values"));
        }
        let mut sql = format!(
            "update {} set {}",
            self.wrap_table(query.table_name()?),
            self.compile_update_columns(values)
        );
        let wheres = self.compile_wheres(query);
        if !wheres.is_empty() {
            sql.push(' ');
            sql.push_str(&wheres);
        }
        Ok(sql)
    }

    /// `"a" = ?, "b" = now()`
    pub fn compile_update_columns(&self, values: &Values) -> String {
        values
            .iter()
            .map(|(column, value)| format!("{} = {}", self.wrap(column), self.parameter(value)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Compile a delete statement
    pub fn compile_delete(&self, query: &Query) -> Result<String> {
        let mut sql = format!("delete from {}", self.wrap_table(query.table_name()?));
        let wheres = self.compile_wheres(query);
        if !wheres.is_empty() {
            sql.push(' ');
            sql.push_str(&wheres);
        }
        Ok(sql)
    }

    /// Compile a truncate statement
    pub fn compile_truncate(&self, query: &Query) -> Result<String> {
        Ok(format!("truncate {}", self.wrap_table(query.table_name()?)))
    }

    // ========================================================================
    // Where clauses
    // ========================================================================

    /// `where ...` for all clauses, or an empty string
    pub fn compile_wheres(&self, query: &Query) -> String {
        if query.wheres.is_empty() {
            return String::new();
        }

        let clauses: Vec<String> = query
            .wheres
            .iter()
            .enumerate()
            .map(|(i, clause)| {
                let sql = self.compile_where(clause);
                if i == 0 {
                    sql
                } else {
                    format!("{} {sql}", clause.boolean().as_str())
                }
            })
            .collect();

        format!("where {}", clauses.join(" "))
    }

    /// Compile one predicate without its connective
    pub fn compile_where(&self, clause: &WhereClause) -> String {
        match clause {
            WhereClause::Basic {
                column,
                operator,
                value,
                ..
            } => format!("{} {operator} {}", self.wrap(column), self.parameter(value)),
            WhereClause::Null { column, .. } => self.where_null(column),
            WhereClause::NotNull { column, .. } => self.where_not_null(column),
            WhereClause::In {
                column,
                values,
                negated,
                ..
            } => {
                if values.is_empty() {
                    return if *negated { "1 = 1" } else { "0 = 1" }.to_string();
                }
                let keyword = if *negated { "not in" } else { "in" };
                format!(
                    "{} {keyword} ({})",
                    self.wrap(column),
                    self.parameterize(values)
                )
            }
            WhereClause::DatePart {
                part,
                column,
                operator,
                value,
                ..
            } => format!(
                "{}({}) {operator} {}",
                part.function(),
                self.wrap(column),
                self.parameter(value)
            ),
            WhereClause::Raw { sql, .. } => sql.clone(),
        }
    }

    /// `"col" is null`
    pub fn where_null(&self, column: &str) -> String {
        format!("{} is null", self.wrap(column))
    }

    /// `"col" is not null`
    pub fn where_not_null(&self, column: &str) -> String {
        format!("{} is not null", self.wrap(column))
    }

    // ========================================================================
    // Ordering and paging
    // ========================================================================

    fn append_tail(&self, sql: &mut String, query: &Query) {
        let wheres = self.compile_wheres(query);
        if !wheres.is_empty() {
            sql.push(' ');
            sql.push_str(&wheres);
        }

        if !query.orders.is_empty() {
            let orders: Vec<String> = query
                .orders
                .iter()
                .map(|order| {
                    let direction = match order.direction {
                        Direction::Asc => "asc",
                        Direction::Desc => "desc",
                    };
                    format!("{} {direction}", self.wrap(&order.column))
                })
                .collect();
            sql.push_str(&format!(" order by {}", orders.join(", ")));
        }

        if let Some(limit) = query.limit {
            sql.push_str(&format!(" limit {limit}"));
        }
        if let Some(offset) = query.offset {
            sql.push_str(&format!(" offset {offset}"));
        }
    }
}
