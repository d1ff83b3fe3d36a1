//! Query description built fluently and compiled by `QueryGrammar`
//!
//! `Query` is plain data. Execution helpers take the connection explicitly
//! so a query can be compiled without a database at hand.

use crate::connection::DatabaseConnection;
use crate::error::{Error, Result};
use crate::types::{Bindings, Expression, JsonValue, QueryValue, Row};

// ============================================================================
// Where Clauses
// ============================================================================

/// How a where clause joins the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boolean {
    And,
    Or,
}

impl Boolean {
    /// SQL keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Boolean::And => "and",
            Boolean::Or => "or",
        }
    }
}

/// Date/time component compared by a date-based where clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Date,
    Time,
    Day,
    Month,
    Year,
}

impl DatePart {
    /// DuckDB function extracting this part
    pub fn function(self) -> &'static str {
        match self {
            DatePart::Date => "date",
            DatePart::Time => "time",
            DatePart::Day => "day",
            DatePart::Month => "month",
            DatePart::Year => "year",
        }
    }
}

/// A single where predicate
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    Basic {
        column: String,
        operator: String,
        value: QueryValue,
        boolean: Boolean,
    },
    Null {
        column: String,
        boolean: Boolean,
    },
    NotNull {
        column: String,
        boolean: Boolean,
    },
    In {
        column: String,
        values: Vec<QueryValue>,
        negated: bool,
        boolean: Boolean,
    },
    DatePart {
        part: DatePart,
        column: String,
        operator: String,
        value: QueryValue,
        boolean: Boolean,
    },
    Raw {
        sql: String,
        bindings: Bindings,
        boolean: Boolean,
    },
}

impl WhereClause {
    /// Connective joining this clause to the previous one
    pub fn boolean(&self) -> Boolean {
        match self {
            WhereClause::Basic { boolean, .. }
            | WhereClause::Null { boolean, .. }
            | WhereClause::NotNull { boolean, .. }
            | WhereClause::In { boolean, .. }
            | WhereClause::DatePart { boolean, .. }
            | WhereClause::Raw { boolean, .. } => *boolean,
        }
    }

    fn push_bindings(&self, out: &mut Bindings) {
        match self {
            WhereClause::Basic { value, .. } | WhereClause::DatePart { value, .. } => {
                out.extend(value.binding().cloned());
            }
            WhereClause::In { values, .. } => {
                out.extend(values.iter().filter_map(QueryValue::binding).cloned());
            }
            WhereClause::Raw { bindings, .. } => out.extend(bindings.iter().cloned()),
            WhereClause::Null { .. } | WhereClause::NotNull { .. } => {}
        }
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One `order by` entry
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

// ============================================================================
// Values (insert / update payloads)
// ============================================================================

/// Ordered column/value pairs for an insert or update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values(Vec<(String, QueryValue)>);

impl Values {
    /// Empty value set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column value
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.0.push((column.into(), value.into()));
        self
    }

    /// Column names in insertion order
    pub fn columns(&self) -> Vec<&str> {
        self.0.iter().map(|(c, _)| c.as_str()).collect()
    }

    /// Value for a column
    pub fn get(&self, column: &str) -> Option<&QueryValue> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Iterate over column/value pairs
    pub fn iter(&self) -> impl Iterator<Item = &(String, QueryValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Bound values (expressions excluded) in column order
    pub fn bindings(&self) -> Bindings {
        self.0
            .iter()
            .filter_map(|(_, v)| v.binding().cloned())
            .collect()
    }
}

impl From<Row> for Values {
    fn from(row: Row) -> Self {
        Self(
            row.into_iter()
                .map(|(k, v)| (k, QueryValue::Bind(v)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============================================================================
// Query
// ============================================================================

/// Generic select/insert/update/delete description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub from: Option<String>,
    pub columns: Vec<String>,
    pub distinct: bool,
    pub wheres: Vec<WhereClause>,
    pub orders: Vec<Order>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    /// Empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Query against a table
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            from: Some(table.into()),
            ..Self::default()
        }
    }

    /// Replace the select list
    #[must_use]
    pub fn select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ------------------------------------------------------------------------
    // Where clauses
    // ------------------------------------------------------------------------

    /// `column <operator> value`
    #[must_use]
    pub fn where_basic(
        mut self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.wheres.push(WhereClause::Basic {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
            boolean: Boolean::And,
        });
        self
    }

    /// `column = value`
    #[must_use]
    pub fn where_eq(self, column: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.where_basic(column, "=", value)
    }

    /// `or column <operator> value`
    #[must_use]
    pub fn or_where(
        mut self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.wheres.push(WhereClause::Basic {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
            boolean: Boolean::Or,
        });
        self
    }

    #[must_use]
    pub fn where_null(mut self, column: impl Into<String>) -> Self {
        self.wheres.push(WhereClause::Null {
            column: column.into(),
            boolean: Boolean::And,
        });
        self
    }

    #[must_use]
    pub fn or_where_null(mut self, column: impl Into<String>) -> Self {
        self.wheres.push(WhereClause::Null {
            column: column.into(),
            boolean: Boolean::Or,
        });
        self
    }

    #[must_use]
    pub fn where_not_null(mut self, column: impl Into<String>) -> Self {
        self.wheres.push(WhereClause::NotNull {
            column: column.into(),
            boolean: Boolean::And,
        });
        self
    }

    #[must_use]
    pub fn where_in<V: Into<QueryValue>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.wheres.push(WhereClause::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
            boolean: Boolean::And,
        });
        self
    }

    #[must_use]
    pub fn where_not_in<V: Into<QueryValue>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.wheres.push(WhereClause::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
            boolean: Boolean::And,
        });
        self
    }

    /// Compare one date/time component of a column
    #[must_use]
    pub fn where_date_part(
        mut self,
        part: DatePart,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.wheres.push(WhereClause::DatePart {
            part,
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
            boolean: Boolean::And,
        });
        self
    }

    #[must_use]
    pub fn where_date(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.where_date_part(DatePart::Date, column, operator, value)
    }

    #[must_use]
    pub fn where_time(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.where_date_part(DatePart::Time, column, operator, value)
    }

    #[must_use]
    pub fn where_day(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.where_date_part(DatePart::Day, column, operator, value)
    }

    #[must_use]
    pub fn where_month(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.where_date_part(DatePart::Month, column, operator, value)
    }

    #[must_use]
    pub fn where_year(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.where_date_part(DatePart::Year, column, operator, value)
    }

    /// Raw predicate with its own bindings
    #[must_use]
    pub fn where_raw(mut self, sql: impl Into<String>, bindings: Bindings) -> Self {
        self.wheres.push(WhereClause::Raw {
            sql: sql.into(),
            bindings,
            boolean: Boolean::And,
        });
        self
    }

    // ------------------------------------------------------------------------
    // Ordering and paging
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.orders.push(Order {
            column: column.into(),
            direction: Direction::Asc,
        });
        self
    }

    #[must_use]
    pub fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.orders.push(Order {
            column: column.into(),
            direction: Direction::Desc,
        });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Bindings of the where clauses, in clause order
    pub fn bindings(&self) -> Bindings {
        let mut out = Bindings::new();
        for clause in &self.wheres {
            clause.push_bindings(&mut out);
        }
        out
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    /// Run the select and post-process its rows
    pub fn get<C: DatabaseConnection + ?Sized>(&self, conn: &C) -> Result<Vec<Row>> {
        let sql = conn.query_grammar().compile_select(self)?;
        let rows = conn.select(&sql, &self.bindings())?;
        Ok(conn.post_processor().process_select(rows))
    }

    /// First matching row
    pub fn first<C: DatabaseConnection + ?Sized>(&self, conn: &C) -> Result<Option<Row>> {
        Ok(self.clone().limit(1).get(conn)?.into_iter().next())
    }

    /// Values of a single column
    pub fn pluck<C: DatabaseConnection + ?Sized>(
        &self,
        conn: &C,
        column: &str,
    ) -> Result<Vec<JsonValue>> {
        let rows = self.clone().select([column]).get(conn)?;
        Ok(rows
            .into_iter()
            .map(|mut row| row.remove(column).unwrap_or(JsonValue::Null))
            .collect())
    }

    /// Whether any row matches
    pub fn exists<C: DatabaseConnection + ?Sized>(&self, conn: &C) -> Result<bool> {
        let sql = conn.query_grammar().compile_exists(self)?;
        let row = conn.select_one(&sql, &self.bindings())?;
        Ok(row
            .and_then(|r| r.get("exists").and_then(JsonValue::as_bool))
            .unwrap_or(false))
    }

    /// Number of matching rows
    pub fn count<C: DatabaseConnection + ?Sized>(&self, conn: &C) -> Result<u64> {
        let sql = conn.query_grammar().compile_aggregate(self, "count", "*")?;
        let row = conn.select_one(&sql, &self.bindings())?;
        Ok(row
            .and_then(|r| r.get("aggregate").and_then(JsonValue::as_u64))
            .unwrap_or(0))
    }

    /// Insert one or more records
    pub fn insert<C: DatabaseConnection + ?Sized>(&self, conn: &C, records: &[Values]) -> Result<bool> {
        if records.is_empty() {
            return Ok(true);
        }
        let sql = conn.query_grammar().compile_insert(self, records)?;
        conn.insert(&sql, &insert_bindings(records))
    }

    /// Insert records, skipping those that violate a constraint
    pub fn insert_or_ignore<C: DatabaseConnection + ?Sized>(
        &self,
        conn: &C,
        records: &[Values],
    ) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let sql = conn.query_grammar().compile_insert_or_ignore(self, records)?;
        conn.affecting_statement(&sql, &insert_bindings(records))
    }

    /// Insert a record and return its generated key
    pub fn insert_get_id<C: DatabaseConnection + ?Sized>(
        &self,
        conn: &C,
        values: &Values,
        key: &str,
    ) -> Result<Option<JsonValue>> {
        let sql = conn.query_grammar().compile_insert_get_id(self, values, key)?;
        let rows = conn.select(&sql, &values.bindings())?;
        Ok(conn.post_processor().process_insert_get_id(rows, key))
    }

    /// Update matching rows, returning how many changed
    pub fn update<C: DatabaseConnection + ?Sized>(&self, conn: &C, values: &Values) -> Result<usize> {
        let sql = conn.query_grammar().compile_update(self, values)?;
        let mut bindings = values.bindings();
        bindings.extend(self.bindings());
        conn.update(&sql, &bindings)
    }

    /// Delete matching rows, returning how many were removed
    pub fn delete<C: DatabaseConnection + ?Sized>(&self, conn: &C) -> Result<usize> {
        let sql = conn.query_grammar().compile_delete(self)?;
        conn.delete(&sql, &self.bindings())
    }

    /// Remove every row of the table
    pub fn truncate<C: DatabaseConnection + ?Sized>(&self, conn: &C) -> Result<bool> {
        let sql = conn.query_grammar().compile_truncate(self)?;
        conn.statement(&sql, &[])
    }

    /// Table name, or an error for queries without one
    pub(crate) fn table_name(&self) -> Result<&str> {
        self.from
            .as_deref()
            .ok_or_else(|| Error::invalid_query("query has no table"))
    }
}

/// Bindings of several records, each in the first record's column order
pub fn insert_bindings(records: &[Values]) -> Bindings {
    let Some(first) = records.first() else {
        return Bindings::new();
    };
    let columns = first.columns();
    records
        .iter()
        .flat_map(|record| {
            columns
                .iter()
                .filter_map(|c| record.get(c).and_then(QueryValue::binding).cloned())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Raw SQL expression helper
pub fn raw(sql: impl Into<String>) -> Expression {
    Expression::new(sql)
}
