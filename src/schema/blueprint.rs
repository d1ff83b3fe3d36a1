//! Table blueprints: the columns of a table to be created

use crate::types::QueryValue;

/// Column types and their DuckDB spelling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-incrementing integer primary key
    Increments,
    /// Auto-incrementing bigint primary key
    BigIncrements,
    Integer,
    BigInteger,
    SmallInteger,
    /// Length is accepted for portability; DuckDB ignores it
    String(u32),
    Text,
    Boolean,
    Date,
    Time,
    Timestamp,
    Double,
    Float,
    Decimal { precision: u8, scale: u8 },
    /// Stored as text
    Json,
    Uuid,
    Binary,
}

impl ColumnType {
    /// DuckDB type name
    pub fn sql(&self) -> String {
        match self {
            ColumnType::Increments | ColumnType::Integer => "integer".to_string(),
            ColumnType::BigIncrements | ColumnType::BigInteger => "bigint".to_string(),
            ColumnType::SmallInteger => "smallint".to_string(),
            ColumnType::String(_) | ColumnType::Text | ColumnType::Json => "varchar".to_string(),
            ColumnType::Boolean => "boolean".to_string(),
            ColumnType::Date => "date".to_string(),
            ColumnType::Time => "time".to_string(),
            ColumnType::Timestamp => "timestamp".to_string(),
            ColumnType::Double => "double".to_string(),
            ColumnType::Float => "float".to_string(),
            ColumnType::Decimal { precision, scale } => format!("decimal({precision}, {scale})"),
            ColumnType::Uuid => "uuid".to_string(),
            ColumnType::Binary => "blob".to_string(),
        }
    }

    /// Whether values come from a sequence
    pub fn is_auto_increment(&self) -> bool {
        matches!(self, ColumnType::Increments | ColumnType::BigIncrements)
    }
}

/// A column and its modifiers
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub default: Option<QueryValue>,
    pub primary: bool,
    pub unique: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            primary: false,
            unique: false,
        }
    }

    /// Allow nulls
    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Default value; expressions are emitted verbatim
    pub fn default(&mut self, value: impl Into<QueryValue>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }
}

/// Columns and table-level constraints for a table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blueprint {
    table: String,
    columns: Vec<ColumnDefinition>,
    primary_key: Vec<String>,
}

impl Blueprint {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Table name, without prefix
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Columns of a composite primary key
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Add a column of any type
    pub fn add_column(&mut self, name: impl Into<String>, column_type: ColumnType) -> &mut ColumnDefinition {
        self.columns.push(ColumnDefinition::new(name, column_type));
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }

    /// Composite primary key over `columns`
    pub fn primary<S: Into<String>>(&mut self, columns: impl IntoIterator<Item = S>) {
        self.primary_key = columns.into_iter().map(Into::into).collect();
    }

    /// Auto-incrementing `id` column
    pub fn id(&mut self) -> &mut ColumnDefinition {
        self.big_increments("id")
    }

    pub fn increments(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Increments)
    }

    pub fn big_increments(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::BigIncrements)
    }

    pub fn integer(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Integer)
    }

    pub fn big_integer(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::BigInteger)
    }

    pub fn small_integer(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::SmallInteger)
    }

    pub fn string(&mut self, name: impl Into<String>, length: u32) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::String(length))
    }

    pub fn text(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Text)
    }

    pub fn boolean(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Boolean)
    }

    pub fn date(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Date)
    }

    pub fn time(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Time)
    }

    pub fn timestamp(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Timestamp)
    }

    /// Nullable `created_at` and `updated_at`
    pub fn timestamps(&mut self) {
        self.timestamp("created_at").nullable();
        self.timestamp("updated_at").nullable();
    }

    pub fn double(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Double)
    }

    pub fn float(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Float)
    }

    pub fn decimal(&mut self, name: impl Into<String>, precision: u8, scale: u8) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Decimal { precision, scale })
    }

    pub fn json(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Json)
    }

    pub fn uuid(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Uuid)
    }

    pub fn binary(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Binary)
    }
}
