//! Value and result types shared by the binder, the cursor and the drivers.
//!
//! `Value` is the host-side value model: what callers bind and what decoded
//! records hold. `ResultSet` is what a driver hands back after execution,
//! still in driver-native form.

use scylla::value::CqlValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a single host-side value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),

    /// Raw byte array.
    Bytes(Vec<u8>),

    /// Ordered, homogeneous sequence of values.
    Array(Vec<Value>),
}

/// Runtime type tag of a `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTag {
    Null,
    Bool,
    Int,
    Float,
    String,
    Bytes,
    Array,
}

impl ValueTag {
    /// Returns the tag name for messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool => "BOOLEAN",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::Bytes => "BYTE[]",
            Self::Array => "ARRAY",
        }
    }
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the runtime type tag of this value.
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Null => ValueTag::Null,
            Value::Bool(_) => ValueTag::Bool,
            Value::Int(_) => ValueTag::Int,
            Value::Float(_) => ValueTag::Float,
            Value::String(_) => ValueTag::String,
            Value::Bytes(_) => ValueTag::Bytes,
            Value::Array(_) => ValueTag::Array,
        }
    }

    /// Attempts to convert the value to a string representation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
            Value::Array(items) => {
                let inner: Vec<String> = items.iter().map(Value::to_display_string).collect();
                format!("[{}]", inner.join(", "))
            }
        }
    }

    /// Converts the value into plain JSON.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::from(b.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

// Conversion implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

macro_rules! impl_from_vec {
    ($($t:ty),*) => {
        $(
            impl From<Vec<$t>> for Value {
                fn from(v: Vec<$t>) -> Self {
                    Value::Array(v.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

// `Vec<u8>` stays a byte array; every other vector becomes an array value.
impl_from_vec!(bool, i32, i64, f64, String, &str, Vec<u8>, Value);

/// Driver-native column type, as reported in result metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeType {
    Ascii,
    Text,
    Uuid,
    Varchar,
    BigInt,
    Int,
    Counter,
    Date,
    SmallInt,
    Time,
    Timestamp,
    TinyInt,
    Varint,
    Decimal,
    Double,
    Float,
    Boolean,
    Blob,
    /// Any type without a dedicated mapping (collections, UDTs, inet, ...).
    Other(String),
}

/// One column of a driver result set: name, native type and owning table.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeColumn {
    pub name: String,
    pub native_type: NativeType,
    pub table: String,
}

impl NativeColumn {
    /// Creates a new native column description.
    pub fn new(name: impl Into<String>, native_type: NativeType, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type,
            table: table.into(),
        }
    }
}

/// A driver row: one optional native value per column.
pub type NativeRow = Vec<Option<CqlValue>>;

/// Column metadata plus the rows a driver returned for one execution.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub columns: Vec<NativeColumn>,
    pub rows: Vec<NativeRow>,
}

impl ResultSet {
    /// Creates a result set with the given columns and rows.
    pub fn new(columns: Vec<NativeColumn>, rows: Vec<NativeRow>) -> Self {
        Self { columns, rows }
    }

    /// Creates a result set for statements that return no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no rows were returned.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The target record shape: ordered output field names.
///
/// Fields are matched to result columns by position, not by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordShape {
    fields: Vec<String>,
}

impl RecordShape {
    /// Creates a shape from ordered field names.
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the field names in order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One materialized row: field name to decoded value, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Appends a field. Field order follows insertion order.
    pub fn put(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// Returns the value of the named field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Returns the fields in order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts the record into a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}
