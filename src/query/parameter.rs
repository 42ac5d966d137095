//! Bind parameters and their declared CQL types.

use crate::db::{Value, ValueTag};
use crate::error::{CassError, Result};
use serde::{Deserialize, Serialize};

/// CQL types a parameter may be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CqlType {
    Int,
    Bigint,
    Varint,
    Float,
    Double,
    Text,
    Boolean,
    Blob,
    List,
}

impl CqlType {
    /// Returns the type name as written in parameter declarations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Bigint => "BIGINT",
            Self::Varint => "VARINT",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
            Self::Blob => "BLOB",
            Self::List => "LIST",
        }
    }

    /// Parses a type name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "INT" => Some(Self::Int),
            "BIGINT" => Some(Self::Bigint),
            "VARINT" => Some(Self::Varint),
            "FLOAT" => Some(Self::Float),
            "DOUBLE" => Some(Self::Double),
            "TEXT" => Some(Self::Text),
            "BOOLEAN" => Some(Self::Boolean),
            "BLOB" => Some(Self::Blob),
            "LIST" => Some(Self::List),
            _ => None,
        }
    }
}

/// One bind-site value supplied by the caller.
///
/// `cql_type` is kept as the caller wrote it; it is resolved once when the
/// statement is bound so that unknown names can be reported (or dropped in
/// lenient mode) with the parameter index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub cql_type: String,
    pub value: Value,
}

impl Parameter {
    /// Creates a parameter with an explicit CQL type.
    pub fn new(cql_type: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            cql_type: cql_type.into(),
            value: value.into(),
        }
    }

    /// Creates a NULL parameter.
    pub fn null(cql_type: impl Into<String>) -> Self {
        Self::new(cql_type, Value::Null)
    }

    /// Wraps a plain host value, inferring its CQL type from the runtime tag.
    pub fn inferred(index: usize, value: Value) -> Result<Self> {
        let cql_type = match value.tag() {
            ValueTag::Int => CqlType::Int,
            ValueTag::String => CqlType::Text,
            ValueTag::Float => CqlType::Float,
            ValueTag::Bool => CqlType::Boolean,
            ValueTag::Bytes => CqlType::Blob,
            tag => {
                return Err(CassError::unsupported_parameter(
                    index,
                    format!("unsupported data type {} for an untyped parameter", tag.as_str()),
                ))
            }
        };
        Ok(Self::new(cql_type.as_str(), value))
    }

    /// Returns true if the declared type is LIST (case-insensitive).
    pub fn is_list(&self) -> bool {
        CqlType::parse(&self.cql_type) == Some(CqlType::List)
    }

    /// Returns true if this parameter stands for several bind sites.
    pub fn is_expanded(&self) -> bool {
        matches!(self.value, Value::Array(_)) && !self.is_list()
    }

    /// Number of placeholders this parameter occupies in the rewritten query.
    pub fn expansion_count(&self) -> usize {
        match &self.value {
            Value::Array(items) if !self.is_list() => items.len(),
            _ => 1,
        }
    }
}

/// A caller-supplied argument: either typed or a plain value to be typed.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Typed(Parameter),
    Plain(Value),
}

impl From<Parameter> for Argument {
    fn from(p: Parameter) -> Self {
        Argument::Typed(p)
    }
}

impl From<Value> for Argument {
    fn from(v: Value) -> Self {
        Argument::Plain(v)
    }
}

/// Builds the uniform parameter list: every argument becomes a `Parameter`.
pub fn uniform_parameters(args: &[Argument]) -> Result<Vec<Parameter>> {
    args.iter()
        .enumerate()
        .map(|(index, arg)| match arg {
            Argument::Typed(p) => Ok(p.clone()),
            Argument::Plain(v) => Parameter::inferred(index, v.clone()),
        })
        .collect()
}
