//! Error types for the connector.
//!
//! Defines the main error enum used by the binder, the row cursor, option
//! resolution and the driver adapters.

use thiserror::Error;

/// Main error type for connector operations.
#[derive(Error, Debug)]
pub enum CassError {
    /// A field was read while the cursor had no current row.
    #[error("invalid position in the data iterator")]
    InvalidCursorPosition,

    /// A bind value could not be converted to its declared CQL type.
    #[error("cannot convert parameter at index {index} (value '{value}') to {cql_type}")]
    ParameterCoercion {
        index: usize,
        cql_type: String,
        value: String,
    },

    /// A parameter's value has a shape that cannot be bound.
    #[error("unsupported array type for parameter index {index}: {reason}")]
    UnsupportedParameterType { index: usize, reason: String },

    /// A parameter declared a CQL type outside the known set (strict binding only).
    #[error("unknown CQL type '{cql_type}' for parameter index {index}")]
    UnknownCqlType { index: usize, cql_type: String },

    /// The query has fewer bind markers than parameters (strict binding only).
    #[error("query has {placeholders} placeholders but {parameters} parameters were supplied")]
    PlaceholderMismatch {
        placeholders: usize,
        parameters: usize,
    },

    /// A result column has no structured decoding rule.
    #[error("unsupported sql type found for the column {column} ({type_tag})")]
    UnsupportedColumnType { column: String, type_tag: String },

    /// A native value did not match the type tag recorded for its column.
    #[error("column {column} expected {expected} but the driver returned {found}")]
    ValueDecode {
        column: String,
        expected: String,
        found: String,
    },

    /// A column was requested by a name or position the result set does not have.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// The target record shape has fewer fields than the result has columns.
    #[error("record shape has {fields} fields but the result set has {columns} columns")]
    ShapeMismatch { fields: usize, columns: usize },

    /// A policy name is known but the driver backend cannot honour it.
    #[error("support for the {kind} policy \"{name}\" is not implemented")]
    UnsupportedPolicy { kind: &'static str, name: String },

    /// A policy name does not match any known policy.
    #[error("\"{name}\" is not a valid {kind} policy")]
    InvalidPolicyName { kind: &'static str, name: String },

    /// Envelope for driver failures surfaced from a select or update.
    #[error("Error occurred while executing the {operation} statement: {source}")]
    OperationFailed {
        operation: &'static str,
        #[source]
        source: Box<CassError>,
    },

    /// Cluster connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Driver-level query errors (syntax errors, consistency failures, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CassError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Creates a coercion error for the parameter at `index`.
    pub fn coercion(index: usize, cql_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ParameterCoercion {
            index,
            cql_type: cql_type.into(),
            value: value.into(),
        }
    }

    /// Creates an unsupported-parameter error for the parameter at `index`.
    pub fn unsupported_parameter(index: usize, reason: impl Into<String>) -> Self {
        Self::UnsupportedParameterType {
            index,
            reason: reason.into(),
        }
    }

    /// Wraps driver-level errors in the operation envelope.
    ///
    /// Errors raised by the binder or the cursor already identify the
    /// offending parameter or column and are returned unchanged.
    pub fn during(self, operation: &'static str) -> Self {
        match self {
            Self::Connection(_) | Self::Query(_) | Self::Internal(_) => Self::OperationFailed {
                operation,
                source: Box::new(self),
            },
            other => other,
        }
    }

    /// Returns true if this error came from the driver rather than the connector.
    pub fn is_driver_error(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Query(_) => true,
            Self::OperationFailed { source, .. } => source.is_driver_error(),
            _ => false,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidCursorPosition => "Invalid Cursor Position",
            Self::ParameterCoercion { .. } => "Parameter Coercion Error",
            Self::UnsupportedParameterType { .. } => "Unsupported Parameter Type",
            Self::UnknownCqlType { .. } => "Unknown CQL Type",
            Self::PlaceholderMismatch { .. } => "Placeholder Mismatch",
            Self::UnsupportedColumnType { .. } => "Unsupported Column Type",
            Self::ValueDecode { .. } => "Value Decode Error",
            Self::ColumnNotFound(_) => "Column Not Found",
            Self::ShapeMismatch { .. } => "Shape Mismatch",
            Self::UnsupportedPolicy { .. } => "Unsupported Policy",
            Self::InvalidPolicyName { .. } => "Invalid Policy Name",
            Self::OperationFailed { .. } => "Operation Failed",
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using CassError.
pub type Result<T> = std::result::Result<T, CassError>;
