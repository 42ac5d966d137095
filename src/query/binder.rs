//! Query rewriting and positional value binding.
//!
//! An array-valued parameter whose declared type is not LIST stands for one
//! bind site per element, so its `?` is widened to a comma-joined run of
//! markers and its elements are bound one by one. LIST parameters bind their
//! sequence as a single collection value.

use scylla::value::CqlValue;
use tracing::{debug, warn};

use super::parameter::{CqlType, Parameter};
use super::placeholder::{count_placeholders, find_placeholder, question_marks};
use crate::config::BindingOptions;
use crate::db::{BoundStatement, Value, ValueTag};
use crate::error::{CassError, Result};

/// Rewrites queries and produces driver-ready bind values.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBinder {
    options: BindingOptions,
}

impl QueryBinder {
    /// Creates a binder with the given strictness options.
    pub fn new(options: BindingOptions) -> Self {
        Self { options }
    }

    /// Returns the binder's options.
    pub fn options(&self) -> &BindingOptions {
        &self.options
    }

    /// Expands `?` markers to match the cardinality of array parameters.
    ///
    /// The query is returned unchanged when no parameter is expanded.
    pub fn expand_placeholders(&self, query: &str, params: &[Parameter]) -> Result<String> {
        let mut rewritten = query.to_string();
        let mut start = 0;

        for (index, param) in params.iter().enumerate() {
            let Some(pos) = find_placeholder(&rewritten, start) else {
                if self.options.strict_placeholders {
                    return Err(CassError::PlaceholderMismatch {
                        placeholders: count_placeholders(query),
                        parameters: params.len(),
                    });
                }
                warn!(
                    "Query has no placeholder left for parameter {}; remaining parameters are not expanded",
                    index
                );
                break;
            };

            let count = param.expansion_count();
            if count == 1 {
                start = pos + 1;
                continue;
            }

            let marks = question_marks(count);
            rewritten.replace_range(pos..pos + 1, &marks);
            start = pos + marks.len();
        }

        if rewritten != query {
            debug!("Expanded query: {}", rewritten);
        }

        Ok(rewritten)
    }

    /// Converts the parameter list into a flat list of typed bind values.
    pub fn bind_values(&self, params: &[Parameter]) -> Result<Vec<Option<CqlValue>>> {
        let mut values = Vec::with_capacity(params.len());

        for (index, param) in params.iter().enumerate() {
            if param.value.is_null() {
                values.push(None);
                continue;
            }

            let Some(cql_type) = self.resolve_type(index, &param.cql_type)? else {
                continue;
            };

            match &param.value {
                Value::Array(items) if cql_type != CqlType::List => {
                    let element_tag = array_element_tag(index, items)?;
                    debug!(
                        "Binding parameter {} as {} {} values",
                        index,
                        items.len(),
                        element_tag.as_str()
                    );
                    for item in items {
                        values.push(coerce(index, item, cql_type)?);
                    }
                }
                value => values.push(coerce(index, value, cql_type)?),
            }
        }

        Ok(values)
    }

    /// Binds the parameter list onto a prepared statement in one call.
    pub fn bind<P>(&self, prepared: P, params: &[Parameter]) -> Result<BoundStatement<P>> {
        let values = self.bind_values(params)?;
        Ok(BoundStatement::new(prepared, values))
    }

    fn resolve_type(&self, index: usize, name: &str) -> Result<Option<CqlType>> {
        match CqlType::parse(name) {
            Some(ty) => Ok(Some(ty)),
            None if self.options.strict_cql_types => Err(CassError::UnknownCqlType {
                index,
                cql_type: name.to_string(),
            }),
            None => {
                warn!(
                    "Dropping parameter {}: unknown CQL type '{}'",
                    index, name
                );
                Ok(None)
            }
        }
    }
}

/// Determines the element type of an expanded array.
///
/// Elements must share one scalar tag. Nested arrays are accepted only as
/// byte arrays, each of which becomes a blob.
fn array_element_tag(index: usize, items: &[Value]) -> Result<ValueTag> {
    let mut element_tag = None;

    for item in items.iter().filter(|v| !v.is_null()) {
        let tag = item.tag();
        if tag == ValueTag::Array {
            return Err(CassError::unsupported_parameter(
                index,
                "Array element type being an array is supported only when the inner array element type is BYTE",
            ));
        }
        match element_tag {
            None => element_tag = Some(tag),
            Some(seen) if seen != tag => {
                return Err(CassError::unsupported_parameter(
                    index,
                    format!(
                        "array mixes {} and {} elements",
                        seen.as_str(),
                        tag.as_str()
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    Ok(element_tag.unwrap_or(ValueTag::Null))
}

/// Coerces one value to the declared CQL type.
fn coerce(index: usize, value: &Value, cql_type: CqlType) -> Result<Option<CqlValue>> {
    let fail = || CassError::coercion(index, cql_type.as_str(), value.to_display_string());

    let converted = match (cql_type, value) {
        (_, Value::Null) => return Ok(None),
        (CqlType::List, Value::Array(items)) => CqlValue::List(
            items
                .iter()
                .map(|item| native_element(item).ok_or_else(fail))
                .collect::<Result<Vec<_>>>()?,
        ),
        (CqlType::List, _) => return Err(fail()),
        (CqlType::Blob, Value::Bytes(bytes)) => CqlValue::Blob(bytes.clone()),
        (_, Value::Bytes(_)) | (CqlType::Blob, _) | (_, Value::Array(_)) => return Err(fail()),
        (CqlType::Text, v) => CqlValue::Text(coercion_text(v)),
        (CqlType::Int, v) => CqlValue::Int(parse_scalar(v).ok_or_else(fail)?),
        (CqlType::Bigint, v) => CqlValue::BigInt(parse_scalar(v).ok_or_else(fail)?),
        (CqlType::Varint | CqlType::Float, v) => {
            CqlValue::Float(parse_scalar(v).ok_or_else(fail)?)
        }
        (CqlType::Double, v) => CqlValue::Double(parse_scalar(v).ok_or_else(fail)?),
        (CqlType::Boolean, v) => {
            CqlValue::Boolean(parse_bool(coercion_text(v).trim()).ok_or_else(fail)?)
        }
    };

    Ok(Some(converted))
}

/// Renders a scalar the way it is parsed for coercion.
fn coercion_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_display_string(),
    }
}

fn parse_scalar<T: std::str::FromStr>(value: &Value) -> Option<T> {
    coercion_text(value).trim().parse().ok()
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Converts a LIST element by its own runtime type, without coercion.
fn native_element(value: &Value) -> Option<CqlValue> {
    match value {
        Value::Bool(b) => Some(CqlValue::Boolean(*b)),
        Value::Int(i) => Some(CqlValue::BigInt(*i)),
        Value::Float(f) => Some(CqlValue::Double(*f)),
        Value::String(s) => Some(CqlValue::Text(s.clone())),
        Value::Bytes(b) => Some(CqlValue::Blob(b.clone())),
        Value::Null | Value::Array(_) => None,
    }
}
