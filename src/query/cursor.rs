//! Forward-only cursor over an executed result set.
//!
//! The column schema is derived once when the cursor is built. Rows stay in
//! driver-native form until they are read, and each read decodes only the
//! requested column.

use base64::{engine::general_purpose::STANDARD, Engine};
use scylla::value::CqlValue;

use super::columns::{derive_column_definitions, ColumnDefinition, TypeTag};
use crate::db::{NativeRow, Record, RecordShape, ResultSet, Value};
use crate::error::{CassError, Result};

/// Days between the CQL date origin (2^31) and the Unix epoch.
const DATE_EPOCH_OFFSET: i64 = 1 << 31;

#[derive(Debug)]
enum CursorState {
    Created,
    Current(NativeRow),
    Exhausted,
}

/// Forward-only, single-pass cursor with typed column getters.
///
/// `next()` must succeed before every read. Positions are 1-based.
#[derive(Debug)]
pub struct RowCursor {
    columns: Vec<ColumnDefinition>,
    rows: std::vec::IntoIter<NativeRow>,
    state: CursorState,
    shape: Option<RecordShape>,
}

impl RowCursor {
    /// Builds a cursor over a result set.
    pub fn new(result: ResultSet) -> Self {
        Self {
            columns: derive_column_definitions(&result.columns),
            rows: result.rows.into_iter(),
            state: CursorState::Created,
            shape: None,
        }
    }

    /// Builds a cursor that materializes records into `shape`.
    pub fn with_shape(result: ResultSet, shape: RecordShape) -> Self {
        Self {
            shape: Some(shape),
            ..Self::new(result)
        }
    }

    /// Returns the derived column schema.
    pub fn column_definitions(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Returns the record shape supplied at construction, if any.
    pub fn shape(&self) -> Option<&RecordShape> {
        self.shape.as_ref()
    }

    /// Advances to the next row. Returns false once the rows are used up.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if matches!(self.state, CursorState::Exhausted) {
            return false;
        }
        match self.rows.next() {
            Some(row) => {
                self.state = CursorState::Current(row);
                true
            }
            None => {
                self.state = CursorState::Exhausted;
                false
            }
        }
    }

    /// Returns true once `next()` has returned false or a decode failed.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, CursorState::Exhausted)
    }

    /// Returns the 1-based position of the named column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .map(|i| i + 1)
            .ok_or_else(|| CassError::ColumnNotFound(name.to_string()))
    }

    pub fn get_string(&self, index: usize) -> Result<Option<String>> {
        let (_, value) = self.cell(index)?;
        Ok(value.map(render))
    }

    /// Reads an integer column, widening every driver integer type to i64.
    pub fn get_int(&self, index: usize) -> Result<Option<i64>> {
        let (column, value) = self.cell(index)?;
        value
            .map(|v| native_int(v).ok_or_else(|| decode_error(column, "INT", v)))
            .transpose()
    }

    /// Reads a floating point column, widening to f64.
    pub fn get_float(&self, index: usize) -> Result<Option<f64>> {
        let (column, value) = self.cell(index)?;
        value
            .map(|v| native_float(v).ok_or_else(|| decode_error(column, "FLOAT", v)))
            .transpose()
    }

    pub fn get_bool(&self, index: usize) -> Result<Option<bool>> {
        let (column, value) = self.cell(index)?;
        value
            .map(|v| match v {
                CqlValue::Boolean(b) => Ok(*b),
                other => Err(decode_error(column, "BOOLEAN", other)),
            })
            .transpose()
    }

    /// Reads the raw bytes of a blob column.
    pub fn get_bytes(&self, index: usize) -> Result<Option<Vec<u8>>> {
        let (column, value) = self.cell(index)?;
        value
            .map(|v| match v {
                CqlValue::Blob(bytes) => Ok(bytes.clone()),
                other => Err(decode_error(column, "BLOB", other)),
            })
            .transpose()
    }

    /// Reads a blob column as a base64 string.
    pub fn get_blob(&self, index: usize) -> Result<Option<String>> {
        Ok(self.get_bytes(index)?.map(|bytes| STANDARD.encode(bytes)))
    }

    /// Reads a column according to its recorded type tag.
    pub fn get_value(&self, index: usize) -> Result<Value> {
        let (column, _) = self.cell(index)?;
        let value = match column.type_tag {
            TypeTag::String => self.get_string(index)?.into(),
            TypeTag::Int => self.get_int(index)?.into(),
            TypeTag::Float => self.get_float(index)?.into(),
            TypeTag::Boolean => self.get_bool(index)?.into(),
            TypeTag::Blob => self.get_blob(index)?.into(),
        };
        Ok(value)
    }

    pub fn get_value_by_name(&self, name: &str) -> Result<Value> {
        self.current()?;
        self.get_value(self.column_index(name)?)
    }

    /// Materializes the current row into `shape`.
    ///
    /// Fields are assigned to columns by position. On failure the cursor is
    /// left exhausted and no further rows are read.
    pub fn generate_next(&mut self, shape: &RecordShape) -> Result<Record> {
        self.current()?;
        let result = self.materialize(shape);
        if result.is_err() {
            self.state = CursorState::Exhausted;
        }
        result
    }

    /// Returns an iterator that advances the cursor and yields one record per row.
    ///
    /// Uses the construction shape, or the column names when none was given.
    pub fn records(&mut self) -> Records<'_> {
        let shape = self.shape.clone().unwrap_or_else(|| {
            RecordShape::new(self.columns.iter().map(|c| c.name.clone()))
        });
        Records {
            cursor: self,
            shape,
        }
    }

    fn materialize(&self, shape: &RecordShape) -> Result<Record> {
        if shape.len() < self.columns.len() {
            return Err(CassError::ShapeMismatch {
                fields: shape.len(),
                columns: self.columns.len(),
            });
        }

        let mut record = Record::with_capacity(self.columns.len());
        for (i, (column, field)) in self.columns.iter().zip(shape.fields()).enumerate() {
            if !column.type_tag.is_record_decodable() {
                return Err(CassError::UnsupportedColumnType {
                    column: column.name.clone(),
                    type_tag: column.type_tag.as_str().to_string(),
                });
            }
            record.put(field.clone(), self.get_value(i + 1)?);
        }
        Ok(record)
    }

    fn current(&self) -> Result<&NativeRow> {
        match &self.state {
            CursorState::Current(row) => Ok(row),
            CursorState::Created | CursorState::Exhausted => Err(CassError::InvalidCursorPosition),
        }
    }

    fn cell(&self, index: usize) -> Result<(&ColumnDefinition, Option<&CqlValue>)> {
        let row = self.current()?;
        let column = index
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .ok_or_else(|| CassError::ColumnNotFound(format!("position {}", index)))?;
        let value = row.get(index - 1).and_then(Option::as_ref);
        Ok((column, value))
    }
}

/// Iterator over the records of a [`RowCursor`].
pub struct Records<'a> {
    cursor: &'a mut RowCursor,
    shape: RecordShape,
}

impl Iterator for Records<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.next() {
            return None;
        }
        Some(self.cursor.generate_next(&self.shape))
    }
}

fn decode_error(column: &ColumnDefinition, expected: &str, found: &CqlValue) -> CassError {
    CassError::ValueDecode {
        column: column.name.clone(),
        expected: expected.to_string(),
        found: native_name(found).to_string(),
    }
}

fn native_int(value: &CqlValue) -> Option<i64> {
    match value {
        CqlValue::TinyInt(v) => Some(i64::from(*v)),
        CqlValue::SmallInt(v) => Some(i64::from(*v)),
        CqlValue::Int(v) => Some(i64::from(*v)),
        CqlValue::BigInt(v) => Some(*v),
        CqlValue::Counter(c) => Some(c.0),
        CqlValue::Date(d) => Some(i64::from(d.0) - DATE_EPOCH_OFFSET),
        CqlValue::Time(t) => Some(t.0),
        CqlValue::Timestamp(t) => Some(t.0),
        CqlValue::Varint(v) => {
            signed_be_to_i128(v.as_signed_bytes_be_slice()).and_then(|n| i64::try_from(n).ok())
        }
        _ => None,
    }
}

fn native_float(value: &CqlValue) -> Option<f64> {
    match value {
        CqlValue::Float(v) => Some(f64::from(*v)),
        CqlValue::Double(v) => Some(*v),
        CqlValue::Decimal(d) => {
            let (bytes, scale) = d.as_signed_be_bytes_slice_and_exponent();
            signed_be_to_i128(bytes).map(|unscaled| unscaled as f64 / 10f64.powi(scale))
        }
        _ => None,
    }
}

/// Interprets big-endian two's complement bytes. Returns None past 128 bits.
fn signed_be_to_i128(bytes: &[u8]) -> Option<i128> {
    if bytes.len() > 16 {
        return None;
    }
    let negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
    let mut buf = if negative { [0xFF; 16] } else { [0; 16] };
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    Some(i128::from_be_bytes(buf))
}

/// Renders a native value as text for string columns.
fn render(value: &CqlValue) -> String {
    match value {
        CqlValue::Ascii(s) | CqlValue::Text(s) => s.clone(),
        CqlValue::Uuid(u) => u.to_string(),
        CqlValue::Timeuuid(u) => u.to_string(),
        CqlValue::Inet(addr) => addr.to_string(),
        CqlValue::Boolean(b) => b.to_string(),
        CqlValue::Float(f) => f.to_string(),
        CqlValue::Double(f) => f.to_string(),
        CqlValue::Blob(bytes) => STANDARD.encode(bytes),
        CqlValue::List(items) | CqlValue::Set(items) => {
            let inner: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", inner.join(", "))
        }
        CqlValue::Map(entries) => {
            let inner: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", render(k), render(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        other => native_int(other)
            .map(|n| n.to_string())
            .or_else(|| native_float(other).map(|f| f.to_string()))
            .unwrap_or_else(|| format!("{:?}", other)),
    }
}

fn native_name(value: &CqlValue) -> &'static str {
    match value {
        CqlValue::Ascii(_) => "ascii",
        CqlValue::Text(_) => "text",
        CqlValue::Boolean(_) => "boolean",
        CqlValue::Blob(_) => "blob",
        CqlValue::Counter(_) => "counter",
        CqlValue::Decimal(_) => "decimal",
        CqlValue::Date(_) => "date",
        CqlValue::Double(_) => "double",
        CqlValue::Float(_) => "float",
        CqlValue::Int(_) => "int",
        CqlValue::BigInt(_) => "bigint",
        CqlValue::SmallInt(_) => "smallint",
        CqlValue::TinyInt(_) => "tinyint",
        CqlValue::Time(_) => "time",
        CqlValue::Timestamp(_) => "timestamp",
        CqlValue::Uuid(_) => "uuid",
        CqlValue::Timeuuid(_) => "timeuuid",
        CqlValue::Inet(_) => "inet",
        CqlValue::Varint(_) => "varint",
        CqlValue::List(_) => "list",
        CqlValue::Set(_) => "set",
        CqlValue::Map(_) => "map",
        _ => "other",
    }
}
