//! Column schema derivation for result sets.

use std::collections::HashSet;

use crate::db::{NativeColumn, NativeType};

/// Decoding category of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Int,
    Float,
    Boolean,
    Blob,
}

impl TypeTag {
    /// Maps a driver-native column type to its decoding category.
    ///
    /// Types without a dedicated rule decode as strings.
    pub fn from_native(native: &NativeType) -> Self {
        match native {
            NativeType::Ascii | NativeType::Text | NativeType::Uuid | NativeType::Varchar => {
                TypeTag::String
            }
            NativeType::BigInt
            | NativeType::Int
            | NativeType::Counter
            | NativeType::Date
            | NativeType::SmallInt
            | NativeType::Time
            | NativeType::Timestamp
            | NativeType::TinyInt
            | NativeType::Varint => TypeTag::Int,
            NativeType::Decimal | NativeType::Double | NativeType::Float => TypeTag::Float,
            NativeType::Boolean => TypeTag::Boolean,
            NativeType::Blob => TypeTag::Blob,
            NativeType::Other(_) => TypeTag::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "STRING",
            TypeTag::Int => "INT",
            TypeTag::Float => "FLOAT",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Blob => "BLOB",
        }
    }

    /// Returns true if structured record decoding has a rule for this tag.
    pub fn is_record_decodable(&self) -> bool {
        !matches!(self, TypeTag::Blob)
    }
}

/// Describes one result column after name disambiguation.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub type_tag: TypeTag,
    pub native_type: NativeType,
    pub table: String,
}

/// Derives the column schema of a result set, in result-set order.
///
/// When a column name was already seen, the later column is renamed to
/// `TABLE.name` with the owning table upper-cased. The renamed name joins the
/// seen set as well.
pub fn derive_column_definitions(columns: &[NativeColumn]) -> Vec<ColumnDefinition> {
    let mut seen: HashSet<String> = HashSet::with_capacity(columns.len());

    columns
        .iter()
        .map(|column| {
            let name = if seen.contains(&column.name) {
                format!("{}.{}", column.table.to_uppercase(), column.name)
            } else {
                column.name.clone()
            };
            seen.insert(name.clone());

            ColumnDefinition {
                name,
                type_tag: TypeTag::from_native(&column.native_type),
                native_type: column.native_type.clone(),
                table: column.table.clone(),
            }
        })
        .collect()
}
