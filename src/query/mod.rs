//! Query preprocessing and result materialization.
//!
//! `QueryBinder` rewrites CQL for array parameters and produces bind values.
//! `RowCursor` derives the column schema of a result and decodes rows on
//! demand.

mod binder;
mod columns;
mod cursor;
mod parameter;
mod placeholder;

pub use binder::QueryBinder;
pub use columns::{derive_column_definitions, ColumnDefinition, TypeTag};
pub use cursor::{Records, RowCursor};
pub use parameter::{uniform_parameters, Argument, CqlType, Parameter};
pub use placeholder::{count_placeholders, find_placeholder};
