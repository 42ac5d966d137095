//! Integration tests for cass-connector.
//!
//! Most tests run against `MockDriver`. The live tests need a running
//! cluster and skip themselves unless CASSANDRA_CONTACT_POINTS is set.

pub mod binder_test;
pub mod client_test;
pub mod cursor_test;
pub mod live_test;
