//! planlens - analyzed explain reports
//!
//! Turns a storage engine's raw query plan into a report readable against
//! the schema and the original query text.

pub mod cli;
pub mod compiled;
pub mod explain;
pub mod observability;
pub mod schema;
