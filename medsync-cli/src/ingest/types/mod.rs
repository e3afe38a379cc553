//! Core types for report ingestion

mod cell;
mod record;
mod schema;
mod sheet;
mod value;

pub use cell::*;
pub use record::*;
pub use schema::*;
pub use sheet::*;
pub use value::*;
