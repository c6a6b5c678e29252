//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod date;
pub mod kv;
pub mod record;

pub use validation::ValidationError;
pub use date::{DayRange, RecordDate};
pub use kv::{stored_value, EntryKey, UpsertOutcome};
pub use record::{NewRecord, RawRecord, Record};
