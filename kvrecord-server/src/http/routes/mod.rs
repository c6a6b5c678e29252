//! Route handlers organized by resource

pub mod greeting;
pub mod diagnostics;
pub mod kv;
pub mod records;
