//! Small pure helpers used by the writer: indentation prefixes and name
//! validation.

pub mod indent;
pub mod name;
