//! Shared Value Objects
//!
//! Immutable domain types compared by value, not identity.

mod symbol;

pub use symbol::Symbol;
