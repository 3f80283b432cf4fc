//! Provides implementations of external traits for response types
#[doc(hidden)]
pub mod serde;
