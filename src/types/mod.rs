pub mod base;
pub mod nullable;
pub mod pointers;
