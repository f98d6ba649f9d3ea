//! Runtime values seen by operator dispatch

pub mod value;

pub use value::Value;
