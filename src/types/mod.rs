//! Core type definitions.

mod target;

pub use target::{Target, TargetError};
