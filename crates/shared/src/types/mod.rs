//! Common types used across the application.

pub mod code;
pub mod id;

pub use code::{AccountCode, StudentId};
pub use id::*;
