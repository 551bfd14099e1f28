//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Wire Model
//! - One JSON object per line, discriminated by the `type` field
//! - Variants: `SCHEMA` / `RECORD` / `STATE` / `ACTIVATE_VERSION`

mod error;
mod message;
mod provider;
mod settings;

pub use error::*;
pub use message::*;
pub use provider::{has_capability, OverrideError, OverrideProvider, TransformFn};
pub use settings::*;
