//! # Provider Factory
//!
//! Override provider loading module.
//!
//! Responsibilities:
//! - Parse transform definition files (TOML/JSON) into `OverrideRules`
//! - Build an `OverrideProvider` whose capability set is exactly the
//!   variant sections the definition declares
//! - Provide a `MockProvider` with injectable closures for tests and demos

pub mod error;
pub mod factory;
pub mod mock;
pub mod provider;
pub mod rules;

pub use contracts::{OverrideProvider, TransformFn};
pub use error::{ProviderFactoryError, Result};
pub use factory::ProviderFactory;
pub use mock::MockProvider;
pub use provider::RuleProvider;
pub use rules::{Operation, OverrideRules, RuleError, RuleSet};
