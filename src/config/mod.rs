//! Configuration modules.
//!
//! Each submodule loads one aspect of configuration from environment
//! variables with `from_env()` constructors and local defaults:
//!
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: outbound email deliverability API
//! - [`tokens`]: per-purpose token signing secrets and lifetimes

pub mod database;
pub mod email;
pub mod tokens;
