//! # Tradepost API
//!
//! Credential and session lifecycle engine for a multi-role commerce backend
//! (customer / staff / admin / supplier), built with Axum and PostgreSQL.
//!
//! For every request the engine decides who the caller is, whether their
//! credentials are currently valid, and whether a second factor must be
//! satisfied before trusted tokens are issued.
//!
//! ## Tokens
//!
//! - **Access token** (15 min): asserts identity + role on every protected
//!   request
//! - **Refresh token** (15 days): single-use; every successful refresh
//!   rotates the pair, and presenting a stale refresh token invalidates the
//!   whole session
//! - **MFA session token** (5 min): proves "password checked, second factor
//!   pending" for staff/admin sign-ins with TOTP enabled
//!
//! Each token purpose signs with its own secret, so a token minted for one
//! purpose never validates as another.
//!
//! ## Layout
//!
//! ```text
//! src/
//! ├── config/           # env-driven configuration
//! ├── middleware/       # auth extractors and role checks
//! ├── modules/          # feature modules: auth, mfa, users
//! ├── store/            # CredentialStore trait + Postgres / in-memory backends
//! └── utils/            # errors, jwt, password, totp, email check
//! ```
//!
//! Each feature module follows the same structure: `model.rs` (DTOs),
//! `service.rs` (the logic), `controller.rs` (thin HTTP marshaling),
//! `router.rs`.

pub mod config;
pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod store;
pub mod utils;
pub mod validator;
