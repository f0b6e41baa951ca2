//! Request-time authentication and authorization.
//!
//! - [`auth`]: token extractors ([`auth::AuthUser`], [`auth::MfaSession`])
//! - [`role`]: role checks and the cross-role details-read policy
//!
//! A request authenticates by presenting its access token in the
//! `Authorization: Bearer` header or the `access_token` cookie. The extractor
//! verifies signature, expiry, and claim shape, and hands the handler an
//! authenticated identity context.

pub mod auth;
pub mod role;
