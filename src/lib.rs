//! # Kredenco
//!
//! `kredenco` is a minimal credential-management service: it registers a
//! username/password pair as a salted Argon2id hash and verifies later login
//! attempts against the stored hash.
//!
//! ## Guarantees
//!
//! - **Uniqueness:** at most one account per username, enforced atomically at
//!   write time by the credential store, not by the preceding read.
//! - **Hashing:** passwords are hashed with a per-call random salt and a
//!   tunable work factor; plaintext passwords are wrapped in
//!   [`secrecy::SecretString`] and never logged or echoed back.
//! - **Error taxonomy:** validation and domain failures are typed results;
//!   infrastructure failures are mapped to a generic internal failure at the
//!   HTTP boundary so internal diagnostics never reach the caller.
//!
//! Out of scope: sessions and tokens, password reset, rate limiting,
//! multi-factor auth, roles.

pub mod auth;
pub mod cli;
pub mod kredenco;
pub mod store;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
