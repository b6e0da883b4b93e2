//! # Transaction Relay
//!
//! Builds, signs, submits, and confirms state-changing ledger calls for a
//! held credential, with strict per-account nonce serialization. Also home
//! to the allowance guard, which front-runs value-moving calls with a
//! minimal delegated-spending approval.
//!
//! ## Module Structure
//!
//! ```text
//! fleet-relay/
//! ├── credential   # Scoped-lifetime signing handle (zeroized on drop)
//! ├── config       # Submission envelope and polling parameters
//! ├── relay        # TransactionRelay submission pipeline
//! └── allowance    # AllowanceGuard pre-flight protocol
//! ```
//!
//! ## Ordering guarantee
//!
//! All submissions from one account are serialized submit-then-confirm via a
//! per-account async lock; submissions from distinct accounts proceed in
//! parallel with no ordering between them.

#![warn(clippy::all)]

pub mod allowance;
pub mod config;
pub mod credential;
pub mod relay;

pub use allowance::AllowanceGuard;
pub use config::RelayConfig;
pub use credential::{Credential, CredentialSource, EnvCredentialSource};
pub use relay::TransactionRelay;
