//! DSF Core - domain setup flow services
//!
//! Builds on the step-graph engine in `dsf-kernel` with everything that
//! touches platform data:
//! - DNS verification of a connection snapshot
//! - The DNS records a user must enter for a mode
//! - The transfer sub-flow (graph selection, holds, unlock, auth code)
//! - Setup sessions with stale-result protection
//! - Cancellable verification polling
//!
//! # Example
//!
//! ```rust
//! use dsf_core::prelude::*;
//!
//! let mut session = SetupSession::connect(&EntrySignals::new()).unwrap();
//! session.go_to(step_maps::slugs::SUGGESTED_VERIFYING).unwrap();
//!
//! let snapshot = ConnectionSnapshot {
//!     has_wpcom_name_servers: true,
//!     ..ConnectionSnapshot::default()
//! };
//! let generation = session.generation();
//! let outcome = session.verify(&snapshot);
//! let update = session.apply_verification(generation, outcome);
//!
//! assert!(matches!(update, SessionUpdate::Connected { .. }));
//! ```

#![allow(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod poller;
pub mod records;
pub mod session;
pub mod transfer;
pub mod types;
pub mod verification;

// Re-exports for convenience
pub use api::DomainApi;
pub use config::{PollingConfig, SetupConfig, TransferConfig};
pub use error::{AuthCodeError, ConfigError, FetchError, SetupError, TransferBlock, UnlockTransitionError};
pub use poller::{cancellation, CancelHandle, CancelSignal, PollReport, PollResult, VerificationPoller, MIN_POLL_INTERVAL};
pub use records::{resolve_dns_records_for, RecordTarget};
pub use session::{SessionUpdate, SetupSession};
pub use types::{
    AuthCodeCheck, ConnectionSnapshot, DnsRecord, DnsRecordType, DomainSetupInfo, LockStatus, SiteId,
    TransferState,
};
pub use verification::{evaluate, FailureReason, ReasonCode, VerificationOutcome};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosts of the setup flow
    pub use crate::{
        evaluate, ConnectionSnapshot, DomainApi, LockStatus, SessionUpdate, SetupConfig, SetupError,
        SetupSession, TransferState, VerificationOutcome, VerificationPoller,
    };
    pub use dsf_kernel::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
