//! Transfer sub-flow
//!
//! Moving a domain's registration to the platform: pick the step graph from
//! the registrar lock status, gate the start on registry holds, drive the
//! unlock check, then submit the authorization code.

mod auth_code;
mod gate;
mod unlock;

pub use auth_code::{validate_auth_code, AuthCodeStep};
pub use gate::check_transferable;
pub use unlock::{
    allowed_transitions, validate_transition, PrimaryAction, UnlockCheck, UnlockDecision, UnlockNotice,
    UnlockPhase,
};

use crate::types::LockStatus;
use dsf_kernel::{step_maps, StepGraph};

/// Transfer graph for a lock status observed on entry
///
/// An unknown status is treated as locked so the user is walked through
/// unlocking. The choice is made once; the graph is not re-selected later.
#[must_use]
pub fn select_transfer_graph(lock: LockStatus) -> &'static StepGraph {
    let graph = match lock {
        LockStatus::Unlocked => step_maps::transfer_unlocked(),
        LockStatus::Locked | LockStatus::Unknown => step_maps::transfer_locked(),
    };
    tracing::debug!(?lock, steps = graph.len(), "transfer graph selected");
    graph
}
