//! Setup session
//!
//! Tracks where one user is in a step graph. Asynchronous results (DNS
//! verification) are tagged with the generation they were started under;
//! any step change bumps the generation so late results cannot move a user
//! who has already navigated elsewhere.

use crate::api::DomainApi;
use crate::config::TransferConfig;
use crate::error::SetupError;
use crate::transfer::{check_transferable, select_transfer_graph, UnlockCheck};
use crate::types::{ConnectionSnapshot, LockStatus, TransferState};
use crate::verification::{evaluate, FailureReason, VerificationOutcome};
use dsf_kernel::{build_progress_list, step_maps, EntrySignals, Mode, ProgressList, Step, StepGraph, StepId, StepName, StepType};

/// Effect of applying a verification outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Outcome belonged to an earlier generation
    Discarded,
    /// Session moved to the mode's connected step
    Connected { step: StepName },
    /// Success recorded, but the current step has nowhere to go
    Verified,
    /// Still not connected; the user stays and may retry
    Failed(FailureReason),
}

/// One user's position in a step graph
#[derive(Debug, Clone)]
pub struct SetupSession<'g> {
    graph: &'g StepGraph,
    current_id: StepId,
    current: &'g Step,
    generation: u64,
    last_outcome: Option<VerificationOutcome>,
}

impl SetupSession<'static> {
    /// Open the connection flow at the resolved entry step
    pub fn connect(signals: &EntrySignals) -> Result<Self, SetupError> {
        let graph = step_maps::connection_graph(signals.is_subdomain);
        let entry = signals.resolve();
        tracing::info!(step = %entry, subdomain = signals.is_subdomain, "connection session opened");
        Self::with_graph(graph, entry.as_str())
    }

    /// Fetch `domain`'s setup info and open the connection flow from it
    pub async fn open<A>(api: &A, domain: &str, is_subdomain: bool) -> Result<Self, SetupError>
    where
        A: DomainApi + ?Sized,
    {
        let info = api.fetch_setup_info(domain).await?;
        tracing::debug!(%domain, mode = ?info.connection_mode, dc = info.supports_domain_connect, "setup info fetched");
        Self::connect(&info.entry_signals(is_subdomain))
    }

    /// Open the transfer flow; the graph is chosen once from `lock`
    pub fn transfer(lock: LockStatus) -> Result<Self, SetupError> {
        let graph = select_transfer_graph(lock);
        let id = graph
            .start_of(Mode::Transfer)
            .ok_or(SetupError::ModeUnavailable(Mode::Transfer))?;
        let step = graph
            .get(id)
            .ok_or(SetupError::ModeUnavailable(Mode::Transfer))?;
        tracing::info!(?lock, "transfer session opened");
        Ok(Self::at(graph, id, step))
    }
}

impl<'g> SetupSession<'g> {
    /// Open `graph` at the named step
    pub fn with_graph(graph: &'g StepGraph, step: &str) -> Result<Self, SetupError> {
        let (id, current) = lookup(graph, step)?;
        Ok(Self::at(graph, id, current))
    }

    fn at(graph: &'g StepGraph, current_id: StepId, current: &'g Step) -> Self {
        Self {
            graph,
            current_id,
            current,
            generation: 0,
            last_outcome: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn graph(&self) -> &'g StepGraph {
        self.graph
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> &'g Step {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn current_id(&self) -> StepId {
        self.current_id
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.current.mode()
    }

    /// Bumped on every step change
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    #[must_use]
    pub fn last_outcome(&self) -> Option<&VerificationOutcome> {
        self.last_outcome.as_ref()
    }

    /// Progress indicator for the current mode
    #[must_use]
    pub fn progress(&self) -> ProgressList {
        build_progress_list(self.mode(), self.graph)
    }

    /// Rules used to verify the current mode
    ///
    /// The Domain Connect template writes A records, so it is checked like
    /// Advanced mode.
    #[must_use]
    pub fn verification_mode(&self) -> Mode {
        match self.mode() {
            Mode::DomainConnect => Mode::Advanced,
            mode => mode,
        }
    }

    /// Evaluate a snapshot under [`Self::verification_mode`]
    #[must_use]
    pub fn verify(&self, snapshot: &ConnectionSnapshot) -> VerificationOutcome {
        evaluate(self.verification_mode(), snapshot)
    }

    pub fn advance(&mut self) -> Result<&'g Step, SetupError> {
        let (id, step) = self
            .current
            .next()
            .and_then(|id| self.graph.get(id).map(|step| (id, step)))
            .ok_or_else(|| SetupError::NoNextStep(self.current.name().clone()))?;
        Ok(self.enter(id, step))
    }

    pub fn back(&mut self) -> Result<&'g Step, SetupError> {
        let (id, step) = self
            .current
            .prev()
            .and_then(|id| self.graph.get(id).map(|step| (id, step)))
            .ok_or_else(|| SetupError::NoPreviousStep(self.current.name().clone()))?;
        Ok(self.enter(id, step))
    }

    /// Jump to a named step of the same graph
    pub fn go_to(&mut self, step: &str) -> Result<&'g Step, SetupError> {
        let (id, step) = lookup(self.graph, step)?;
        Ok(self.enter(id, step))
    }

    /// Restart in another mode at its START
    pub fn switch_mode(&mut self, mode: Mode) -> Result<&'g Step, SetupError> {
        let (id, step) = self
            .graph
            .start_of(mode)
            .and_then(|id| self.graph.get(id).map(|step| (id, step)))
            .ok_or(SetupError::ModeUnavailable(mode))?;
        tracing::info!(from = %self.mode(), to = %mode, "setup mode switched");
        Ok(self.enter(id, step))
    }

    /// Unlock check for the current step, if it is the unlock step
    #[must_use]
    pub fn unlock_check(&self, config: &TransferConfig) -> Option<UnlockCheck> {
        (self.current.step_type() == StepType::UnlockDomain).then(|| UnlockCheck::from_config(config))
    }

    /// "Start setup" on a transfer: blocked by registry holds
    pub fn begin_transfer(&mut self, state: &TransferState) -> Result<&'g Step, SetupError> {
        check_transferable(state)?;
        self.advance()
    }

    /// Apply an outcome started under `generation`
    pub fn apply_verification(&mut self, generation: u64, outcome: VerificationOutcome) -> SessionUpdate {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale verification outcome discarded");
            return SessionUpdate::Discarded;
        }

        match outcome {
            VerificationOutcome::Failed(reason) => {
                self.last_outcome = Some(VerificationOutcome::Failed(reason.clone()));
                SessionUpdate::Failed(reason)
            }
            VerificationOutcome::Connected => {
                let connected = (self.current.step_type() == StepType::Verifying)
                    .then(|| self.current.next())
                    .flatten()
                    .and_then(|id| self.graph.get(id).map(|step| (id, step)))
                    .filter(|(_, step)| step.step_type() == StepType::Connected);

                let update = match connected {
                    Some((id, step)) => {
                        self.enter(id, step);
                        SessionUpdate::Connected {
                            step: step.name().clone(),
                        }
                    }
                    None => SessionUpdate::Verified,
                };
                self.last_outcome = Some(VerificationOutcome::Connected);
                update
            }
        }
    }

    fn enter(&mut self, id: StepId, step: &'g Step) -> &'g Step {
        tracing::debug!(from = %self.current.name(), to = %step.name(), "step changed");
        self.current_id = id;
        self.current = step;
        self.generation += 1;
        self.last_outcome = None;
        step
    }
}

fn lookup<'g>(graph: &'g StepGraph, name: &str) -> Result<(StepId, &'g Step), SetupError> {
    graph
        .id_of(name)
        .and_then(|id| graph.get(id).map(|step| (id, step)))
        .ok_or_else(|| SetupError::UnknownStep(StepName::from(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsf_kernel::step_maps::slugs;

    #[test]
    fn connect_lands_on_resolved_step() {
        let session = SetupSession::connect(&EntrySignals::new().with_current_mode(Mode::Advanced)).unwrap();
        assert_eq!(session.current().name(), slugs::ADVANCED_UPDATE);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn unknown_forced_step_is_rejected_here() {
        let err = SetupSession::connect(&EntrySignals::new().with_forced_step("nowhere")).unwrap_err();
        assert!(matches!(err, SetupError::UnknownStep(name) if name == "nowhere"));
    }

    #[test]
    fn navigation_bumps_generation() {
        let mut session = SetupSession::connect(&EntrySignals::new()).unwrap();
        session.advance().unwrap();
        session.back().unwrap();
        assert_eq!(session.generation(), 2);
        assert!(matches!(session.back(), Err(SetupError::NoPreviousStep(_))));
    }

    #[test]
    fn domain_connect_verifies_as_advanced() {
        let session = SetupSession::connect(&EntrySignals::new().with_domain_connect(true)).unwrap();
        assert_eq!(session.mode(), Mode::DomainConnect);
        assert_eq!(session.verification_mode(), Mode::Advanced);
    }

    #[test]
    fn success_outside_verifying_step_does_not_move() {
        let mut session = SetupSession::connect(&EntrySignals::new()).unwrap();
        let update = session.apply_verification(0, VerificationOutcome::Connected);
        assert_eq!(update, SessionUpdate::Verified);
        assert_eq!(session.current().name(), slugs::SUGGESTED_START);
    }
}
