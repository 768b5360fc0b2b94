//! Pipeline states and the record of one run.

use std::fmt;

use crate::bundler::{
    artifact::{ArtifactRef, BuildVariant},
    delivery::{DeliveryChoice, DeliveryOutcome},
    vcs::CommitOutcome,
};

/// Position of a run in the release state machine.
///
/// ```text
/// Start → VariantChosen → WebAssetsBuilt → NativeBuilt → ArtifactLocated
///       → Signed (release) | Unsigned (debug) → Delivered → Done
/// ```
///
/// `Aborted` is reachable from every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    VariantChosen,
    WebAssetsBuilt,
    NativeBuilt,
    ArtifactLocated,
    Signed,
    Unsigned,
    Delivered,
    Done,
    Aborted,
}

impl PipelineState {
    /// Whether `self → next` is a legal transition.
    pub fn can_advance_to(self, next: PipelineState) -> bool {
        use PipelineState::*;

        matches!(
            (self, next),
            (Start, VariantChosen)
                | (VariantChosen, WebAssetsBuilt)
                | (WebAssetsBuilt, NativeBuilt)
                | (NativeBuilt, ArtifactLocated)
                | (ArtifactLocated, Signed)
                | (ArtifactLocated, Unsigned)
                | (Signed, Delivered)
                | (Unsigned, Delivered)
                | (Delivered, Done)
        ) || (next == Aborted && !matches!(self, Done | Aborted))
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Aborted)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Everything one pipeline invocation decided and produced.
///
/// The signing identity is not recorded; it is held by the executing
/// pipeline only until the signing step returns.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    state: PipelineState,
    history: Vec<PipelineState>,
    commit: CommitOutcome,
    declined: bool,
    variant: Option<BuildVariant>,
    intermediate: Option<ArtifactRef>,
    terminal: Option<ArtifactRef>,
    checksum: Option<String>,
    delivery: Option<DeliveryChoice>,
    delivered: Option<DeliveryOutcome>,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineRun {
    /// A fresh run in [`PipelineState::Start`].
    pub fn new() -> Self {
        Self {
            state: PipelineState::Start,
            history: vec![PipelineState::Start],
            commit: CommitOutcome::Skipped,
            declined: false,
            variant: None,
            intermediate: None,
            terminal: None,
            checksum: None,
            delivery: None,
            delivered: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state visited, in order.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Moves to `next`, refusing illegal transitions.
    pub(crate) fn advance(&mut self, next: PipelineState) -> crate::bundler::Result<()> {
        if !self.state.can_advance_to(next) {
            crate::bail!("illegal pipeline transition {} -> {}", self.state, next);
        }
        log::info!("Pipeline: {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Marks the run aborted. No-op once terminal.
    pub(crate) fn abort(&mut self) {
        if self.state.can_advance_to(PipelineState::Aborted) {
            log::warn!("Pipeline aborted in state {}", self.state);
            self.state = PipelineState::Aborted;
            self.history.push(PipelineState::Aborted);
        }
    }

    /// Outcome of the commit step.
    pub fn commit(&self) -> &CommitOutcome {
        &self.commit
    }

    pub(crate) fn set_commit(&mut self, commit: CommitOutcome) {
        self.commit = commit;
    }

    /// Whether the operator declined to build.
    pub fn declined(&self) -> bool {
        self.declined
    }

    pub(crate) fn set_declined(&mut self) {
        self.declined = true;
    }

    /// Chosen variant.
    pub fn variant(&self) -> Option<BuildVariant> {
        self.variant
    }

    pub(crate) fn set_variant(&mut self, variant: BuildVariant) {
        self.variant = Some(variant);
    }

    /// Raw native build output.
    pub fn intermediate(&self) -> Option<&ArtifactRef> {
        self.intermediate.as_ref()
    }

    pub(crate) fn set_intermediate(&mut self, artifact: ArtifactRef) {
        self.intermediate = Some(artifact);
    }

    /// Artifact handed to delivery.
    pub fn terminal(&self) -> Option<&ArtifactRef> {
        self.terminal.as_ref()
    }

    pub(crate) fn set_terminal(&mut self, artifact: ArtifactRef, checksum: String) {
        self.terminal = Some(artifact);
        self.checksum = Some(checksum);
    }

    /// SHA-256 of the terminal artifact.
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    /// Chosen delivery.
    pub fn delivery(&self) -> Option<DeliveryChoice> {
        self.delivery
    }

    pub(crate) fn set_delivery(&mut self, choice: DeliveryChoice) {
        self.delivery = Some(choice);
    }

    /// What delivery achieved.
    pub fn delivered(&self) -> Option<&DeliveryOutcome> {
        self.delivered.as_ref()
    }

    pub(crate) fn set_delivered(&mut self, outcome: DeliveryOutcome) {
        self.delivered = Some(outcome);
    }
}
