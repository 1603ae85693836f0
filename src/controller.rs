//! Per-entity visualization state machine.
//!
//! Each entity id moves `Idle -> Generating -> Idle`. A successful run
//! attaches the artifact to the entity for the controller's lifetime; a
//! failed run leaves any earlier artifact untouched. Distinct entities may
//! generate concurrently, but a second run for an entity that is already
//! generating is refused.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::gateway::{FailureKind, Gateway, VisualRequest, VisualResult};
use crate::ports::{CredentialAuthority, Notifier};
use crate::prompt::FAILURE_NOTICE;

/// Lifecycle phase of one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A generation request is in flight.
    Generating,
}

/// Visual state of one service package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityVisualState {
    /// Current phase.
    pub phase: Phase,
    /// Last generated artifact, if any.
    pub cached_artifact: Option<String>,
}

impl EntityVisualState {
    /// Whether a request is in flight.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.phase == Phase::Generating
    }
}

/// What a visualize action ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualizeOutcome {
    /// A new artifact was generated and cached.
    Generated(String),
    /// The credential was rejected; the selector was reopened.
    CredentialRejected,
    /// Generation failed; the user was notified.
    Failed(FailureKind),
    /// The entity already has a request in flight; nothing was sent.
    AlreadyInFlight,
}

/// Sequences visualize actions and owns the entity state map.
pub struct VisualizationController {
    gateway: Gateway,
    credentials: Arc<dyn CredentialAuthority>,
    notifier: Arc<dyn Notifier>,
    states: Mutex<HashMap<String, EntityVisualState>>,
}

impl VisualizationController {
    /// Create a controller with no entity state.
    pub fn new(
        gateway: Gateway,
        credentials: Arc<dyn CredentialAuthority>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { gateway, credentials, notifier, states: Mutex::new(HashMap::new()) }
    }

    /// Generate a preview for `entity_id`.
    pub async fn visualize(&self, entity_id: &str, request: &VisualRequest) -> VisualizeOutcome {
        {
            let mut states = self.lock_states();
            let state = states.entry(entity_id.to_string()).or_default();
            if state.is_generating() {
                info!(entity_id, "visualize ignored, already generating");
                return VisualizeOutcome::AlreadyInFlight;
            }
            state.phase = Phase::Generating;
        }

        if !self.credentials.has_selected_credential() {
            debug!(entity_id, "no credential selected, opening selector");
            self.credentials.open_credential_selector();
        }

        let result = self.gateway.generate_visual(request).await;

        let mut states = self.lock_states();
        let state = states.entry(entity_id.to_string()).or_default();
        state.phase = Phase::Idle;
        match result {
            VisualResult::ImageArtifact(uri) => {
                info!(entity_id, "preview generated");
                state.cached_artifact = Some(uri.clone());
                VisualizeOutcome::Generated(uri)
            }
            VisualResult::CredentialError => {
                drop(states);
                self.credentials.open_credential_selector();
                VisualizeOutcome::CredentialRejected
            }
            VisualResult::Failure(kind) => {
                drop(states);
                self.notifier.notify_failure(FAILURE_NOTICE);
                VisualizeOutcome::Failed(kind)
            }
        }
    }

    /// Snapshot of an entity's state; unknown ids are idle with no artifact.
    pub fn state(&self, entity_id: &str) -> EntityVisualState {
        self.lock_states().get(entity_id).cloned().unwrap_or_default()
    }

    /// Whether `entity_id` has a request in flight.
    pub fn is_generating(&self, entity_id: &str) -> bool {
        self.state(entity_id).is_generating()
    }

    /// Cached artifact for `entity_id`.
    pub fn cached_artifact(&self, entity_id: &str) -> Option<String> {
        self.state(entity_id).cached_artifact
    }

    /// Image to show for `entity_id`: the cached artifact, else `default_image`.
    pub fn display_image(&self, entity_id: &str, default_image: &str) -> String {
        self.cached_artifact(entity_id).unwrap_or_else(|| default_image.to_string())
    }

    fn lock_states(&self) -> MutexGuard<'_, HashMap<String, EntityVisualState>> {
        // State is only mutated inside short synchronous sections, so a
        // poisoned map is still consistent.
        self.states.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
