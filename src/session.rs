//! Contract session lifecycle.
//!
//! A session owns the mock provider for one test: interactions are staged,
//! enforced only between `activate` and `deactivate`, then settled by a
//! single `verify`. Verified interactions are recorded into the contract
//! artifact on teardown. The `Drop` impl is the exit-time safety net: it
//! writes the artifact if the orderly path never ran, but never publishes.

use crate::config::SessionConfig;
use crate::contract::{ContractFile, RecordedInteraction};
use crate::error::VerificationError;
use crate::interaction::Interaction;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockGuard, MockServer, ResponseTemplate};

/// Lifecycle state of a session's interaction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Interactions are being staged; the provider is not intercepting.
    Staged,
    /// Staged interactions are mounted and enforced.
    Active,
    /// Every staged interaction played out as described. Terminal.
    Verified,
    /// A mismatch or missing invocation was detected. Terminal.
    Failed,
}

/// A per-test contract session against a mock provider.
pub struct ContractSession {
    config: SessionConfig,
    server: MockServer,
    staged: Vec<Interaction>,
    guards: Vec<MockGuard>,
    observed: Vec<usize>,
    state: SessionState,
    contract: ContractFile,
    torn_down: AtomicBool,
}

impl ContractSession {
    /// Validate the configuration and boot the mock provider.
    pub async fn start(config: SessionConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let server = MockServer::start().await;
        let contract = ContractFile::new(&*config.consumer, &*config.provider);

        info!(
            consumer = %config.consumer,
            provider = %config.provider,
            uri = %server.uri(),
            "contract session started"
        );

        Ok(Self {
            config,
            server,
            staged: Vec::new(),
            guards: Vec::new(),
            observed: Vec::new(),
            state: SessionState::Staged,
            contract,
            torn_down: AtomicBool::new(false),
        })
    }

    /// Base URL of the mock provider, for the client under test.
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Stage an interaction. Staged interactions are not enforced until
    /// [`ContractSession::activate`].
    pub fn stage(&mut self, interaction: Interaction) {
        debug!(
            description = %interaction.description,
            state = interaction.provider_state.as_deref().unwrap_or("-"),
            "staged interaction"
        );
        self.staged.push(interaction);
    }

    /// Mount every staged interaction; the provider starts intercepting.
    pub async fn activate(&mut self) -> Result<(), VerificationError> {
        if self.state != SessionState::Staged {
            return Err(VerificationError::InvalidState(format!(
                "activate requires a staged session, state is {:?}",
                self.state
            )));
        }
        if self.staged.is_empty() {
            return Err(VerificationError::InvalidState(
                "no interactions staged".to_string(),
            ));
        }

        for interaction in &self.staged {
            let guard = build_mock(interaction).mount_as_scoped(&self.server).await;
            self.guards.push(guard);
        }

        self.state = SessionState::Active;
        debug!(interactions = self.staged.len(), "session activated");
        Ok(())
    }

    /// Collect invocation counts and unmount the interactions; the provider
    /// stops intercepting. Must run before [`ContractSession::verify`].
    pub async fn deactivate(&mut self) -> Result<(), VerificationError> {
        if self.state != SessionState::Active || self.guards.is_empty() {
            return Err(VerificationError::InvalidState(format!(
                "deactivate requires an active scope, state is {:?}",
                self.state
            )));
        }

        for guard in &self.guards {
            self.observed.push(guard.received_requests().await.len());
        }
        self.guards.clear();
        debug!("session scope closed");
        Ok(())
    }

    /// Settle the interaction set: every staged interaction must have been
    /// invoked exactly once and nothing unexpected may have arrived.
    ///
    /// On success the interactions are recorded for the contract artifact
    /// and the provider's request log is cleared.
    pub async fn verify(&mut self) -> Result<(), VerificationError> {
        if self.state != SessionState::Active {
            return Err(VerificationError::InvalidState(format!(
                "verify requires an activated session, state is {:?}",
                self.state
            )));
        }
        if !self.guards.is_empty() {
            return Err(VerificationError::InvalidState(
                "verify called inside the active scope; deactivate first".to_string(),
            ));
        }

        let mut mismatches = Vec::new();
        for (interaction, count) in self.staged.iter().zip(&self.observed) {
            if *count != 1 {
                mismatches.push(format!(
                    "{} (given {}): expected exactly 1 invocation, saw {}",
                    interaction.description,
                    interaction.provider_state.as_deref().unwrap_or("-"),
                    count
                ));
            }
        }

        let matched: usize = self.observed.iter().sum();
        let received = self
            .server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0);
        if received > matched {
            mismatches.push(format!(
                "{} unexpected request(s) reached the mock provider",
                received - matched
            ));
        }

        if mismatches.is_empty() {
            for interaction in &self.staged {
                self.contract
                    .upsert(RecordedInteraction::from_interaction(interaction));
            }
            self.server.reset().await;
            self.state = SessionState::Verified;
            info!(
                interactions = self.staged.len(),
                "interaction set verified"
            );
            Ok(())
        } else {
            self.state = SessionState::Failed;
            warn!(mismatches = mismatches.len(), "interaction set failed");
            Err(VerificationError::Mismatch { mismatches })
        }
    }

    /// Orderly teardown: write the contract artifact and publish it iff the
    /// configuration says so, exactly once. Repeated calls are no-ops, and a
    /// later drop will not re-run any of it.
    pub async fn teardown(&mut self) -> Result<Option<PathBuf>, VerificationError> {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        if self.contract.interactions.is_empty() {
            return Ok(None);
        }

        let written = self.contract.merge_into_dir(&self.config.contract_dir)?;
        info!(path = %written.display(), "contract artifact written");

        if self.config.publish {
            if let Some(broker_url) = &self.config.broker_url {
                self.contract
                    .publish(broker_url, &self.config.consumer_version)
                    .await?;
                info!(broker = %broker_url, "contract published");
            }
        }

        Ok(Some(written))
    }
}

impl Drop for ContractSession {
    fn drop(&mut self) {
        // Safety net for sessions that never reached the orderly path: keep
        // the artifact, skip publication.
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.contract.interactions.is_empty() {
            return;
        }
        if let Err(e) = self.contract.merge_into_dir(&self.config.contract_dir) {
            warn!(error = %e, "failed to write contract artifact during drop");
        }
    }
}

/// Translate an interaction into a mounted expectation.
fn build_mock(interaction: &Interaction) -> Mock {
    let request = &interaction.request;

    let mut builder =
        Mock::given(method(request.method.as_str())).and(path(request.path.clone()));
    for (name, value) in &request.query {
        builder = builder.and(query_param(name.clone(), value.clone()));
    }
    for (name, value) in &request.headers {
        builder = builder.and(header(name.as_str(), value.as_str()));
    }
    if let Some(body) = &request.body {
        builder = builder.and(body_json(body.clone()));
    }

    let mut template = ResponseTemplate::new(interaction.response.status);
    for (name, value) in interaction.response.header_examples() {
        template = template.insert_header(name.as_str(), value.as_str());
    }
    if let Some(matcher) = &interaction.response.body {
        template = template.set_body_json(matcher.example());
    }

    // Invocation counts are checked in `verify`, not by the mock itself:
    // guard drop must stay panic-free so mismatches surface as errors.
    builder
        .respond_with(template)
        .named(interaction.description.clone())
}
