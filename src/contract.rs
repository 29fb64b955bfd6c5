//! Contract artifact recording.
//!
//! Verified interactions are merged into one JSON artifact per
//! consumer/provider pair, keyed by description and provider state so
//! repeated runs converge on the same file. Publication to a broker is
//! reserved for the orderly teardown path.

use crate::error::VerificationError;
use crate::interaction::Interaction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Serializes concurrent read-merge-write cycles on the artifact directory.
static WRITE_LOCK: Mutex<()> = Mutex::new(());

/// A party to the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Party name.
    pub name: String,
}

/// Request half of a recorded interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    /// Lowercase HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Wire-format query string, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub query: Option<String>,
    /// Required request headers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub headers: BTreeMap<String, String>,
    /// Required JSON body.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub body: Option<Value>,
}

/// Response half of a recorded interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Served headers, by example value.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub headers: BTreeMap<String, String>,
    /// Served example body.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub body: Option<Value>,
    /// Structural rules the provider must satisfy, by JSON path.
    #[serde(
        rename = "matchingRules",
        skip_serializing_if = "BTreeMap::is_empty",
        default
    )]
    pub matching_rules: BTreeMap<String, Value>,
}

/// One agreed request/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedInteraction {
    /// What the consumer is doing.
    pub description: String,
    /// Provider precondition, if any.
    #[serde(
        rename = "providerState",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub provider_state: Option<String>,
    /// Request half.
    pub request: RecordedRequest,
    /// Response half.
    pub response: RecordedResponse,
}

impl RecordedInteraction {
    /// Record a staged interaction in artifact form.
    pub fn from_interaction(interaction: &Interaction) -> Self {
        let request = &interaction.request;
        let response = &interaction.response;

        let mut matching_rules = BTreeMap::new();
        if let Some(body) = &response.body {
            body.collect_rules("$.body", &mut matching_rules);
        }
        for (name, matcher) in &response.headers {
            matcher.collect_rules(&format!("$.headers.{}", name), &mut matching_rules);
        }

        Self {
            description: interaction.description.clone(),
            provider_state: interaction.provider_state.clone(),
            request: RecordedRequest {
                method: request.method.as_str().to_lowercase(),
                path: request.path.clone(),
                query: request.query_string(),
                headers: request.headers.iter().cloned().collect(),
                body: request.body.clone(),
            },
            response: RecordedResponse {
                status: response.status,
                headers: response.header_examples().into_iter().collect(),
                body: response.body.as_ref().map(|m| m.example()),
                matching_rules,
            },
        }
    }

    fn key(&self) -> (String, Option<String>) {
        (self.description.clone(), self.provider_state.clone())
    }
}

/// Version marker the artifact carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationVersion {
    /// Specification version string.
    pub version: String,
}

/// Artifact metadata block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractMetadata {
    /// Specification the artifact conforms to.
    #[serde(rename = "pactSpecification")]
    pub pact_specification: SpecificationVersion,
}

impl Default for ContractMetadata {
    fn default() -> Self {
        Self {
            pact_specification: SpecificationVersion {
                version: "2.0.0".to_string(),
            },
        }
    }
}

/// The persisted contract for one consumer/provider pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractFile {
    /// Consumer party.
    pub consumer: Participant,
    /// Provider party.
    pub provider: Participant,
    /// Agreed interactions, sorted for stable output.
    pub interactions: Vec<RecordedInteraction>,
    /// Metadata block.
    #[serde(default)]
    pub metadata: ContractMetadata,
}

impl ContractFile {
    /// Empty contract for a pair.
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            consumer: Participant {
                name: consumer.into(),
            },
            provider: Participant {
                name: provider.into(),
            },
            interactions: Vec::new(),
            metadata: ContractMetadata::default(),
        }
    }

    /// Insert or replace an interaction, keyed by description and state.
    pub fn upsert(&mut self, interaction: RecordedInteraction) {
        let key = interaction.key();
        if let Some(existing) = self.interactions.iter_mut().find(|i| i.key() == key) {
            *existing = interaction;
        } else {
            self.interactions.push(interaction);
        }
        self.interactions.sort_by_key(RecordedInteraction::key);
    }

    /// Merge this contract into the artifact in `dir`, creating the
    /// directory and file as needed. Returns the artifact path.
    ///
    /// Interactions already on disk are kept unless this contract replaces
    /// them; a file that no longer parses is regenerated from scratch.
    pub fn merge_into_dir(&self, dir: &Path) -> Result<PathBuf, VerificationError> {
        let _guard = WRITE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}-{}.json", self.consumer.name, self.provider.name));

        let mut merged = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<ContractFile>(&content)
                .unwrap_or_else(|_| ContractFile::new(&*self.consumer.name, &*self.provider.name)),
            Err(_) => ContractFile::new(&*self.consumer.name, &*self.provider.name),
        };
        for interaction in &self.interactions {
            merged.upsert(interaction.clone());
        }

        let mut bytes = serde_json::to_vec_pretty(&merged)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        bytes.push(b'\n');
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Publish this contract to a broker.
    pub async fn publish(
        &self,
        broker_url: &str,
        consumer_version: &str,
    ) -> Result<(), VerificationError> {
        let url = format!(
            "{}/pacts/provider/{}/consumer/{}/version/{}",
            broker_url.trim_end_matches('/'),
            self.provider.name,
            self.consumer.name,
            consumer_version,
        );

        let client = reqwest::Client::new();
        let response = client
            .put(&url)
            .json(self)
            .send()
            .await
            .map_err(|e| VerificationError::Publish(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(VerificationError::Publish(format!(
                "broker returned {} for {}",
                response.status(),
                url
            )))
        }
    }
}
