//! Turn, outcome, and provider-selection types.

use std::collections::BTreeMap;
use std::time::SystemTime;

use qcommon::TurnId;
use qprovider::{ProviderError, ProviderErrorKind, ProviderId, VersionId};

/// Per-provider toggle plus the model version to address. Mutated only by
/// the caller between turns; dispatches work from a cloned snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub enabled: bool,
    pub version: VersionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderSelection {
    entries: BTreeMap<ProviderId, SelectionEntry>,
}

impl ProviderSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, provider: ProviderId, version: VersionId) {
        self.entries.insert(
            provider,
            SelectionEntry {
                enabled: true,
                version,
            },
        );
    }

    pub fn disable(&mut self, provider: ProviderId) {
        if let Some(entry) = self.entries.get_mut(&provider) {
            entry.enabled = false;
        }
    }

    pub fn with_provider(mut self, provider: ProviderId, version: VersionId) -> Self {
        self.enable(provider, version);
        self
    }

    pub fn is_enabled(&self, provider: ProviderId) -> bool {
        self.entries
            .get(&provider)
            .map(|entry| entry.enabled)
            .unwrap_or(false)
    }

    pub fn version_for(&self, provider: ProviderId) -> Option<&VersionId> {
        self.entries.get(&provider).map(|entry| &entry.version)
    }

    /// Enabled providers in stable id order.
    pub fn enabled_providers(&self) -> impl Iterator<Item = (ProviderId, &VersionId)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .map(|(provider, entry)| (*provider, &entry.version))
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled_providers().count()
    }
}

/// One user submission. Created once per send action and never mutated;
/// the embedded selection is the snapshot taken when the turn was created.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub id: TurnId,
    pub user_text: String,
    pub topic_id: String,
    pub selection: ProviderSelection,
    pub created_at: SystemTime,
}

impl Turn {
    pub fn new(
        id: TurnId,
        user_text: impl Into<String>,
        topic_id: impl Into<String>,
        selection: ProviderSelection,
    ) -> Self {
        Self {
            id,
            user_text: user_text.into(),
            topic_id: topic_id.into(),
            selection,
            created_at: SystemTime::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Pending,
    Succeeded,
    Failed,
    TimedOut,
    Cancelled,
}

impl OutcomeStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OutcomeStatus::Pending)
    }
}

/// Result of one provider's attempt to answer one turn. Starts Pending and
/// transitions exactly once to a terminal status.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub turn_id: TurnId,
    pub provider_id: ProviderId,
    pub version: VersionId,
    pub status: OutcomeStatus,
    pub content: Option<String>,
    pub error: Option<ProviderError>,
    pub started_at: SystemTime,
    pub completed_at: Option<SystemTime>,
}

impl Outcome {
    pub fn pending(turn_id: TurnId, provider_id: ProviderId, version: VersionId) -> Self {
        Self {
            turn_id,
            provider_id,
            version,
            status: OutcomeStatus::Pending,
            content: None,
            error: None,
            started_at: SystemTime::now(),
            completed_at: None,
        }
    }

    pub fn complete_ok(mut self, content: impl Into<String>) -> Self {
        self.status = OutcomeStatus::Succeeded;
        self.content = Some(content.into());
        self.completed_at = Some(SystemTime::now());
        self
    }

    /// Terminal status follows the error kind: deadline overruns become
    /// TimedOut, cancellations become Cancelled, everything else Failed.
    pub fn complete_err(mut self, error: ProviderError) -> Self {
        self.status = match error.kind {
            ProviderErrorKind::Timeout => OutcomeStatus::TimedOut,
            ProviderErrorKind::Cancelled => OutcomeStatus::Cancelled,
            _ => OutcomeStatus::Failed,
        };
        self.error = Some(error);
        self.completed_at = Some(SystemTime::now());
        self
    }

    /// Human-readable reason shown next to a non-succeeded entry.
    pub fn reason(&self) -> Option<String> {
        self.error.as_ref().map(|error| error.to_string())
    }
}
