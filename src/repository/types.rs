use serde::Serialize;

use crate::feedback::types::FeedbackItem;
use crate::query::types::Page;

/// Where a read was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Remote,
    /// The remote could not be used; the data is the last locally persisted snapshot.
    Fallback,
}

impl DataSource {
    pub fn is_degraded(self) -> bool {
        self == DataSource::Fallback
    }
}

/// The whole collection as returned by `list`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub items: Vec<FeedbackItem>,
    pub source: DataSource,
}

impl Listing {
    pub fn is_degraded(&self) -> bool {
        self.source.is_degraded()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub page: Page<FeedbackItem>,
    pub source: DataSource,
}

impl SearchOutcome {
    pub fn is_degraded(&self) -> bool {
        self.source.is_degraded()
    }
}

/// Result of a submission. Both variants carry the record now in the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Accepted by the remote; the item is the server's record.
    SavedRemote(FeedbackItem),
    /// Kept locally with its generated id; the remote never saw it.
    SavedOffline(FeedbackItem),
}

impl SaveOutcome {
    pub fn item(&self) -> &FeedbackItem {
        match self {
            SaveOutcome::SavedRemote(item) | SaveOutcome::SavedOffline(item) => item,
        }
    }

    pub fn into_item(self) -> FeedbackItem {
        match self {
            SaveOutcome::SavedRemote(item) | SaveOutcome::SavedOffline(item) => item,
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, SaveOutcome::SavedOffline(_))
    }
}

/// Whether the remote acknowledged a mutation that was applied locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncState {
    Synced,
    LocalOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub item: FeedbackItem,
    pub sync: SyncState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub id: String,
    pub sync: SyncState,
}
