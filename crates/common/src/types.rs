use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a mounted wizard step.
///
/// A new ID is minted every time a step coordinator is created, so two
/// mounts of the same step never share an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(Uuid);

impl StepId {
    /// Creates a new random step ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a step ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for StepId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A remote resource that can be selected by its identifier.
///
/// This is the only thing a selection step needs to know about the items
/// it lists.
pub trait Identified {
    /// Returns the resource identifier.
    fn id(&self) -> &str;
}

/// Lifecycle status reported for a connector cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStatus {
    #[default]
    Unconnected,
    Ready,
    Disconnected,
}

impl ClusterStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterStatus::Unconnected => "unconnected",
            ClusterStatus::Ready => "ready",
            ClusterStatus::Disconnected => "disconnected",
        }
    }
}

impl std::fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cluster connectors can be deployed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorCluster {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: ClusterStatus,
}

impl ConnectorCluster {
    /// Creates a cluster in the `ready` status.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ClusterStatus::Ready,
        }
    }

    /// Returns a copy of this cluster with the given status.
    pub fn with_status(mut self, status: ClusterStatus) -> Self {
        self.status = status;
        self
    }
}

impl Identified for ConnectorCluster {
    fn id(&self) -> &str {
        &self.id
    }
}
