//! Release track wire model.
//!
//! Mirrors the androidpublisher v3 `Track` resource: a track carries zero or
//! more releases, each with a status and (for staged rollouts) the fraction
//! of users currently receiving it.

use serde::{Deserialize, Serialize};

/// Status of a release on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseStatus {
    StatusUnspecified,
    Draft,
    InProgress,
    Halted,
    Completed,
}

impl ReleaseStatus {
    /// Get the status name as it appears on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StatusUnspecified => "statusUnspecified",
            Self::Draft => "draft",
            Self::InProgress => "inProgress",
            Self::Halted => "halted",
            Self::Completed => "completed",
        }
    }

    /// Whether this status ends processing with no notification.
    ///
    /// A completed release has nothing left to advance; a halted one must
    /// not be advanced.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Halted)
    }
}

impl std::fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One release on a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Release status.
    pub status: ReleaseStatus,

    /// Fraction of users receiving this release, in `[0, 1]`.
    ///
    /// Absent for non-staged releases; the API omits it once a rollout
    /// completes.
    #[serde(default)]
    pub user_fraction: Option<f64>,

    /// Human-readable release name (usually the version name).
    #[serde(default)]
    pub name: Option<String>,

    /// Version codes included in this release.
    #[serde(default)]
    pub version_codes: Vec<i64>,
}

impl Release {
    /// Current rollout fraction, treating an absent value as zero.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.user_fraction.unwrap_or(0.0)
    }
}

/// A track and its releases, as returned by `edits.tracks.get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackState {
    /// Track name (e.g. `production`, `internal`).
    #[serde(default)]
    pub track: Option<String>,

    /// Active releases on the track. May be absent entirely.
    #[serde(default)]
    pub releases: Vec<Release>,
}

impl TrackState {
    /// Whether the track has no releases at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}
