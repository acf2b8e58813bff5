//! Run orchestration.
//!
//! Wires the release-state reader, the step schedule, and the notifier into
//! one linear pass: query the track, gate on status, pick the next step,
//! post the card. Collaborators sit behind traits so the decision path is
//! testable without the network.

use tracing::{info, warn};

use crate::notify::{CardNotifier, Delivery, RolloutUpdate};
use crate::play::{PlayClient, PlayResult};
use crate::release::{ReleaseStatus, TrackState};
use crate::schedule::RolloutSchedule;

/// Source of a track's current release state.
pub trait ReleaseStateReader {
    fn track_state(&self, package_name: &str, track: &str) -> PlayResult<TrackState>;
}

impl ReleaseStateReader for PlayClient {
    fn track_state(&self, package_name: &str, track: &str) -> PlayResult<TrackState> {
        let edit_id = self.insert_edit(package_name)?;
        self.get_track(&edit_id, package_name, track)
    }
}

/// Sink for rollout-update notifications.
pub trait Notifier {
    fn notify(&self, update: &RolloutUpdate) -> Delivery;
}

impl Notifier for CardNotifier {
    fn notify(&self, update: &RolloutUpdate) -> Delivery {
        self.send(update)
    }
}

/// How a run ended. All variants are graceful (exit 0).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The track has no releases; nothing to message about.
    NoReleases,

    /// The release already completed its rollout.
    Completed,

    /// The rollout was halted by an operator.
    Halted,

    /// A notification was attempted for an in-progress rollout.
    Notified {
        current_fraction: f64,
        next_fraction: Option<f64>,
        delivered: bool,
    },
}

/// Execute one pass for the given track.
///
/// Status gating happens before schedule parsing, so a terminal release
/// never trips over a malformed schedule string. Schedule validation
/// happens before the webhook POST, so a malformed schedule never produces
/// a partial notification.
pub fn run(
    reader: &dyn ReleaseStateReader,
    notifier: &dyn Notifier,
    package_name: &str,
    track: &str,
    rollout_steps_raw: &str,
) -> anyhow::Result<Outcome> {
    let state = reader.track_state(package_name, track)?;

    if state.is_empty() {
        info!("track {track} has no releases, skipping messages");
        return Ok(Outcome::NoReleases);
    }

    // Releases are handled in order; every branch ends the run, so only the
    // first release is ever acted on.
    for release in &state.releases {
        info!(status = %release.status, "release status");

        if release.status == ReleaseStatus::Completed {
            info!("release is completed, no messaging needed");
            return Ok(Outcome::Completed);
        }
        if release.status == ReleaseStatus::Halted {
            info!("release was halted, skipping messaging");
            return Ok(Outcome::Halted);
        }

        info!("release is in progress, continuing update");

        let schedule = RolloutSchedule::parse(rollout_steps_raw)?;
        info!("rollout steps are {schedule}");

        let current_fraction = release.fraction();
        let next_fraction = schedule.next_after(current_fraction);

        if next_fraction.is_none() {
            info!("no higher rollout step found, already at or above the maximum configured value");
        }

        let update = RolloutUpdate {
            package_name: package_name.to_string(),
            track: track.to_string(),
            current_fraction,
            next_fraction,
        };

        info!(
            "messaging about increasing the rollout from {} to {:?}",
            current_fraction, next_fraction
        );

        let delivery = notifier.notify(&update);
        if delivery.success {
            info!(status = ?delivery.status_code, "message sent in {}ms", delivery.duration_ms);
        } else {
            // Fire-and-forget: a failed delivery does not fail the run.
            warn!(
                status = ?delivery.status_code,
                "message delivery failed: {}",
                delivery.error.as_deref().unwrap_or("unknown error")
            );
        }

        return Ok(Outcome::Notified {
            current_fraction,
            next_fraction,
            delivered: delivery.success,
        });
    }

    Ok(Outcome::NoReleases)
}
