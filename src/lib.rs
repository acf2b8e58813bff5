//! # Stagecast
//!
//! Announces when a staged Play-store rollout is ready to advance to its
//! next percentage step.
//!
//! Stagecast queries the Play Developer API for the current state of a
//! release track, works out the next step from an operator-supplied
//! schedule (e.g. `1,20,50,100`), and posts an Adaptive Card to a team
//! webhook. One linear pass per invocation: one read, at most one write.
//!
//! ## Quick Start
//!
//! ```bash
//! stagecast production 1,20,50,100 com.example.app \
//!     https://example.webhook.office.com/... credentials.json
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod app;
pub mod notify;
pub mod play;
pub mod release;
pub mod schedule;

pub use app::{run, Notifier, Outcome, ReleaseStateReader};
pub use notify::{CardNotifier, RolloutUpdate};
pub use play::{Credentials, PlayClient, PlayError};
pub use release::{Release, ReleaseStatus, TrackState};
pub use schedule::{RolloutSchedule, ScheduleError};
