//! AgroBot - control dashboard for a robotic dairy milking system
//!
//! The library models a small barn: four milking robots, a herd of cows,
//! a background simulation that advances milking sessions, persisted
//! operator settings and yield analytics. The `tui` module puts an
//! interactive terminal dashboard on top.

pub mod analytics;
pub mod domain;
pub mod error;
pub mod farm;
pub mod seed;
pub mod settings;
pub mod tui;

pub use analytics::Report;
pub use domain::{Cow, Health, Location, MilkingSession, Quality, Robot, RobotStatus};
pub use error::{FarmError, FixSuggestion};
pub use farm::{CommandOutcome, FarmState, SimConfig};
pub use settings::{Settings, SettingsStore};
