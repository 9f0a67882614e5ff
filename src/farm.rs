//! FarmState - single owner of the robot, herd and session collections
//!
//! All mutation goes through command methods; views hold read-only slices.
//! The lifecycle "simulation" here is a demo stand-in that makes the
//! dashboard look alive. It is not a scheduler: ticks draw independent
//! probabilities per robot and make no fairness or ordering guarantees.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::domain::{Cow, CowDraft, Location, MilkingSession, Robot, RobotStatus};
use crate::error::FarmError;
use crate::seed;

/// Cadence of the background simulation tick
pub const SIM_INTERVAL: Duration = Duration::from_secs(10);
/// Delay before a diagnostics run reports back
pub const DIAGNOSTICS_DELAY: Duration = Duration::from_secs(2);
/// Delay before a rebooted robot comes back idle
pub const RESET_DELAY: Duration = Duration::from_secs(3);

/// Per-tick probabilities. Injectable so tests can force draws to 0.0/1.0.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Chance an active robot finishes its session on a tick
    pub finish_chance: f64,
    /// Chance an idle robot picks up a waiting cow on a tick
    pub start_chance: f64,
    /// Chance a diagnostics run resolves healthy
    pub diag_healthy_chance: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            finish_chance: 0.1,
            start_chance: 0.05,
            diag_healthy_chance: 0.7,
        }
    }
}

/// Result of a user-issued robot command.
///
/// Failure handling is user-facing by design: blocked commands come back
/// as `Rejected` with an explanatory message and no state change,
/// destructive ones as `NeedsConfirm` until the caller re-issues them
/// confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied(String),
    Rejected(String),
    NeedsConfirm(String),
    Scheduled(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Diagnostics,
    ResetFinish,
}

/// A single-shot delayed completion. Cannot be cancelled once scheduled.
#[derive(Debug, Clone)]
struct PendingOp {
    robot_id: String,
    kind: PendingKind,
    due: Instant,
}

pub struct FarmState {
    robots: Vec<Robot>,
    cows: Vec<Cow>,
    sessions: Vec<MilkingSession>,
    sim: SimConfig,
    pending: Vec<PendingOp>,
}

impl Default for FarmState {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl FarmState {
    pub fn new(sim: SimConfig) -> Self {
        Self {
            robots: seed::robots(),
            cows: seed::cows(),
            sessions: seed::sessions(),
            sim,
            pending: Vec::new(),
        }
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn cows(&self) -> &[Cow] {
        &self.cows
    }

    pub fn sessions(&self) -> &[MilkingSession] {
        &self.sessions
    }

    pub fn robot(&self, robot_id: &str) -> Option<&Robot> {
        self.robots.iter().find(|r| r.id == robot_id)
    }

    pub fn cow(&self, cow_id: &str) -> Option<&Cow> {
        self.cows.iter().find(|c| c.id == cow_id)
    }

    fn robot_mut(&mut self, robot_id: &str) -> Result<&mut Robot, FarmError> {
        self.robots
            .iter_mut()
            .find(|r| r.id == robot_id)
            .ok_or_else(|| FarmError::RobotNotFound {
                robot_id: robot_id.to_string(),
            })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Herd CRUD
    // ─────────────────────────────────────────────────────────────────────

    /// Admit a new cow to the herd. The id is timestamp-derived; the
    /// collision window on rapid successive adds is an accepted limitation.
    pub fn add_cow(&mut self, draft: CowDraft) -> &Cow {
        let id = next_cow_id(chrono::Utc::now().timestamp_millis());
        tracing::debug!(cow_id = %id, "admitting cow to herd");
        self.cows.push(draft.into_cow(id));
        self.cows.last().expect("just pushed")
    }

    /// Full-record replace keyed by id
    pub fn update_cow(&mut self, cow: Cow) -> Result<(), FarmError> {
        match self.cows.iter_mut().find(|c| c.id == cow.id) {
            Some(slot) => {
                *slot = cow;
                Ok(())
            }
            None => Err(FarmError::CowNotFound { cow_id: cow.id }),
        }
    }

    /// Unconditional removal. No dependency check against sessions or
    /// robots referencing the cow; those references stay dangling.
    pub fn delete_cow(&mut self, cow_id: &str) -> Result<Cow, FarmError> {
        match self.cows.iter().position(|c| c.id == cow_id) {
            Some(idx) => Ok(self.cows.remove(idx)),
            None => Err(FarmError::CowNotFound {
                cow_id: cow_id.to_string(),
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Robot commands
    // ─────────────────────────────────────────────────────────────────────

    /// Manual start. Does not auto-assign a cow.
    pub fn start_robot(&mut self, robot_id: &str) -> Result<CommandOutcome, FarmError> {
        let robot = self.robot_mut(robot_id)?;
        if robot.status == RobotStatus::Error {
            return Ok(CommandOutcome::Rejected(format!(
                "{} is in an error state. Run diagnostics first.",
                robot.name
            )));
        }
        robot.status = RobotStatus::Active;
        tracing::debug!(robot_id, "robot started");
        Ok(CommandOutcome::Applied(format!("{} started", robot.name)))
    }

    /// Stop. Interrupting a live session requires confirmation.
    pub fn stop_robot(
        &mut self,
        robot_id: &str,
        confirmed: bool,
    ) -> Result<CommandOutcome, FarmError> {
        let robot = self.robot_mut(robot_id)?;
        if robot.status == RobotStatus::Active && robot.current_cow.is_some() && !confirmed {
            return Ok(CommandOutcome::NeedsConfirm(format!(
                "{} is milking cow {}. Stop it anyway?",
                robot.name,
                robot.current_cow.as_deref().unwrap_or("?")
            )));
        }
        robot.status = RobotStatus::Idle;
        robot.current_cow = None;
        tracing::debug!(robot_id, "robot stopped");
        Ok(CommandOutcome::Applied(format!("{} stopped", robot.name)))
    }

    /// Put the robot into maintenance and stamp the date.
    pub fn maintenance(&mut self, robot_id: &str) -> Result<CommandOutcome, FarmError> {
        let robot = self.robot_mut(robot_id)?;
        if robot.status == RobotStatus::Active && robot.current_cow.is_some() {
            return Ok(CommandOutcome::Rejected(format!(
                "Cannot service {} while it is milking. Stop it first.",
                robot.name
            )));
        }
        robot.status = RobotStatus::Maintenance;
        robot.last_maintenance = today();
        robot.current_cow = None;
        tracing::debug!(robot_id, "robot sent to maintenance");
        Ok(CommandOutcome::Applied(format!(
            "{} is under maintenance",
            robot.name
        )))
    }

    /// Kick off an async diagnostics pass. The robot is untouched until
    /// the run resolves via [`process_pending`](Self::process_pending);
    /// there is no way to abort it once started.
    pub fn run_diagnostics(
        &mut self,
        robot_id: &str,
        now: Instant,
    ) -> Result<CommandOutcome, FarmError> {
        let robot = self.robot_mut(robot_id)?;
        let name = robot.name.clone();
        if self
            .pending
            .iter()
            .any(|p| p.robot_id == robot_id && p.kind == PendingKind::Diagnostics)
        {
            return Ok(CommandOutcome::Rejected(format!(
                "Diagnostics already running on {}.",
                name
            )));
        }
        self.pending.push(PendingOp {
            robot_id: robot_id.to_string(),
            kind: PendingKind::Diagnostics,
            due: now + DIAGNOSTICS_DELAY,
        });
        Ok(CommandOutcome::Scheduled(format!(
            "Running diagnostics on {}...",
            name
        )))
    }

    /// Reboot: maintenance now, back to idle after [`RESET_DELAY`].
    pub fn reset_robot(
        &mut self,
        robot_id: &str,
        confirmed: bool,
        now: Instant,
    ) -> Result<CommandOutcome, FarmError> {
        let robot = self.robot_mut(robot_id)?;
        if !confirmed {
            return Ok(CommandOutcome::NeedsConfirm(format!(
                "Reboot {}? This can take a few minutes.",
                robot.name
            )));
        }
        robot.status = RobotStatus::Maintenance;
        robot.current_cow = None;
        let name = robot.name.clone();
        self.pending.push(PendingOp {
            robot_id: robot_id.to_string(),
            kind: PendingKind::ResetFinish,
            due: now + RESET_DELAY,
        });
        tracing::debug!(robot_id, "robot rebooting");
        Ok(CommandOutcome::Scheduled(format!("Rebooting {}...", name)))
    }

    /// Stop every robot at once, clearing any live session.
    pub fn emergency_stop(&mut self) -> String {
        for robot in &mut self.robots {
            robot.status = RobotStatus::Idle;
            robot.current_cow = None;
        }
        tracing::warn!("emergency stop issued for all robots");
        "Emergency stop executed for all robots".to_string()
    }

    /// True when the given robot has a diagnostics run in flight.
    pub fn diagnostics_running(&self, robot_id: &str) -> bool {
        self.pending
            .iter()
            .any(|p| p.robot_id == robot_id && p.kind == PendingKind::Diagnostics)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Simulation
    // ─────────────────────────────────────────────────────────────────────

    /// One background tick. Each robot draws independently; the first
    /// waiting cow is adopted without updating her location, so two idle
    /// robots firing on the same tick can adopt the same cow. The source
    /// behaves the same way and the looseness is deliberate.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Vec<String> {
        let mut notices = Vec::new();
        let waiting_cow: Option<String> = self
            .cows
            .iter()
            .find(|c| c.location == Location::Waiting)
            .map(|c| c.id.clone());

        for robot in &mut self.robots {
            match robot.status {
                RobotStatus::Active if rng.gen_bool(self.sim.finish_chance) => {
                    if let Some(cow_id) = robot.current_cow.take() {
                        notices.push(format!("{} finished milking {}", robot.name, cow_id));
                    }
                    robot.sessions_today += 1;
                }
                RobotStatus::Idle if rng.gen_bool(self.sim.start_chance) => {
                    if let Some(cow_id) = &waiting_cow {
                        robot.status = RobotStatus::Active;
                        robot.current_cow = Some(cow_id.clone());
                        notices.push(format!("{} started milking {}", robot.name, cow_id));
                    }
                }
                _ => {}
            }
        }
        notices
    }

    /// Resolve delayed completions that have come due. Returns the
    /// user-facing notices produced by each resolution.
    pub fn process_pending(&mut self, now: Instant, rng: &mut impl Rng) -> Vec<String> {
        let mut due = Vec::new();
        self.pending.retain(|op| {
            if op.due <= now {
                due.push(op.clone());
                false
            } else {
                true
            }
        });

        let mut notices = Vec::new();
        for op in due {
            let healthy = rng.gen_bool(self.sim.diag_healthy_chance);
            let Ok(robot) = self.robot_mut(&op.robot_id) else {
                continue;
            };
            match op.kind {
                PendingKind::Diagnostics => {
                    if healthy {
                        robot.status = RobotStatus::Idle;
                        notices.push(format!(
                            "Diagnostics on {} complete. All systems nominal.",
                            robot.name
                        ));
                    } else {
                        notices.push(format!(
                            "Diagnostics on {} found a fault. Maintenance required.",
                            robot.name
                        ));
                    }
                }
                PendingKind::ResetFinish => {
                    robot.status = RobotStatus::Idle;
                    robot.current_cow = None;
                    notices.push(format!("{} rebooted and ready.", robot.name));
                }
            }
        }
        notices
    }
}

/// `C` + last three digits of a Unix-millis timestamp, matching the
/// legacy id scheme. Collisions on rapid adds are accepted, not handled.
pub fn next_cow_id(unix_millis: i64) -> String {
    format!("C{:03}", unix_millis.rem_euclid(1000))
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
