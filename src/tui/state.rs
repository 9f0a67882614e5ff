//! UI state - view routing, selections, prompts and the cow form
//!
//! Domain state lives in [`FarmState`](crate::farm::FarmState); everything
//! here is presentation-side and owns no farm data.

use std::collections::VecDeque;
use std::time::Instant;

use crate::domain::{Cow, CowDraft, Health, Location};

/// How long a first press of the emergency-stop key stays armed
pub const EMERGENCY_ARM_WINDOW: std::time::Duration = std::time::Duration::from_secs(5);

// ─────────────────────────────────────────────────────────────────────────────
// Views
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Herd,
    Robots,
    Analytics,
    Settings,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Herd,
        View::Robots,
        View::Analytics,
        View::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Herd => "Herd",
            Self::Robots => "Robots",
            Self::Analytics => "Analytics",
            Self::Settings => "Settings",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Dashboard => Self::Herd,
            Self::Herd => Self::Robots,
            Self::Robots => Self::Analytics,
            Self::Analytics => Self::Settings,
            Self::Settings => Self::Dashboard,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Dashboard => Self::Settings,
            Self::Herd => Self::Dashboard,
            Self::Robots => Self::Herd,
            Self::Analytics => Self::Robots,
            Self::Settings => Self::Analytics,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Confirmation prompts
// ─────────────────────────────────────────────────────────────────────────────

/// Destructive commands gated behind an explicit confirm step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    StopRobot(String),
    ResetRobot(String),
    DeleteCow(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub message: String,
    pub action: ConfirmAction,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cow form (add/edit modal)
// ─────────────────────────────────────────────────────────────────────────────

/// Text fields in tab order, then the two enum pickers
pub const FORM_FIELDS: [&str; 7] = [
    "Name",
    "RFID tag",
    "Last milking",
    "Daily yield (l)",
    "Avg yield (l)",
    "Health",
    "Location",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CowForm {
    /// `None` in add mode; the id being replaced in edit mode
    pub editing_id: Option<String>,
    pub text: [String; 5],
    pub health: Health,
    pub location: Location,
    pub focus: usize,
}

impl CowForm {
    pub fn for_add() -> Self {
        Self {
            editing_id: None,
            text: Default::default(),
            health: Health::Good,
            location: Location::Pasture,
            focus: 0,
        }
    }

    pub fn for_edit(cow: &Cow) -> Self {
        Self {
            editing_id: Some(cow.id.clone()),
            text: [
                cow.name.clone(),
                cow.tag_id.clone(),
                cow.last_milking.clone(),
                format!("{}", cow.daily_yield),
                format!("{}", cow.avg_yield),
            ],
            health: cow.health,
            location: cow.location,
            focus: 0,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FORM_FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }

    /// Typed input lands in the focused text field; the pickers ignore it
    pub fn input(&mut self, c: char) {
        if let Some(field) = self.text.get_mut(self.focus) {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.text.get_mut(self.focus) {
            field.pop();
        }
    }

    /// Left/right on a picker field cycles its variants
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            5 => self.health = cycle_health(self.health, forward),
            6 => self.location = cycle_location(self.location, forward),
            _ => {}
        }
    }

    /// Validate and convert to a draft. Parse failures come back as a
    /// user-facing message; the form stays open with its input intact.
    pub fn to_draft(&self) -> Result<CowDraft, String> {
        let name = self.text[0].trim();
        if name.is_empty() {
            return Err("Name must not be empty".to_string());
        }
        let daily_yield: f64 = self.text[3]
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a valid daily yield", self.text[3]))?;
        let avg_yield: f64 = self.text[4]
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a valid average yield", self.text[4]))?;
        if daily_yield < 0.0 || avg_yield < 0.0 {
            return Err("Yields must be non-negative".to_string());
        }
        Ok(CowDraft {
            name: name.to_string(),
            tag_id: self.text[1].trim().to_string(),
            last_milking: self.text[2].trim().to_string(),
            daily_yield,
            avg_yield,
            health: self.health,
            location: self.location,
        })
    }
}

fn cycle_health(h: Health, forward: bool) -> Health {
    const ORDER: [Health; 4] = [
        Health::Excellent,
        Health::Good,
        Health::Attention,
        Health::Poor,
    ];
    step(&ORDER, h, forward)
}

fn cycle_location(l: Location, forward: bool) -> Location {
    const ORDER: [Location; 3] = [Location::Waiting, Location::Milking, Location::Pasture];
    step(&ORDER, l, forward)
}

fn step<T: Copy + PartialEq>(order: &[T], current: T, forward: bool) -> T {
    let idx = order.iter().position(|&x| x == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % order.len()
    } else {
        (idx + order.len() - 1) % order.len()
    };
    order[next]
}

// ─────────────────────────────────────────────────────────────────────────────
// UI state
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct UiState {
    pub view: View,

    pub robot_idx: usize,
    pub cow_idx: usize,
    pub settings_idx: usize,

    pub confirm: Option<ConfirmPrompt>,
    pub cow_form: Option<CowForm>,

    /// Recent user-facing notices, newest first
    pub events: VecDeque<String>,
    pub max_events: usize,

    /// Set while the emergency-stop key is armed for its second press
    pub emergency_armed_until: Option<Instant>,

    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            view: View::Dashboard,
            robot_idx: 0,
            cow_idx: 0,
            settings_idx: 0,
            confirm: None,
            cow_form: None,
            events: VecDeque::new(),
            max_events: 50,
            emergency_armed_until: None,
            should_quit: false,
        }
    }
}

impl UiState {
    pub fn push_event(&mut self, message: impl Into<String>) {
        self.events.push_front(message.into());
        if self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }

    /// Latest notice, for the status line
    pub fn status_line(&self) -> Option<&str> {
        self.events.front().map(String::as_str)
    }

    /// Drop a stale emergency arm once its window has passed
    pub fn expire_emergency_arm(&mut self, now: Instant) {
        if let Some(until) = self.emergency_armed_until {
            if now >= until {
                self.emergency_armed_until = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use std::time::Duration;

    #[test]
    fn view_cycle_is_closed() {
        let mut view = View::Dashboard;
        for _ in 0..View::ALL.len() {
            view = view.next();
        }
        assert_eq!(view, View::Dashboard);
        assert_eq!(View::Dashboard.prev(), View::Settings);
    }

    #[test]
    fn form_for_edit_prefills_all_fields() {
        let cow = &seed::cows()[0];
        let form = CowForm::for_edit(cow);
        assert_eq!(form.editing_id.as_deref(), Some("C123"));
        assert_eq!(form.text[0], "Burenka");
        assert_eq!(form.text[3], "28.5");
        assert_eq!(form.health, Health::Excellent);
    }

    #[test]
    fn form_round_trips_to_draft() {
        let cow = &seed::cows()[1];
        let form = CowForm::for_edit(cow);
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.name, cow.name);
        assert_eq!(draft.daily_yield, cow.daily_yield);
        assert_eq!(draft.location, cow.location);
    }

    #[test]
    fn form_rejects_bad_numbers() {
        let mut form = CowForm::for_add();
        form.text[0] = "Ryaba".into();
        form.text[3] = "abc".into();
        form.text[4] = "1.0".into();
        assert!(form.to_draft().is_err());
    }

    #[test]
    fn form_rejects_empty_name() {
        let mut form = CowForm::for_add();
        form.text[3] = "1.0".into();
        form.text[4] = "1.0".into();
        assert!(form.to_draft().is_err());
    }

    #[test]
    fn picker_fields_ignore_typing() {
        let mut form = CowForm::for_add();
        form.focus = 5;
        form.input('x');
        assert!(form.text.iter().all(String::is_empty));
        form.cycle(true);
        assert_eq!(form.health, Health::Attention); // Good -> Attention
    }

    #[test]
    fn event_log_is_bounded() {
        let mut ui = UiState::default();
        for i in 0..100 {
            ui.push_event(format!("event {i}"));
        }
        assert_eq!(ui.events.len(), ui.max_events);
        assert_eq!(ui.status_line(), Some("event 99"));
    }

    #[test]
    fn emergency_arm_expires() {
        let mut ui = UiState::default();
        let now = Instant::now();
        ui.emergency_armed_until = Some(now + Duration::from_secs(5));
        ui.expire_emergency_arm(now + Duration::from_secs(1));
        assert!(ui.emergency_armed_until.is_some());
        ui.expire_emergency_arm(now + Duration::from_secs(6));
        assert!(ui.emergency_armed_until.is_none());
    }
}
