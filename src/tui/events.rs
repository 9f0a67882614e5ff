//! Event handling - keyboard input mapped to actions
//!
//! Pure key -> action mapping so the dispatch in `app` stays testable
//! without a terminal. An open confirm prompt or cow form captures all
//! input until it is resolved.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use super::state::{UiState, View};

/// Actions triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SwitchView(View),
    NextView,
    PrevView,
    Up,
    Down,

    ConfirmYes,
    ConfirmNo,

    // Robot commands
    StartRobot,
    StopRobot,
    Maintenance,
    Diagnostics,
    ResetRobot,

    // Herd
    AddCow,
    EditCow,
    DeleteCow,

    // Cow form
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormCycleLeft,
    FormCycleRight,
    FormSubmit,
    FormCancel,

    // Settings / analytics
    SettingsDecrease,
    SettingsIncrease,
    SaveSettings,
    ExportSettings,
    EmergencyStop,
    ExportReport,

    None,
}

/// Map a key event to an action given the current UI mode
pub fn map_key(key: KeyEvent, ui: &UiState) -> Action {
    // A confirm prompt swallows everything except its own answers
    if ui.confirm.is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Action::ConfirmYes,
            KeyCode::Char('n') | KeyCode::Esc => Action::ConfirmNo,
            _ => Action::None,
        };
    }

    // The cow form owns the keyboard while open
    if ui.cow_form.is_some() {
        return match key.code {
            KeyCode::Esc => Action::FormCancel,
            KeyCode::Enter => Action::FormSubmit,
            KeyCode::Tab | KeyCode::Down => Action::FormNextField,
            KeyCode::BackTab | KeyCode::Up => Action::FormPrevField,
            KeyCode::Left => Action::FormCycleLeft,
            KeyCode::Right => Action::FormCycleRight,
            KeyCode::Backspace => Action::FormBackspace,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::FormInput(c)
            }
            _ => Action::None,
        };
    }

    // Global keybindings
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => return Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,
        (KeyModifiers::NONE, KeyCode::Char('1')) => return Action::SwitchView(View::Dashboard),
        (KeyModifiers::NONE, KeyCode::Char('2')) => return Action::SwitchView(View::Herd),
        (KeyModifiers::NONE, KeyCode::Char('3')) => return Action::SwitchView(View::Robots),
        (KeyModifiers::NONE, KeyCode::Char('4')) => return Action::SwitchView(View::Analytics),
        (KeyModifiers::NONE, KeyCode::Char('5')) => return Action::SwitchView(View::Settings),
        (KeyModifiers::NONE, KeyCode::Tab) => return Action::NextView,
        (KeyModifiers::SHIFT, KeyCode::BackTab) => return Action::PrevView,
        _ => {}
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => return Action::Up,
        KeyCode::Down | KeyCode::Char('j') => return Action::Down,
        _ => {}
    }

    // View-local keybindings
    match ui.view {
        View::Robots => match key.code {
            KeyCode::Char('s') => Action::StartRobot,
            KeyCode::Char('t') => Action::StopRobot,
            KeyCode::Char('m') => Action::Maintenance,
            KeyCode::Char('g') => Action::Diagnostics,
            KeyCode::Char('r') => Action::ResetRobot,
            _ => Action::None,
        },
        View::Herd => match key.code {
            KeyCode::Char('a') => Action::AddCow,
            KeyCode::Char('e') => Action::EditCow,
            KeyCode::Char('d') => Action::DeleteCow,
            _ => Action::None,
        },
        View::Settings => match key.code {
            KeyCode::Left => Action::SettingsDecrease,
            KeyCode::Right | KeyCode::Char(' ') => Action::SettingsIncrease,
            KeyCode::Char('w') => Action::SaveSettings,
            KeyCode::Char('e') => Action::ExportSettings,
            KeyCode::Char('x') => Action::EmergencyStop,
            _ => Action::None,
        },
        View::Analytics => match key.code {
            KeyCode::Char('e') => Action::ExportReport,
            _ => Action::None,
        },
        View::Dashboard => Action::None,
    }
}

/// Poll for keyboard events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            return Ok(Some(key));
        }
    }
    Ok(None)
}
