//! TUI application - terminal lifecycle, event loop and view rendering

use std::io::{self, Stdout};
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame, Terminal,
};

use super::events::{map_key, poll_event, Action};
use super::state::{
    ConfirmAction, ConfirmPrompt, CowForm, UiState, View, EMERGENCY_ARM_WINDOW, FORM_FIELDS,
};
use super::theme::{icons, FarmTheme};
use super::widgets::{litres, progress_bar, truncate};
use crate::analytics::{self, Report};
use crate::domain::RobotStatus;
use crate::farm::{CommandOutcome, FarmState, SimConfig, SIM_INTERVAL};
use crate::settings::{export_file_name, Settings, SettingsStore};

/// Poll cadence of the event loop. The clock display refreshes on every
/// pass; the simulation fires on its own [`SIM_INTERVAL`].
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// TUI application
pub struct DairyApp {
    farm: FarmState,
    ui: UiState,
    settings: Settings,
    store: SettingsStore,
    theme: FarmTheme,
    rng: StdRng,
    last_sim_tick: Instant,
}

impl DairyApp {
    /// Create the application. A fixed seed makes the simulation
    /// reproducible; without one the draws come from entropy.
    pub fn new(store: SettingsStore, seed: Option<u64>) -> anyhow::Result<Self> {
        let settings = store.load()?;
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            farm: FarmState::new(SimConfig::default()),
            ui: UiState::default(),
            settings,
            store,
            theme: FarmTheme::new(),
            rng,
            last_sim_tick: Instant::now(),
        })
    }

    /// Run the dashboard until the user quits
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut terminal = self.setup_terminal()?;

        self.ui.push_event("AgroBot dashboard started");
        self.ui
            .push_event("Press 1-5 to switch views, q to quit");

        let result = self.main_loop(&mut terminal);

        self.restore_terminal(&mut terminal)?;
        result
    }

    fn setup_terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            let now = Instant::now();
            self.ui.expire_emergency_arm(now);

            // Background simulation tick
            if now.duration_since(self.last_sim_tick) >= SIM_INTERVAL {
                self.last_sim_tick = now;
                for notice in self.farm.tick(&mut self.rng) {
                    self.ui.push_event(notice);
                }
            }

            // Delayed completions (diagnostics, reset)
            for notice in self.farm.process_pending(now, &mut self.rng) {
                self.ui.push_event(notice);
            }

            terminal.draw(|frame| self.render(frame))?;

            if let Some(key) = poll_event(POLL_INTERVAL)? {
                let action = map_key(key, &self.ui);
                self.apply(action);
            }

            if self.ui.should_quit {
                return Ok(());
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Action dispatch
    // ─────────────────────────────────────────────────────────────────────

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.ui.should_quit = true,
            Action::SwitchView(view) => self.ui.view = view,
            Action::NextView => self.ui.view = self.ui.view.next(),
            Action::PrevView => self.ui.view = self.ui.view.prev(),
            Action::Up => self.move_selection(-1),
            Action::Down => self.move_selection(1),

            Action::ConfirmYes => self.resolve_confirm(),
            Action::ConfirmNo => {
                self.ui.confirm = None;
                self.ui.push_event("Cancelled");
            }

            Action::StartRobot => self.robot_command(RobotCmd::Start),
            Action::StopRobot => self.robot_command(RobotCmd::Stop),
            Action::Maintenance => self.robot_command(RobotCmd::Maintenance),
            Action::Diagnostics => self.robot_command(RobotCmd::Diagnostics),
            Action::ResetRobot => self.robot_command(RobotCmd::Reset),

            Action::AddCow => self.ui.cow_form = Some(CowForm::for_add()),
            Action::EditCow => {
                if let Some(cow) = self.farm.cows().get(self.ui.cow_idx) {
                    self.ui.cow_form = Some(CowForm::for_edit(cow));
                }
            }
            Action::DeleteCow => {
                if let Some(cow) = self.farm.cows().get(self.ui.cow_idx) {
                    self.ui.confirm = Some(ConfirmPrompt {
                        message: format!("Remove cow {} ({}) from the herd?", cow.name, cow.id),
                        action: ConfirmAction::DeleteCow(cow.id.clone()),
                    });
                }
            }

            Action::FormInput(c) => self.with_form(|f| f.input(c)),
            Action::FormBackspace => self.with_form(CowForm::backspace),
            Action::FormNextField => self.with_form(CowForm::next_field),
            Action::FormPrevField => self.with_form(CowForm::prev_field),
            Action::FormCycleLeft => self.with_form(|f| f.cycle(false)),
            Action::FormCycleRight => self.with_form(|f| f.cycle(true)),
            Action::FormCancel => self.ui.cow_form = None,
            Action::FormSubmit => self.submit_cow_form(),

            Action::SettingsDecrease => self.adjust_setting(false),
            Action::SettingsIncrease => self.adjust_setting(true),
            Action::SaveSettings => match self.store.save(&self.settings) {
                Ok(()) => self.ui.push_event("Settings saved"),
                Err(e) => self.ui.push_event(format!("Save failed: {e}")),
            },
            Action::ExportSettings => {
                let name = export_file_name();
                match self.store.export(&self.settings, Path::new(&name)) {
                    Ok(()) => self.ui.push_event(format!("Settings exported to {name}")),
                    Err(e) => self.ui.push_event(format!("Export failed: {e}")),
                }
            }
            Action::EmergencyStop => self.emergency_stop(),
            Action::ExportReport => self.export_report(),

            Action::None => {}
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let (idx, len) = match self.ui.view {
            View::Robots => (&mut self.ui.robot_idx, self.farm.robots().len()),
            View::Herd => (&mut self.ui.cow_idx, self.farm.cows().len()),
            View::Settings => (&mut self.ui.settings_idx, SETTINGS_ROWS),
            _ => return,
        };
        if len == 0 {
            *idx = 0;
            return;
        }
        let next = *idx as i64 + delta as i64;
        *idx = next.clamp(0, len as i64 - 1) as usize;
    }

    fn selected_robot_id(&self) -> Option<String> {
        self.farm
            .robots()
            .get(self.ui.robot_idx)
            .map(|r| r.id.clone())
    }

    fn robot_command(&mut self, cmd: RobotCmd) {
        let Some(id) = self.selected_robot_id() else {
            return;
        };
        let now = Instant::now();
        let result = match cmd {
            RobotCmd::Start => self.farm.start_robot(&id),
            RobotCmd::Stop => self.farm.stop_robot(&id, false),
            RobotCmd::Maintenance => self.farm.maintenance(&id),
            RobotCmd::Diagnostics => self.farm.run_diagnostics(&id, now),
            RobotCmd::Reset => self.farm.reset_robot(&id, false, now),
        };
        match result {
            Ok(CommandOutcome::NeedsConfirm(message)) => {
                let action = match cmd {
                    RobotCmd::Stop => ConfirmAction::StopRobot(id),
                    RobotCmd::Reset => ConfirmAction::ResetRobot(id),
                    // Only stop and reset prompt
                    _ => return,
                };
                self.ui.confirm = Some(ConfirmPrompt { message, action });
            }
            Ok(CommandOutcome::Applied(msg))
            | Ok(CommandOutcome::Rejected(msg))
            | Ok(CommandOutcome::Scheduled(msg)) => self.ui.push_event(msg),
            Err(e) => self.ui.push_event(e.to_string()),
        }
    }

    fn resolve_confirm(&mut self) {
        let Some(prompt) = self.ui.confirm.take() else {
            return;
        };
        let now = Instant::now();
        let message = match prompt.action {
            ConfirmAction::StopRobot(id) => match self.farm.stop_robot(&id, true) {
                Ok(CommandOutcome::Applied(msg)) => msg,
                Ok(_) | Err(_) => return,
            },
            ConfirmAction::ResetRobot(id) => match self.farm.reset_robot(&id, true, now) {
                Ok(CommandOutcome::Scheduled(msg)) => msg,
                Ok(_) | Err(_) => return,
            },
            ConfirmAction::DeleteCow(id) => match self.farm.delete_cow(&id) {
                Ok(cow) => {
                    let len = self.farm.cows().len();
                    if self.ui.cow_idx >= len && len > 0 {
                        self.ui.cow_idx = len - 1;
                    }
                    format!("{} removed from the herd", cow.name)
                }
                Err(e) => e.to_string(),
            },
        };
        self.ui.push_event(message);
    }

    fn with_form(&mut self, f: impl FnOnce(&mut CowForm)) {
        if let Some(form) = self.ui.cow_form.as_mut() {
            f(form);
        }
    }

    fn submit_cow_form(&mut self) {
        let Some(form) = self.ui.cow_form.as_ref() else {
            return;
        };
        match form.to_draft() {
            Ok(draft) => {
                let message = match form.editing_id.clone() {
                    Some(id) => {
                        let name = draft.name.clone();
                        match self.farm.update_cow(draft.into_cow(id)) {
                            Ok(()) => format!("{name} updated"),
                            Err(e) => e.to_string(),
                        }
                    }
                    None => {
                        let cow = self.farm.add_cow(draft);
                        format!("{} added to the herd as {}", cow.name, cow.id)
                    }
                };
                self.ui.cow_form = None;
                self.ui.push_event(message);
            }
            // Invalid input: report and keep the form open
            Err(message) => self.ui.push_event(message),
        }
    }

    /// First press arms, second press within the window executes.
    fn emergency_stop(&mut self) {
        let now = Instant::now();
        if self.ui.emergency_armed_until.is_some_and(|until| now < until) {
            self.ui.emergency_armed_until = None;
            let msg = self.farm.emergency_stop();
            self.ui.push_event(msg);
        } else {
            self.ui.emergency_armed_until = Some(now + EMERGENCY_ARM_WINDOW);
            self.ui
                .push_event("Press x again within 5 seconds to stop all robots");
        }
    }

    fn export_report(&mut self) {
        let report = Report::build(self.farm.robots(), self.farm.cows(), "week", "pdf");
        let name = analytics::report_file_name();
        let result = serde_json::to_string_pretty(&report)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&name, json).map_err(Into::into));
        match result {
            Ok(()) => self.ui.push_event(format!("Report exported to {name}")),
            Err(e) => self.ui.push_event(format!("Report export failed: {e}")),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status line
                Constraint::Length(1), // Footer
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        match self.ui.view {
            View::Dashboard => self.render_dashboard(frame, chunks[1]),
            View::Herd => self.render_herd(frame, chunks[1]),
            View::Robots => self.render_robots(frame, chunks[1]),
            View::Analytics => self.render_analytics(frame, chunks[1]),
            View::Settings => self.render_settings(frame, chunks[1]),
        }
        self.render_status(frame, chunks[2]);
        self.render_footer(frame, chunks[3]);

        if self.ui.cow_form.is_some() {
            self.render_cow_form(frame, area);
        }
        if self.ui.confirm.is_some() {
            self.render_confirm(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let clock = Local::now();
        let mut spans = vec![
            Span::styled(format!("{} AGROBOT", icons::MILK), self.theme.header()),
            Span::raw("  │ "),
        ];
        for (i, view) in View::ALL.iter().enumerate() {
            let label = format!(" {}:{} ", i + 1, view.title());
            let style = if *view == self.ui.view {
                self.theme.highlight()
            } else {
                self.theme.dimmed()
            };
            spans.push(Span::styled(label, style));
        }
        spans.push(Span::raw(" │  "));
        spans.push(Span::styled(
            clock.format("%H:%M:%S  %Y-%m-%d").to_string(),
            self.theme.text(),
        ));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(" MILKING CONTROL ");
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(8)])
            .split(area);

        let robots = self.farm.robots();
        let cows = self.farm.cows();
        let cards = [
            (
                "DAILY YIELD",
                litres(analytics::total_yield_today(cows)),
                "+12% vs yesterday".to_string(),
            ),
            (
                "ACTIVE ROBOTS",
                format!("{}/{}", analytics::active_robots(robots), robots.len()),
                "working now".to_string(),
            ),
            (
                "SESSIONS TODAY",
                analytics::total_sessions_today(robots).to_string(),
                "completed".to_string(),
            ),
            (
                "COWS QUEUED",
                analytics::waiting_cows(cows).to_string(),
                "awaiting milking".to_string(),
            ),
        ];
        let card_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[0]);
        for (i, (title, value, subtitle)) in cards.iter().enumerate() {
            let lines = vec![
                Line::from(Span::styled(value.clone(), self.theme.accent())),
                Line::from(Span::styled(subtitle.clone(), self.theme.dimmed())),
            ];
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.dimmed())
                .title(format!(" {title} "));
            frame.render_widget(Paragraph::new(lines).block(block), card_areas[i]);
        }

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        self.render_robot_overview(frame, halves[0]);
        self.render_recent_sessions(frame, halves[1]);
    }

    fn render_robot_overview(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .farm
            .robots()
            .iter()
            .map(|robot| {
                let detail = match (&robot.current_cow, robot.status) {
                    (Some(cow), _) => format!("milking cow {cow}"),
                    (None, RobotStatus::Maintenance) => "under maintenance".to_string(),
                    (None, RobotStatus::Error) => "needs attention".to_string(),
                    (None, _) => "waiting".to_string(),
                };
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        icons::ROBOT,
                        Style::default().fg(self.theme.status_color(robot.status)),
                    ),
                    Span::raw(" "),
                    Span::styled(format!("{:<12}", robot.name), self.theme.text()),
                    Span::styled(
                        format!("{:<12}", robot.status.to_string()),
                        Style::default().fg(self.theme.status_color(robot.status)),
                    ),
                    Span::styled(detail, self.theme.dimmed()),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(" ROBOT STATUS ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_recent_sessions(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .farm
            .sessions()
            .iter()
            .map(|session| {
                let cow_name = self
                    .farm
                    .cow(&session.cow_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| session.cow_id.clone());
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{:<10}", truncate(&cow_name, 10)), self.theme.text()),
                    Span::styled(
                        format!("{} · {} min  ", session.start_time, session.duration),
                        self.theme.dimmed(),
                    ),
                    Span::styled(litres(session.yield_litres), self.theme.accent()),
                    Span::raw("  "),
                    Span::styled(
                        session.quality.to_string(),
                        Style::default().fg(self.theme.quality_color(session.quality)),
                    ),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(" RECENT SESSIONS ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_herd(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(vec![
            "Cow", "Tag", "Last milking", "Daily", "Avg", "Health", "Location",
        ])
        .style(self.theme.dimmed());

        let rows: Vec<Row> = self
            .farm
            .cows()
            .iter()
            .enumerate()
            .map(|(i, cow)| {
                let base = if i == self.ui.cow_idx {
                    self.theme.highlight()
                } else {
                    self.theme.text()
                };
                Row::new(vec![
                    Cell::from(format!("{} ({})", cow.name, cow.id)).style(base),
                    Cell::from(cow.tag_id.clone()).style(base),
                    Cell::from(cow.last_milking.clone()).style(base),
                    Cell::from(litres(cow.daily_yield)).style(base),
                    Cell::from(litres(cow.avg_yield)).style(base),
                    Cell::from(cow.health.to_string())
                        .style(Style::default().fg(self.theme.health_color(cow.health))),
                    Cell::from(cow.location.to_string()).style(base),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(18),
            Constraint::Length(9),
            Constraint::Length(13),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(9),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(format!(" {} HERD ({}) ", icons::COW, self.farm.cows().len()));
        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }

    fn render_robots(&self, frame: &mut Frame, area: Rect) {
        let robots = self.farm.robots();
        if robots.is_empty() {
            return;
        }
        let constraints = vec![Constraint::Ratio(1, robots.len() as u32); robots.len()];
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (i, robot) in robots.iter().enumerate() {
            let selected = i == self.ui.robot_idx;
            let border_style = if selected {
                self.theme.highlight()
            } else {
                self.theme.dimmed()
            };

            let mut lines = vec![Line::from(vec![
                Span::raw("  sessions today: "),
                Span::styled(robot.sessions_today.to_string(), self.theme.accent()),
                Span::raw("    last maintenance: "),
                Span::styled(robot.last_maintenance.clone(), self.theme.text()),
            ])];
            if let Some(cow) = &robot.current_cow {
                lines.push(Line::from(Span::styled(
                    format!("  ► current session: cow {cow}"),
                    self.theme.success(),
                )));
            }
            if robot.status == RobotStatus::Error {
                lines.push(Line::from(Span::styled(
                    "  ⚠ maintenance required",
                    self.theme.error(),
                )));
            }
            if self.farm.diagnostics_running(&robot.id) {
                lines.push(Line::from(Span::styled(
                    "  … diagnostics in progress",
                    self.theme.warning(),
                )));
            }

            let title = format!(
                " {} {} [{}] — {} ",
                icons::ROBOT, robot.name, robot.id, robot.status
            );
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(self.theme.status_color(robot.status))
                        .add_modifier(Modifier::BOLD),
                ));
            frame.render_widget(Paragraph::new(lines).block(block), chunks[i]);
        }
    }

    fn render_analytics(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(6),
                Constraint::Min(9),
            ])
            .split(area);

        let robots = self.farm.robots();
        let cows = self.farm.cows();

        // Summary cards. Mean time, efficiency and downtime are the fixed
        // demo figures from the legacy dashboard.
        let cards = [
            ("TOTAL YIELD", litres(analytics::total_yield_today(cows))),
            ("MEAN SESSION", "7.5 min".to_string()),
            ("EFFICIENCY", "94%".to_string()),
            ("DOWNTIME", "0.8 h".to_string()),
        ];
        let card_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[0]);
        for (i, (title, value)) in cards.iter().enumerate() {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.dimmed())
                .title(format!(" {title} "));
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(value.clone(), self.theme.accent())))
                    .block(block),
                card_areas[i],
            );
        }

        // Per-robot session bars, scaled against 25 sessions per day
        let robot_lines: Vec<Line> = robots
            .iter()
            .map(|robot| {
                let percent = f64::from(robot.sessions_today) / 25.0 * 100.0;
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{:<12}", robot.name), self.theme.text()),
                    Span::styled(
                        progress_bar(percent, 20),
                        Style::default().fg(self.theme.status_color(robot.status)),
                    ),
                    Span::styled(
                        format!(" {}", robot.sessions_today),
                        self.theme.accent(),
                    ),
                ])
            })
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(" ROBOT THROUGHPUT ");
        frame.render_widget(Paragraph::new(robot_lines).block(block), rows[1]);

        // Weekly trend
        let trend_lines: Vec<Line> = analytics::weekly_data(cows)
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{:<10}", entry.day), self.theme.text()),
                    Span::styled(
                        progress_bar(f64::from(entry.efficiency), 24),
                        Style::default().fg(self.theme.efficiency_color(entry.efficiency)),
                    ),
                    Span::styled(
                        format!(" {}l · {} sessions · {}%", entry.yield_litres, entry.sessions, entry.efficiency),
                        self.theme.dimmed(),
                    ),
                ])
            })
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(" WEEKLY TREND ");
        frame.render_widget(Paragraph::new(trend_lines).block(block), rows[2]);
    }

    fn render_settings(&self, frame: &mut Frame, area: Rect) {
        let s = &self.settings;
        let rows: [(&str, String); SETTINGS_ROWS] = [
            ("Min interval between milkings (h)", s.milking.min_interval.to_string()),
            ("Max session time (min)", s.milking.max_session_time.to_string()),
            ("Min volume to finish (l)", format!("{:.1}", s.milking.min_volume)),
            ("RFID identification", on_off(s.identification.rfid)),
            ("Visual recognition", on_off(s.identification.visual)),
            ("Weight-based fallback", on_off(s.identification.weight)),
            ("Notify: system errors", on_off(s.notifications.system_errors)),
            ("Notify: maintenance", on_off(s.notifications.maintenance)),
            ("Notify: low milk quality", on_off(s.notifications.low_quality)),
            ("Notify: daily reports", on_off(s.notifications.daily_reports)),
            ("Automatic backups", on_off(s.system.auto_backup)),
            ("Backup interval (h)", s.system.backup_interval.to_string()),
            ("Log level", s.system.log_level.clone()),
        ];

        let mut lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                let style = if i == self.ui.settings_idx {
                    self.theme.highlight()
                } else {
                    self.theme.text()
                };
                Line::from(vec![
                    Span::styled(format!("  {:<36}", label), style),
                    Span::styled(value.clone(), self.theme.accent()),
                ])
            })
            .collect();

        if self.ui.emergency_armed_until.is_some() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  ⚠ Emergency stop armed. Press x again to stop all robots.",
                self.theme.error(),
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(" SETTINGS ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if let Some(message) = self.ui.status_line() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {message}"), self.theme.accent())),
                area,
            );
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = match self.ui.view {
            View::Dashboard => " [1-5] view  [q]uit",
            View::Herd => " [a]dd  [e]dit  [d]elete  [↑↓] select  [q]uit",
            View::Robots => " [s]tart  s[t]op  [m]aintenance  dia[g]nostics  [r]eset  [↑↓] select",
            View::Analytics => " [e]xport report  [q]uit",
            View::Settings => " [↑↓] select  [←→/space] change  [w]rite  [e]xport  [x] emergency stop",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(help, self.theme.dimmed())),
            area,
        );
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect) {
        let Some(prompt) = &self.ui.confirm else {
            return;
        };
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", prompt.message), self.theme.text())),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [y]", self.theme.accent()),
                Span::styled(" confirm   ", self.theme.dimmed()),
                Span::styled("[n]", self.theme.accent()),
                Span::styled(" cancel", self.theme.dimmed()),
            ]),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.warning())
            .title(" CONFIRM ");
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn render_cow_form(&self, frame: &mut Frame, area: Rect) {
        let Some(form) = &self.ui.cow_form else {
            return;
        };
        let popup = centered_rect(50, 60, area);
        frame.render_widget(Clear, popup);

        let values = [
            form.text[0].clone(),
            form.text[1].clone(),
            form.text[2].clone(),
            form.text[3].clone(),
            form.text[4].clone(),
            format!("◄ {} ►", form.health),
            format!("◄ {} ►", form.location),
        ];
        let mut lines = vec![Line::from("")];
        for (i, label) in FORM_FIELDS.iter().enumerate() {
            let style = if i == form.focus {
                self.theme.highlight()
            } else {
                self.theme.text()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<16}", label), style),
                Span::styled(values[i].clone(), self.theme.accent()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  [Tab] next  [←→] cycle  [Enter] save  [Esc] cancel",
            self.theme.dimmed(),
        )));

        let title = match &form.editing_id {
            Some(id) => format!(" EDIT COW {id} "),
            None => " ADD COW ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.highlight())
            .title(title);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Settings editing
    // ─────────────────────────────────────────────────────────────────────

    fn adjust_setting(&mut self, up: bool) {
        let s = &mut self.settings;
        match self.ui.settings_idx {
            0 => step_u32(&mut s.milking.min_interval, up),
            1 => step_u32(&mut s.milking.max_session_time, up),
            2 => {
                let delta = if up { 0.1 } else { -0.1 };
                s.milking.min_volume = (s.milking.min_volume + delta).max(0.0);
            }
            3 => s.identification.rfid = !s.identification.rfid,
            4 => s.identification.visual = !s.identification.visual,
            5 => s.identification.weight = !s.identification.weight,
            6 => s.notifications.system_errors = !s.notifications.system_errors,
            7 => s.notifications.maintenance = !s.notifications.maintenance,
            8 => s.notifications.low_quality = !s.notifications.low_quality,
            9 => s.notifications.daily_reports = !s.notifications.daily_reports,
            10 => s.system.auto_backup = !s.system.auto_backup,
            11 => step_u32(&mut s.system.backup_interval, up),
            12 => s.system.log_level = cycle_log_level(&s.system.log_level, up),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RobotCmd {
    Start,
    Stop,
    Maintenance,
    Diagnostics,
    Reset,
}

const SETTINGS_ROWS: usize = 13;

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

fn step_u32(value: &mut u32, up: bool) {
    if up {
        *value += 1;
    } else {
        *value = value.saturating_sub(1);
    }
}

fn cycle_log_level(current: &str, up: bool) -> String {
    const LEVELS: [&str; 4] = ["error", "warn", "info", "debug"];
    let idx = LEVELS.iter().position(|&l| l == current).unwrap_or(2);
    let next = if up {
        (idx + 1) % LEVELS.len()
    } else {
        (idx + LEVELS.len() - 1) % LEVELS.len()
    };
    LEVELS[next].to_string()
}

/// Centered popup rect as a percentage of the parent area
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Health, Location};
    use tempfile::TempDir;

    fn app() -> (DairyApp, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        (DairyApp::new(store, Some(7)).unwrap(), dir)
    }

    #[test]
    fn stop_command_on_milking_robot_opens_prompt() {
        let (mut app, _dir) = app();
        app.ui.view = View::Robots;
        app.ui.robot_idx = 0; // R001, active with a cow
        app.apply(Action::StopRobot);
        assert!(app.ui.confirm.is_some());
        assert_eq!(app.farm.robot("R001").unwrap().status, RobotStatus::Active);

        app.apply(Action::ConfirmNo);
        assert!(app.ui.confirm.is_none());
        assert_eq!(app.farm.robot("R001").unwrap().status, RobotStatus::Active);

        app.apply(Action::StopRobot);
        app.apply(Action::ConfirmYes);
        let robot = app.farm.robot("R001").unwrap();
        assert_eq!(robot.status, RobotStatus::Idle);
        assert!(robot.current_cow.is_none());
    }

    #[test]
    fn start_errored_robot_reports_rejection() {
        let (mut app, _dir) = app();
        app.ui.view = View::Robots;
        app.ui.robot_idx = 3; // R004, error
        app.apply(Action::StartRobot);
        assert!(app.ui.confirm.is_none());
        assert_eq!(app.farm.robot("R004").unwrap().status, RobotStatus::Error);
        assert!(app.ui.status_line().unwrap().contains("error state"));
    }

    #[test]
    fn delete_cow_flow_with_confirmation() {
        let (mut app, _dir) = app();
        app.ui.view = View::Herd;
        app.ui.cow_idx = 1; // C124
        app.apply(Action::DeleteCow);
        assert!(app.ui.confirm.is_some());
        assert_eq!(app.farm.cows().len(), 4);

        app.apply(Action::ConfirmYes);
        assert_eq!(app.farm.cows().len(), 3);
        assert!(app.farm.cow("C124").is_none());
    }

    #[test]
    fn add_cow_via_form() {
        let (mut app, _dir) = app();
        app.ui.view = View::Herd;
        app.apply(Action::AddCow);
        for c in "Ryaba".chars() {
            app.apply(Action::FormInput(c));
        }
        app.apply(Action::FormNextField); // tag
        for c in "TAG-005".chars() {
            app.apply(Action::FormInput(c));
        }
        app.apply(Action::FormNextField); // last milking
        for c in "09:00".chars() {
            app.apply(Action::FormInput(c));
        }
        app.apply(Action::FormNextField); // daily yield
        for c in "21.0".chars() {
            app.apply(Action::FormInput(c));
        }
        app.apply(Action::FormNextField); // avg yield
        for c in "22.3".chars() {
            app.apply(Action::FormInput(c));
        }
        app.apply(Action::FormSubmit);

        assert!(app.ui.cow_form.is_none());
        assert_eq!(app.farm.cows().len(), 5);
        let added = app.farm.cows().last().unwrap();
        assert_eq!(added.name, "Ryaba");
        assert_eq!(added.tag_id, "TAG-005");
        assert_eq!(added.health, Health::Good);
        assert_eq!(added.location, Location::Pasture);
    }

    #[test]
    fn invalid_form_submission_keeps_form_open() {
        let (mut app, _dir) = app();
        app.ui.view = View::Herd;
        app.apply(Action::AddCow);
        app.apply(Action::FormSubmit); // empty name
        assert!(app.ui.cow_form.is_some());
        assert_eq!(app.farm.cows().len(), 4);
    }

    #[test]
    fn emergency_stop_requires_double_press() {
        let (mut app, _dir) = app();
        app.ui.view = View::Settings;
        app.apply(Action::EmergencyStop);
        assert!(app.ui.emergency_armed_until.is_some());
        assert_eq!(app.farm.robot("R001").unwrap().status, RobotStatus::Active);

        app.apply(Action::EmergencyStop);
        assert!(app.ui.emergency_armed_until.is_none());
        for robot in app.farm.robots() {
            assert_eq!(robot.status, RobotStatus::Idle);
        }
    }

    #[test]
    fn settings_adjustments() {
        let (mut app, _dir) = app();
        app.ui.view = View::Settings;
        app.ui.settings_idx = 0;
        app.apply(Action::SettingsIncrease);
        assert_eq!(app.settings.milking.min_interval, 7);
        app.apply(Action::SettingsDecrease);
        assert_eq!(app.settings.milking.min_interval, 6);

        app.ui.settings_idx = 3;
        app.apply(Action::SettingsIncrease);
        assert!(!app.settings.identification.rfid);

        app.ui.settings_idx = 12;
        app.apply(Action::SettingsIncrease);
        assert_eq!(app.settings.system.log_level, "debug");
        app.apply(Action::SettingsIncrease);
        assert_eq!(app.settings.system.log_level, "error");
    }

    #[test]
    fn save_settings_persists_to_store() {
        let (mut app, _dir) = app();
        app.ui.view = View::Settings;
        app.ui.settings_idx = 1;
        app.apply(Action::SettingsIncrease);
        app.apply(Action::SaveSettings);

        let reloaded = app.store.load().unwrap();
        assert_eq!(reloaded.milking.max_session_time, 16);
    }

    #[test]
    fn selection_clamps_to_bounds() {
        let (mut app, _dir) = app();
        app.ui.view = View::Robots;
        app.apply(Action::Up);
        assert_eq!(app.ui.robot_idx, 0);
        for _ in 0..10 {
            app.apply(Action::Down);
        }
        assert_eq!(app.ui.robot_idx, app.farm.robots().len() - 1);
    }

    #[test]
    fn log_level_cycle() {
        assert_eq!(cycle_log_level("info", true), "debug");
        assert_eq!(cycle_log_level("debug", true), "error");
        assert_eq!(cycle_log_level("error", false), "debug");
        assert_eq!(cycle_log_level("unknown", true), "debug");
    }
}
