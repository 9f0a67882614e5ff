//! Barn Theme - Visual design system
//!
//! Pasture green + hay amber palette on a dark background.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{Health, Quality, RobotStatus};

/// Farm color palette
pub struct FarmTheme {
    pub pasture_green: Color,
    pub hay_amber: Color,
    pub sky_blue: Color,
    pub milk_white: Color,

    pub warning_orange: Color,
    pub alert_red: Color,

    pub dim_gray: Color,
}

impl Default for FarmTheme {
    fn default() -> Self {
        Self {
            pasture_green: Color::Rgb(63, 185, 80),  // #3FB950
            hay_amber: Color::Rgb(255, 191, 0),      // #FFBF00
            sky_blue: Color::Rgb(88, 166, 255),      // #58A6FF
            milk_white: Color::Rgb(230, 237, 243),   // #E6EDF3
            warning_orange: Color::Rgb(210, 153, 34), // #D29922
            alert_red: Color::Rgb(248, 81, 73),      // #F85149
            dim_gray: Color::Rgb(128, 128, 128),
        }
    }
}

impl FarmTheme {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Styles
    // ─────────────────────────────────────────────────────────────────────

    pub fn text(&self) -> Style {
        Style::default().fg(self.milk_white)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim_gray)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.pasture_green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.hay_amber)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.sky_blue)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.pasture_green)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning_orange)
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.alert_red)
            .add_modifier(Modifier::BOLD)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Domain colors
    // ─────────────────────────────────────────────────────────────────────

    pub fn status_color(&self, status: RobotStatus) -> Color {
        match status {
            RobotStatus::Active => self.pasture_green,
            RobotStatus::Idle => self.sky_blue,
            RobotStatus::Maintenance => self.hay_amber,
            RobotStatus::Error => self.alert_red,
        }
    }

    pub fn health_color(&self, health: Health) -> Color {
        match health {
            Health::Excellent => self.pasture_green,
            Health::Good => self.sky_blue,
            Health::Attention => self.hay_amber,
            Health::Poor => self.alert_red,
        }
    }

    pub fn quality_color(&self, quality: Quality) -> Color {
        match quality {
            Quality::Excellent => self.pasture_green,
            Quality::Good => self.sky_blue,
            Quality::Poor => self.hay_amber,
        }
    }

    /// Color for the weekly trend bars, keyed on efficiency percent
    pub fn efficiency_color(&self, percent: u32) -> Color {
        match percent {
            p if p >= 95 => self.pasture_green,
            p if p >= 85 => self.sky_blue,
            _ => self.hay_amber,
        }
    }
}

/// UI icons used throughout the dashboard
pub mod icons {
    pub const ROBOT: &str = "◉";
    pub const COW: &str = "○";
    pub const MILK: &str = "▣";

    pub const BAR_FULL: char = '█';
    pub const BAR_EMPTY: char = '░';
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_colors_are_distinct() {
        let theme = FarmTheme::new();
        let colors = [
            theme.status_color(RobotStatus::Active),
            theme.status_color(RobotStatus::Idle),
            theme.status_color(RobotStatus::Maintenance),
            theme.status_color(RobotStatus::Error),
        ];
        for i in 0..colors.len() {
            for j in i + 1..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }

    #[test]
    fn efficiency_color_ranges() {
        let theme = FarmTheme::new();
        assert_eq!(theme.efficiency_color(100), theme.pasture_green);
        assert_eq!(theme.efficiency_color(95), theme.pasture_green);
        assert_eq!(theme.efficiency_color(89), theme.sky_blue);
        assert_eq!(theme.efficiency_color(81), theme.hay_amber);
    }
}
