//! Terminal color control and number formatting shared by all writers.

use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // no-color.org
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// Plain output: no colors.
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }

    /// Push the color decision into `colored`'s global override.
    pub fn apply(&self) {
        colored::control::set_override(self.color.should_use_color());
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}

/// `1234567.8` → `"$1,234,568"`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(amount.abs().round()))
}

/// Prices quoted per unit (CPM, cost per click) keep their cents: `"$2.50"`.
pub fn format_unit_price(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round();
    format!(
        "{sign}${}.{:02}",
        group_thousands((cents / 100.0).trunc()),
        cents % 100.0
    )
}

/// Stage volumes are fractional; show whole units unless the value is small.
pub fn format_volume(volume: f64) -> String {
    if volume.abs() < 10.0 && volume.fract().abs() > f64::EPSILON {
        format!("{volume:.2}")
    } else {
        group_thousands(volume.round())
    }
}

/// `0.025` → `"2.5%"`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Signed percent change, e.g. `"+12.5%"`.
pub fn format_percent_change(pct: f64) -> String {
    format!("{pct:+.1}%")
}

/// `Some(2.5)` → `"2.50x"`; `None` → `"n/a"`.
pub fn format_multiple(value: Option<f64>) -> String {
    format_optional(value, |v| format!("{v:.2}x"))
}

pub fn format_optional(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| "n/a".to_string())
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
