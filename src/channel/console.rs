//! Console channel

use std::fmt::Display;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use console::{style, Color};

use super::Channel;
use crate::error::Result;
use crate::event::{LogEvent, LogMessage};
use crate::level::LogLevel;
use crate::metrics::{MetricsCollector, MetricsSnapshot};

/// Icon and colour of a built-in level
struct LevelStyle {
    icon: &'static str,
    icon_bright: bool,
    color: Color,
    date_color: Color,
}

fn level_style(level: &LogLevel) -> Option<LevelStyle> {
    let (icon, icon_bright, color, date_color) = match level {
        LogLevel::Debug => ("⚙", true, Color::Magenta, Color::Yellow),
        LogLevel::Info => ("ℹ", true, Color::Blue, Color::Yellow),
        LogLevel::Warn => ("⚠", false, Color::Yellow, Color::Green),
        LogLevel::Error => ("✗", false, Color::Red, Color::Yellow),
        LogLevel::Success => ("✓", false, Color::Green, Color::Yellow),
        LogLevel::Custom(_) => return None,
    };

    Some(LevelStyle {
        icon,
        icon_bright,
        color,
        date_color,
    })
}

/// Prints events to stdout as one decorated line:
/// `icon (timestamp) [module] [action] message`.
///
/// Structured messages get a second line with their full form: pretty JSON
/// for values, the trace for errors. Never fails.
#[derive(Debug)]
pub struct ConsoleChannel {
    name: String,
    colored: bool,
    metrics: MetricsCollector,
}

impl Default for ConsoleChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleChannel {
    /// Default channel name
    pub const DEFAULT_NAME: &'static str = "console";

    /// Create a console channel, coloured when the terminal supports it
    pub fn new() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            colored: console::colors_enabled(),
            metrics: MetricsCollector::new(),
        }
    }

    /// Set a custom name for the channel
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Force colours on or off
    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn paint(&self, text: impl Display, color: Color, bright: bool) -> String {
        if !self.colored {
            return text.to_string();
        }

        let styled = style(text).fg(color).force_styling(true);
        if bright {
            styled.bright().to_string()
        } else {
            styled.to_string()
        }
    }

    /// Render the lines printed for an event
    pub fn render(&self, event: &LogEvent, now: DateTime<Utc>) -> Vec<String> {
        let date = format!("({})", now.to_rfc3339_opts(SecondsFormat::Millis, true));
        let module = self.paint(format!("[{}]", event.module), Color::Cyan, false);
        let action = self.paint(format!("[{}]", event.action), Color::Magenta, false);

        let first = match level_style(&event.level) {
            Some(level) => format!(
                "{} {} {} {} {}",
                self.paint(level.icon, level.color, level.icon_bright),
                self.paint(&date, level.date_color, false),
                module,
                action,
                self.paint(&event.message, level.color, true),
            ),
            None => format!(
                "[log] {} {} {} {}",
                self.paint(&date, Color::Yellow, false),
                module,
                action,
                event.message,
            ),
        };

        let mut lines = vec![first];
        match &event.message {
            LogMessage::Text(_) => {}
            LogMessage::Error(err) => lines.push(err.trace()),
            LogMessage::Value(value) => lines.push(
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
            ),
        }

        lines
    }
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_terminal(&self) -> bool {
        true
    }

    async fn log(&self, event: &LogEvent) -> Result<()> {
        let start = Instant::now();
        let lines = self.render(event, Utc::now());

        let mut bytes = 0;
        for line in &lines {
            println!("{}", line);
            bytes += line.len() + 1;
        }

        self.metrics.record_write(bytes, start.elapsed());
        Ok(())
    }

    fn metrics(&self) -> Option<MetricsSnapshot> {
        Some(self.metrics.snapshot())
    }
}
