//! Printing sink for the watch command.

use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use systheme::ThemeSink;

/// How each preference value is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// `systemThemeChanged: true`
    #[default]
    Text,
    /// `{"channel":"systemThemeChanged","dark":true}`
    Json,
}

#[derive(Serialize)]
struct Record<'a> {
    channel: &'a str,
    dark: bool,
}

/// Renders one value as a single line, without the trailing newline.
pub fn format_line(format: Format, channel: &str, dark: bool) -> String {
    match format {
        Format::Text => format!("{}: {}", channel, dark),
        Format::Json => serde_json::to_string(&Record { channel, dark })
            .unwrap_or_else(|_| format!("{{\"channel\":{:?},\"dark\":{}}}", channel, dark)),
    }
}

/// Sink that writes one line per value.
pub struct LineSink<W> {
    channel: String,
    format: Format,
    out: Mutex<W>,
}

impl<W: Write> LineSink<W> {
    pub fn new(channel: impl Into<String>, format: Format, out: W) -> Self {
        Self {
            channel: channel.into(),
            format,
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> ThemeSink for LineSink<W> {
    fn send(&self, dark: bool) {
        let line = format_line(self.format, &self.channel, dark);
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(err) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::warn!("failed to write preference: {}", err);
        }
    }
}
