// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Console-only text styling.
//!
//! Never applied to file output.

use colored::{Color, Colorize};

use crate::severity::Severity;

/// Tint for interpolated arguments.
pub const ARGS_COLOR: Color = Color::Cyan;

pub fn tint(text: &str, color: Color) -> String {
	text.color(color).to_string()
}

pub fn bold(text: &str) -> String {
	text.bold().to_string()
}

pub fn italic(text: &str) -> String {
	text.italic().to_string()
}

pub fn underline(text: &str) -> String {
	text.underline().to_string()
}

pub fn strikethrough(text: &str) -> String {
	text.strikethrough().to_string()
}

/// An interpolated argument: italic, in [`ARGS_COLOR`].
pub fn argument(text: &str) -> String {
	text.italic().color(ARGS_COLOR).to_string()
}

pub fn severity_color(severity: Severity) -> Color {
	match severity {
		Severity::Error | Severity::Exception => Color::Red,
		Severity::Warning => Color::Yellow,
		Severity::Info => Color::Green,
		Severity::Line | Severity::Separator | Severity::StackTrace => Color::BrightBlack,
		Severity::Log => Color::White,
	}
}

/// `channel: message`, channel in bold, whole line tinted by severity.
pub fn console_line(severity: Severity, channel: Option<&str>, message: &str) -> String {
	let text = match channel.filter(|c| !c.is_empty()) {
		Some(channel) => format!("{}: {}", bold(channel), message),
		None => message.to_string(),
	};
	tint(&text, severity_color(severity))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_plain_when_colors_disabled() {
		colored::control::set_override(false);

		assert_eq!(tint("x", Color::Red), "x");
		assert_eq!(bold("x"), "x");
		assert_eq!(argument("42"), "42");
		assert_eq!(console_line(Severity::Info, Some("net"), "up"), "net: up");
		assert_eq!(console_line(Severity::Info, Some(""), "up"), "up");
	}

	#[test]
	fn test_severity_colors() {
		assert_eq!(severity_color(Severity::Error), Color::Red);
		assert_eq!(severity_color(Severity::Warning), Color::Yellow);
		assert_eq!(severity_color(Severity::Info), Color::Green);
	}
}
