// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fixed-column layout of log entries.
//!
//! `<time:12> | <severity:10> | <title:30> | <message>`
//!
//! Columns are padded, never truncated. Continuation lines (extra message
//! lines, thread info, stack frames) are indented by [`LEFT_MARGIN`] and
//! prefixed with [`SEPARATOR`] so they align under the message column.

use chrono::NaiveTime;

use crate::entry::LogEntry;
use crate::severity::Severity;
use crate::stack::stack_trace_lines;

/// Column separator.
pub const SEPARATOR: &str = " | ";
pub const SEPARATOR_WIDTH: usize = 3;

pub const TIME_WIDTH: usize = 12;
pub const SEVERITY_WIDTH: usize = 10;
pub const TITLE_WIDTH: usize = 30;

/// Width of everything left of the last separator before the message.
pub const LEFT_MARGIN: usize = TIME_WIDTH + SEVERITY_WIDTH + TITLE_WIDTH + SEPARATOR_WIDTH * 2;

/// Extra indent for stack frames and thread info.
pub const STACK_MARGIN: usize = 4;

/// `12:34:56.789`
pub const TIME_FORMAT: &str = "%H:%M:%S%.3f";
/// `2025-06-13 12:34:56.789`
pub const FULL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
/// `2025-06-13 12.34.56.789`, used for log file names.
pub const FILE_NAME_FORMAT: &str = "%Y-%m-%d %H.%M.%S%.3f";

/// Substituted for a missing message.
pub const MISSING_MESSAGE: &str = "_____";

pub const RULE: &str = "------------------------------------------------------------------------------------------------------------------";
pub const BOLD_RULE: &str = "==================================================================================================================";

const LINE_BREAKS: &[char] = &['\n', '\r'];

/// Identity of the thread an event was produced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadInfo<'a> {
	pub id: u64,
	pub name: Option<&'a str>,
}

/// Everything needed to lay out one event.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
	pub time: NaiveTime,
	pub severity: Severity,
	pub title: Option<&'a str>,
	pub message: Option<&'a str>,
	pub thread: Option<ThreadInfo<'a>>,
	pub stack_trace: Option<&'a str>,
}

impl<'a> Event<'a> {
	pub fn new(time: NaiveTime, severity: Severity) -> Self {
		Self {
			time,
			severity,
			title: None,
			message: None,
			thread: None,
			stack_trace: None,
		}
	}

	pub fn title(mut self, title: &'a str) -> Self {
		self.title = Some(title);
		self
	}

	pub fn message(mut self, message: &'a str) -> Self {
		self.message = Some(message);
		self
	}

	/// Thread info is only written when a stack trace is attached.
	pub fn thread(mut self, thread: ThreadInfo<'a>) -> Self {
		self.thread = Some(thread);
		self
	}

	pub fn stack_trace(mut self, stack_trace: &'a str) -> Self {
		self.stack_trace = Some(stack_trace);
		self
	}
}

/// Pad `source` with spaces to `width` characters.
///
/// Longer text is returned unchanged unless `truncate` is set.
pub fn fit(source: &str, width: usize, truncate: bool) -> String {
	let len = source.chars().count();
	if len > width {
		if truncate {
			source.chars().take(width).collect()
		} else {
			source.to_string()
		}
	} else {
		let mut out = String::with_capacity(source.len() + width - len);
		out.push_str(source);
		out.extend(std::iter::repeat(' ').take(width - len));
		out
	}
}

pub(crate) fn margin(width: usize) -> String {
	" ".repeat(width)
}

/// `<LEFT_MARGIN spaces> | `
pub(crate) fn continuation_prefix() -> String {
	let mut prefix = margin(LEFT_MARGIN);
	prefix.push_str(SEPARATOR);
	prefix
}

/// Lay out one event as an ordered group of lines.
///
/// Pure: the same event always produces the same entry.
pub fn format_event(event: &Event<'_>) -> LogEntry {
	if event.severity == Severity::Separator {
		return LogEntry::from(format_separator(false));
	}

	let message = event.message.unwrap_or(MISSING_MESSAGE);
	let mut parts = message.split(LINE_BREAKS).filter(|l| !l.is_empty());
	let first = parts.next().unwrap_or("");

	let mut header = if event.severity.is_bare() {
		line_prefix(event.title)
	} else {
		header_prefix(event)
	};
	header.push_str(first);

	let mut entry = LogEntry::from(header);
	entry.extend(parts.map(|line| {
		let mut continued = continuation_prefix();
		continued.push_str(line);
		continued
	}));

	if let Some(trace) = event.stack_trace.filter(|t| !t.is_empty()) {
		if let Some(thread) = &event.thread {
			entry.push(thread_info_line(thread));
		}
		entry.extend(stack_trace_lines(trace));
	}

	entry
}

fn header_prefix(event: &Event<'_>) -> String {
	let mut out = String::with_capacity(LEFT_MARGIN + SEPARATOR_WIDTH);
	out.push_str(&fit(&event.time.format(TIME_FORMAT).to_string(), TIME_WIDTH, false));
	out.push_str(SEPARATOR);
	out.push_str(&fit(event.severity.as_str(), SEVERITY_WIDTH, false));
	out.push_str(SEPARATOR);
	out.push_str(&fit(event.title.unwrap_or(""), TITLE_WIDTH, false));
	out.push_str(SEPARATOR);
	out
}

// Line entries skip time and severity: a full blank margin, or a blank
// margin up to the title column when a title is given.
fn line_prefix(title: Option<&str>) -> String {
	match title.filter(|t| !t.is_empty()) {
		None => continuation_prefix(),
		Some(title) => {
			let mut out = margin(TIME_WIDTH + SEPARATOR_WIDTH + SEVERITY_WIDTH);
			out.push_str(SEPARATOR);
			out.push_str(&fit(title, TITLE_WIDTH, false));
			out.push_str(SEPARATOR);
			out
		}
	}
}

/// A full-width horizontal rule.
pub fn format_separator(bold: bool) -> String {
	if bold {
		BOLD_RULE.to_string()
	} else {
		RULE.to_string()
	}
}

/// `<margin> |     [Thread ID | 0007: name]`
///
/// Id `0000` marks a thread whose number could not be determined.
pub fn thread_info_line(thread: &ThreadInfo<'_>) -> String {
	let mut out = continuation_prefix();
	out.push_str(&margin(STACK_MARGIN));
	out.push_str(&format!("[Thread ID | {:04}", thread.id));
	if let Some(name) = thread.name.filter(|n| !n.is_empty()) {
		out.push_str(": ");
		out.push_str(name);
	}
	out.push(']');
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn noon() -> NaiveTime {
		NaiveTime::from_hms_milli_opt(12, 34, 56, 789).unwrap()
	}

	#[test]
	fn test_left_margin_matches_header_columns() {
		assert_eq!(LEFT_MARGIN, 58);
		assert_eq!(SEPARATOR.len(), SEPARATOR_WIDTH);
		assert_eq!(RULE.len(), 114);
		assert_eq!(BOLD_RULE.len(), RULE.len());
	}

	#[test]
	fn test_fit_pads_without_truncating() {
		assert_eq!(fit("ab", 4, false), "ab  ");
		assert_eq!(fit("abcdef", 4, false), "abcdef");
		assert_eq!(fit("abcdef", 4, true), "abcd");
		assert_eq!(fit("abcd", 4, true), "abcd");
	}

	#[test]
	fn test_header_layout() {
		let event = Event::new(noon(), Severity::Error)
			.title("Network")
			.message("connection refused");
		let entry = format_event(&event);

		assert_eq!(entry.len(), 1);
		let header = entry.header().unwrap();
		assert_eq!(
			header,
			format!(
				"12:34:56.789 | {:<10} | {:<30} | connection refused",
				"Error", "Network"
			)
		);
		assert_eq!(header.find("connection"), Some(LEFT_MARGIN + SEPARATOR_WIDTH));
	}

	#[test]
	fn test_long_title_is_not_truncated() {
		let title = "a".repeat(40);
		let event = Event::new(noon(), Severity::Info).title(&title).message("m");
		let header = format_event(&event).header().unwrap().to_string();
		assert!(header.contains(&title));
	}

	#[test]
	fn test_missing_message_placeholder() {
		let event = Event::new(noon(), Severity::Log);
		let header = format_event(&event).header().unwrap().to_string();
		assert!(header.ends_with(MISSING_MESSAGE));
	}

	#[test]
	fn test_multiline_message_is_aligned() {
		let event = Event::new(noon(), Severity::Warning).message("first\r\nsecond\n\nthird");
		let entry = format_event(&event);

		assert_eq!(entry.len(), 3);
		assert!(entry.lines()[0].ends_with("| first"));
		assert_eq!(entry.lines()[1], format!("{}second", continuation_prefix()));
		assert_eq!(entry.lines()[2], format!("{}third", continuation_prefix()));
	}

	#[test]
	fn test_line_layout_without_title() {
		let event = Event::new(noon(), Severity::Line).message("tick");
		let entry = format_event(&event);
		assert_eq!(entry.header().unwrap(), format!("{}tick", continuation_prefix()));
	}

	#[test]
	fn test_line_layout_with_title_aligns_message() {
		let event = Event::new(noon(), Severity::Line).title("loop").message("tick");
		let header = format_event(&event).header().unwrap().to_string();

		assert!(header.starts_with(&" ".repeat(25)));
		assert_eq!(header.find("tick"), Some(LEFT_MARGIN + SEPARATOR_WIDTH));
		assert!(!header.contains("12:34"));
	}

	#[test]
	fn test_separator_entry() {
		let event = Event::new(noon(), Severity::Separator).message("ignored");
		let entry = format_event(&event);
		assert_eq!(entry.lines(), &[RULE.to_string()]);
	}

	#[test]
	fn test_thread_info_line() {
		let named = thread_info_line(&ThreadInfo {
			id: 7,
			name: Some("worker"),
		});
		assert_eq!(named, format!("{}    [Thread ID | 0007: worker]", continuation_prefix()));

		let unnamed = thread_info_line(&ThreadInfo { id: 12345, name: None });
		assert!(unnamed.ends_with("[Thread ID | 12345]"));
	}

	#[test]
	fn test_thread_info_only_with_stack_trace() {
		let thread = ThreadInfo {
			id: 1,
			name: Some("main"),
		};
		let without = Event::new(noon(), Severity::Error).message("m").thread(thread);
		assert_eq!(format_event(&without).len(), 1);

		let with = without.stack_trace("app::run (at src/main.rs:3)");
		let entry = format_event(&with);
		assert!(entry.lines()[1].contains("[Thread ID | 0001: main]"));
		assert!(entry.lines()[2].ends_with("app::run"));
		assert!(entry.lines()[3].ends_with("src/main.rs:3"));
	}

	proptest! {
		#[test]
		fn test_format_event_is_deterministic(
			title in "[a-zA-Z ]{0,40}",
			message in "[a-zA-Z0-9 \n]{0,80}",
			hour in 0u32..24,
		) {
			let time = NaiveTime::from_hms_milli_opt(hour, 0, 0, 0).unwrap();
			let event = Event::new(time, Severity::Info).title(&title).message(&message);
			prop_assert_eq!(format_event(&event), format_event(&event));
		}

		#[test]
		fn test_fit_never_shortens_without_truncate(source in "[a-z]{0,50}", width in 0usize..60) {
			let out = fit(&source, width, false);
			prop_assert!(out.starts_with(&source));
			prop_assert_eq!(out.chars().count(), source.chars().count().max(width));
		}
	}
}
