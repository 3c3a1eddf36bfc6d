// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack trace filtering and reshaping.
//!
//! Input is a raw trace with one `method (at file:line)` frame per line.
//! Frames from the tracing bridge, from this facility and from thread/runtime
//! plumbing are dropped; the rest are split into a method line and a location
//! line. Frames that do not split cleanly are passed through as-is.

use std::str::Split;

use crate::layout::{continuation_prefix, margin, STACK_MARGIN};

/// Frame prefixes that are never shown.
pub const FRAME_DENYLIST: &[&str] = &[
	// tracing bridge
	"tracing::",
	"tracing_core::",
	"tracing_subscriber::",
	"<tracing_subscriber::",
	// logbook itself
	"logbook::",
	"logbook_core::",
	"<logbook::",
	// thread and runtime plumbing
	"std::thread::",
	"std::sys::",
	"std::sys_common::",
	"std::rt::",
	"std::panic::",
	"std::panicking::",
	"std::backtrace::",
	"std::backtrace_rs::",
	"core::panicking::",
	"core::ops::function::",
	// the same plumbing in qualified `<Type as Trait>` form
	"<std::thread::",
	"<std::sys::",
	"<std::panic::",
	"<alloc::boxed::Box<",
	"<core::panic::unwind_safe::",
	"<unknown>",
	"__rustc::",
	"__rust_",
	"rust_begin_unwind",
	"start_thread",
	"__libc_start",
	"__GI_",
	"__clone",
	"clone3",
];

const FRAME_MARKER: &str = " (at ";
const LINE_BREAKS: &[char] = &['\n', '\r'];
const LOCATION_TAIL: &[char] = &[')', ']'];

pub fn is_denied_frame(frame: &str) -> bool {
	FRAME_DENYLIST.iter().any(|prefix| frame.starts_with(prefix))
}

/// Split `method (at file:line)` into method and location.
///
/// Returns `None` unless the marker occurs exactly once. Trailing `)` and
/// `]` are stripped from the location.
pub fn split_frame(frame: &str) -> Option<(&str, &str)> {
	let mut parts = frame.split(FRAME_MARKER);
	let method = parts.next()?;
	let location = parts.next()?;
	if parts.next().is_some() {
		return None;
	}
	Some((method, location.trim_end_matches(LOCATION_TAIL)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameStyle {
	/// Margin-aligned under the message column, closed by a blank separator line.
	File,
	/// Stack indent only, no closing line.
	Console,
}

/// Lazy iterator over the formatted lines of a stack trace.
///
/// A clone continues independently from the same position. Calling
/// [`stack_trace_lines`] again yields the full block again.
#[derive(Debug, Clone)]
pub struct StackTraceLines<'a> {
	frames: Split<'a, &'static [char]>,
	style: FrameStyle,
	location: Option<&'a str>,
	seen_frame: bool,
	closed: bool,
}

impl<'a> StackTraceLines<'a> {
	fn new(raw: &'a str, style: FrameStyle) -> Self {
		Self {
			frames: raw.split(LINE_BREAKS),
			style,
			location: None,
			seen_frame: false,
			closed: false,
		}
	}
}

fn render(style: FrameStyle, text: &str) -> String {
	let mut out = match style {
		FrameStyle::File => continuation_prefix(),
		FrameStyle::Console => String::new(),
	};
	out.push_str(&margin(STACK_MARGIN));
	out.push_str(text);
	out
}

impl Iterator for StackTraceLines<'_> {
	type Item = String;

	fn next(&mut self) -> Option<String> {
		if let Some(location) = self.location.take() {
			return Some(render(self.style, location));
		}

		for frame in self.frames.by_ref() {
			if frame.is_empty() {
				continue;
			}
			self.seen_frame = true;
			if is_denied_frame(frame) {
				continue;
			}
			return Some(match split_frame(frame) {
				Some((method, location)) => {
					self.location = Some(location);
					render(self.style, method)
				}
				None => render(self.style, frame),
			});
		}

		if self.style == FrameStyle::File && self.seen_frame && !self.closed {
			self.closed = true;
			return Some(continuation_prefix());
		}

		None
	}
}

/// Lines of a stack trace block for the log file.
///
/// An empty trace produces no lines; otherwise the block always ends with a
/// blank separator line, even when every frame was filtered out.
pub fn stack_trace_lines(raw: &str) -> StackTraceLines<'_> {
	StackTraceLines::new(raw, FrameStyle::File)
}

/// Lines of a stack trace for interactive display.
pub fn console_stack_trace_lines(raw: &str) -> StackTraceLines<'_> {
	StackTraceLines::new(raw, FrameStyle::Console)
}

/// The file block joined with `\n`.
pub fn format_stack_trace(raw: &str) -> String {
	stack_trace_lines(raw).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::{LEFT_MARGIN, SEPARATOR};
	use proptest::prelude::*;

	const TRACE: &str = "\
logbook::Logbook::error (at crates/logbook/src/convenience.rs:88)
std::thread::local::LocalKey<T>::with (at library/std/src/thread/local.rs:270)
app::net::connect (at src/net.rs:42:9)

tracing_core::dispatcher::get_default (at tracing-core/src/dispatcher.rs:391)
app::main (at src/main.rs:7:5)]
core::ops::function::FnOnce::call_once (at library/core/src/ops/function.rs:250)
";

	fn prefix() -> String {
		format!("{}{}{}", " ".repeat(LEFT_MARGIN), SEPARATOR, " ".repeat(STACK_MARGIN))
	}

	#[test]
	fn test_denylisted_frames_are_removed() {
		let lines: Vec<String> = stack_trace_lines(TRACE).collect();

		assert_eq!(
			lines,
			vec![
				format!("{}app::net::connect", prefix()),
				format!("{}src/net.rs:42:9", prefix()),
				format!("{}app::main", prefix()),
				format!("{}src/main.rs:7:5", prefix()),
				format!("{}{}", " ".repeat(LEFT_MARGIN), SEPARATOR),
			]
		);
		assert!(lines.iter().all(|l| !l.contains("logbook::")));
		assert!(lines.iter().all(|l| !l.contains("std::thread")));
	}

	#[test]
	fn test_qualified_plumbing_frames_are_removed() {
		let trace = "\
app::worker::run (at ./src/worker.rs:12:5)
<std::thread::lifecycle::spawn_unchecked<F,T>::{{closure}} as core::ops::function::FnOnce<()>>::call_once (at ./library/std/src/thread/mod.rs:559:17)
<std::sys::thread::unix::Thread>::new::thread_start (at ./library/std/src/sys/thread/unix.rs:97:17)
<alloc::boxed::Box<dyn core::ops::function::FnOnce<()>> as core::ops::function::FnOnce<()>>::call_once (at ./library/alloc/src/boxed.rs:1966:9)
<core::panic::unwind_safe::AssertUnwindSafe<F> as core::ops::function::FnOnce<()>>::call_once (at ./library/core/src/panic/unwind_safe.rs:272:9)
__rustc::rust_begin_unwind (at ./library/std/src/panicking.rs:697:5)
<unknown>
";
		let lines: Vec<String> = stack_trace_lines(trace).collect();

		assert_eq!(
			lines,
			vec![
				format!("{}app::worker::run", prefix()),
				format!("{}./src/worker.rs:12:5", prefix()),
				format!("{}{}", " ".repeat(LEFT_MARGIN), SEPARATOR),
			]
		);
	}

	#[test]
	fn test_unsplittable_frame_passes_through() {
		let lines: Vec<String> = stack_trace_lines("weird frame without marker").collect();
		assert_eq!(lines.len(), 2);
		assert_eq!(lines[0], format!("{}weird frame without marker", prefix()));

		let double = "a (at b) (at c)";
		assert_eq!(split_frame(double), None);
		let lines: Vec<String> = stack_trace_lines(double).collect();
		assert_eq!(lines[0], format!("{}{}", prefix(), double));
	}

	#[test]
	fn test_empty_trace_has_no_block() {
		assert_eq!(stack_trace_lines("").count(), 0);
		assert_eq!(stack_trace_lines("\r\n\n").count(), 0);
	}

	#[test]
	fn test_fully_filtered_trace_keeps_closing_line() {
		let lines: Vec<String> =
			stack_trace_lines("logbook::flush (at src/flush.rs:1)\n").collect();
		assert_eq!(lines.len(), 1);
		assert_eq!(lines[0].trim(), "|");
	}

	#[test]
	fn test_console_style_has_no_margin_or_closing_line() {
		let lines: Vec<String> = console_stack_trace_lines(TRACE).collect();
		assert_eq!(
			lines,
			vec![
				"    app::net::connect",
				"    src/net.rs:42:9",
				"    app::main",
				"    src/main.rs:7:5",
			]
		);
	}

	#[test]
	fn test_split_frame_strips_trailing_brackets() {
		assert_eq!(
			split_frame("Foo.Bar () (at Assets/Foo.cs:12)]"),
			Some(("Foo.Bar ()", "Assets/Foo.cs:12"))
		);
		assert_eq!(split_frame("no marker"), None);
	}

	#[test]
	fn test_restartable() {
		let first = format_stack_trace(TRACE);
		let second = format_stack_trace(TRACE);
		assert_eq!(first, second);

		let iter = stack_trace_lines(TRACE);
		let copy = iter.clone();
		assert_eq!(iter.collect::<Vec<_>>(), copy.collect::<Vec<_>>());
	}

	proptest! {
		#[test]
		fn test_denied_frames_never_leak(
			method in "[a-z]{1,8}::[a-z]{1,8}",
			file in "[a-z]{1,8}\\.rs:[0-9]{1,3}",
		) {
			prop_assume!(!is_denied_frame(&method));
			let trace = format!(
				"logbook::{method} (at {file})\n{method} (at {file})\nstd::thread::{method} (at {file})"
			);
			let lines: Vec<String> = stack_trace_lines(&trace).collect();
			prop_assert_eq!(lines.len(), 3);
			prop_assert!(lines[0].ends_with(&method));
			prop_assert!(lines[1].ends_with(&file));
		}
	}
}
