// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Capture of Rust backtraces in the raw `method (at location)` shape the
//! stack-trace formatter expects.

use std::backtrace::Backtrace;

/// Capture the current thread's stack, one frame per line.
pub fn capture() -> String {
	normalize(&Backtrace::force_capture().to_string())
}

/// Turn `Backtrace` output into one `method (at file:line:col)` line per frame.
///
/// ```text
///    3: app::net::connect
///              at ./src/net.rs:42:9
/// ```
///
/// becomes `app::net::connect (at ./src/net.rs:42:9)`. Frames without a
/// location are kept as the bare method name.
pub fn normalize(raw: &str) -> String {
	let mut frames: Vec<String> = Vec::new();
	let mut current: Option<(String, Option<String>)> = None;

	for line in raw.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		if let Some(location) = line.strip_prefix("at ") {
			if let Some((_, slot)) = current.as_mut() {
				if slot.is_none() {
					*slot = Some(location.trim().to_string());
				}
			}
			continue;
		}

		let method = match line.split_once(": ") {
			Some((index, rest)) if index.trim().parse::<u32>().is_ok() => rest.trim(),
			_ => line,
		};
		if let Some(frame) = current.take() {
			frames.push(render(frame));
		}
		current = Some((method.to_string(), None));
	}

	if let Some(frame) = current {
		frames.push(render(frame));
	}
	frames.join("\n")
}

fn render((method, location): (String, Option<String>)) -> String {
	match location {
		Some(location) => format!("{method} (at {location})"),
		None => method,
	}
}
