// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! When to flush.
//!
//! Every decision reads the settings snapshot current at that moment, so a
//! settings change applies from the next event on.

use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushDecision {
	/// Flush synchronously on the enqueuing thread.
	Now,
	/// Leave it to the timer, a later enqueue, or an explicit flush.
	Deferred,
}

/// Decision after an enqueue that left `pending` entries since the last flush.
///
/// With buffering off every entry is written through immediately.
pub fn after_enqueue(settings: &Settings, pending: usize) -> FlushDecision {
	if !settings.buffer.enabled || pending >= settings.buffer.size {
		FlushDecision::Now
	} else {
		FlushDecision::Deferred
	}
}

/// Whether a gated flush (threshold or timer) may write at all.
pub fn persistence_allowed(settings: &Settings) -> bool {
	settings.save_to_file
}

/// Whether a timer tick should flush.
pub fn timer_should_flush(settings: &Settings) -> bool {
	settings.buffer.enabled && persistence_allowed(settings)
}
