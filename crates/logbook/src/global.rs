// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Optional process-wide logbook.

use std::sync::OnceLock;

use crate::lifecycle::Logbook;

static GLOBAL: OnceLock<Logbook> = OnceLock::new();

/// Install `logbook` as the process-wide instance.
///
/// Only the first call succeeds; later calls hand their logbook back.
pub fn install(logbook: Logbook) -> Result<(), Logbook> {
	GLOBAL.set(logbook)
}

pub fn get() -> Option<&'static Logbook> {
	GLOBAL.get()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_install_once() {
		let first = Logbook::builder().build();
		let second = Logbook::builder().build();

		assert!(install(first).is_ok());
		assert!(install(second).is_err());
		assert!(get().is_some());
	}
}
