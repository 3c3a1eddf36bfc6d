// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entry categories.

use std::fmt;

/// The category of a log entry.
///
/// `Line` and `Separator` change the layout of the header; every other
/// variant is printed in the severity column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
	Error,
	Info,
	Warning,
	Log,
	Exception,
	StackTrace,
	Line,
	Separator,
}

impl Severity {
	pub const ALL: [Severity; 8] = [
		Severity::Error,
		Severity::Info,
		Severity::Warning,
		Severity::Log,
		Severity::Exception,
		Severity::StackTrace,
		Severity::Line,
		Severity::Separator,
	];

	/// Label written into the severity column.
	pub const fn as_str(self) -> &'static str {
		match self {
			Severity::Error => "Error",
			Severity::Info => "Info",
			Severity::Warning => "Warning",
			Severity::Log => "Log",
			Severity::Exception => "Exception",
			Severity::StackTrace => "StackTrace",
			Severity::Line => "Line",
			Severity::Separator => "Separator",
		}
	}

	/// Whether entries of this category are laid out without time and severity columns.
	pub const fn is_bare(self) -> bool {
		matches!(self, Severity::Line | Severity::Separator)
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::SEVERITY_WIDTH;

	#[test]
	fn test_labels_fit_severity_column() {
		for severity in Severity::ALL {
			assert!(
				severity.as_str().len() <= SEVERITY_WIDTH,
				"{severity} does not fit the severity column"
			);
		}
	}

	#[test]
	fn test_bare_categories() {
		assert!(Severity::Line.is_bare());
		assert!(Severity::Separator.is_bare());
		assert!(!Severity::Exception.is_bare());
	}
}
