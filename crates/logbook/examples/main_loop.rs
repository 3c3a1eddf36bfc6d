// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workers log from background threads while the main loop pumps console
//! output.
//!
//! ```sh
//! LOGBOOK_LOG_DIR=/tmp/logbook-demo cargo run -p logbook --example main_loop
//! ```

use std::thread;
use std::time::Duration;

use logbook::{HostLayer, Logbook};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
	let logbook = Logbook::builder()
		.settings(logbook::load_settings(None)?)
		.init()?;
	logbook.install_panic_hook();

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(tracing_subscriber::fmt::layer())
		.with(HostLayer::new(logbook.clone()))
		.init();

	logbook.separator();
	logbook.info(Some("Main"), &logbook::information());

	let workers: Vec<_> = (0..3)
		.map(|id| {
			let logbook = logbook.clone();
			thread::Builder::new()
				.name(format!("worker-{id}"))
				.spawn(move || {
					for step in 0..5 {
						logbook.log(Some("Worker"), &format!("worker {id} step {step}"));
						thread::sleep(Duration::from_millis(20));
					}
					logbook.warning(Some("Worker"), &format!("worker {id} done"));
				})
		})
		.collect::<Result<_, _>>()?;

	while workers.iter().any(|w| !w.is_finished()) {
		logbook.dispatcher().run_pending();
		thread::sleep(Duration::from_millis(16));
	}
	for worker in workers {
		let _ = worker.join();
	}
	logbook.dispatcher().run_pending();

	tracing::error!(exception = "simulated failure", "host reported an exception");

	if let Some(path) = logbook.file_path() {
		println!("log file: {}", path.display());
	}
	logbook.shutdown()?;
	Ok(())
}
