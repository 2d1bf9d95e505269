// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic messages are struct types implementing `Display` (see [`messages`]) so that
//! log text lives in one place and fields travel with it. [`init_tracing`] installs the
//! `tracing-subscriber` formatter used by the binary and by anyone embedding the library who
//! has not set up their own subscriber.
//!
//! # Usage
//!
//! ```rust
//! use playground_runner::observability::{init_tracing, messages::stage::StageFailed};
//!
//! init_tracing("playground_runner=info");
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "exit 2");
//! tracing::error!("{}", StageFailed { stage: "build", error: &error });
//! ```

use tracing_subscriber::EnvFilter;

pub mod messages;

/// Install a formatting subscriber filtered by `RUST_LOG`, or by `default_directive` when
/// `RUST_LOG` is unset. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
