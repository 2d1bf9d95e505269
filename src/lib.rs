// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod annotation;  // per-line display strings
pub mod bundle;      // locating source bundles
pub mod config;      // config + runtime wiring
pub mod engine;      // stage runner and pipeline
pub mod errors;      // error handling
pub mod expectation; // golden-output checks
pub mod observability;
pub mod playground;
pub mod records;     // event records and ndjson decoding
pub mod session;     // open playgrounds per file
pub mod traits;      // unified abstractions
pub mod workspace;   // scratch workspace preparation
