// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-line display annotations built from the event stream.

mod line;
mod render;
mod session;

pub use line::{assign, Line, LineIndex};
pub use render::{clean, extended_representation, short_representation, TruncationPolicy};
pub use session::AnnotationSession;
