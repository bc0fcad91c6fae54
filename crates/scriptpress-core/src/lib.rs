// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scriptpress — Core types, errors, script detection and greedy line wrapping
// shared across all crates.

pub mod config;
pub mod error;
pub mod script;
pub mod types;
pub mod wrap;

pub use config::ConvertConfig;
pub use error::{Result, ScriptpressError};
pub use script::{ScriptProfile, classify};
pub use types::*;
pub use wrap::{wrap, wrap_paragraphs};
