// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — wires the font and document crates into whole conversions
// for the command line.

pub mod converter;
pub mod samples;
