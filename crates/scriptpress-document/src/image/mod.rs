// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — rasterize wrapped text onto a white canvas and encode it as
// PNG or JPEG.

pub mod raster;

pub use raster::{PlacedLine, TextLayout, TextRasterizer};
