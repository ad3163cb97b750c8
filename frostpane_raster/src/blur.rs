// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The external blur-stage contract.

use core::fmt;

use crate::buffer::PixelBuffer;

/// Error from the external blur transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurError {
    /// The underlying transform library is not initialized for the current
    /// rendering context. This indicates a missing setup step owned by the
    /// host integration layer and must reach the integrator, so callers
    /// propagate it rather than masking it.
    Uninitialized,
}

impl fmt::Display for BlurError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => {
                write!(f, "blur transform not initialized for this rendering context")
            }
        }
    }
}

impl core::error::Error for BlurError {}

/// An opaque blur transform.
///
/// The kernel itself lives outside this workspace; the pipeline only
/// relies on this contract:
///
/// - The output buffer has the same dimensions as the input.
/// - The output is a pure function of `(src, radius)` — no hidden state
///   may affect it, so identical inputs yield identical outputs.
/// - A radius of zero returns the input unchanged (copied).
pub trait BlurStage {
    /// Produces a blurred copy of `src`.
    fn blur(&mut self, src: &PixelBuffer, radius: u32) -> Result<PixelBuffer, BlurError>;
}
