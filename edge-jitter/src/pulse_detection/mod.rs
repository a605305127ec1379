//! Tools for turning a voltage trace into the sample indices at which its binary
//! (high/low) state changes.
//!
//! A trace is fed through a detector as `(index, voltage)` points, typical usage
//! looks like:
//! ```ignore
//! let edges = trace.iter()
//!     .copied()
//!     .enumerate()
//!     .events(MidpointThresholdDetector::new(threshold)) // Registers an edge whenever the trace
//!                                                        // crosses the threshold, and closes a
//!                                                        // pulse left open at the end of the trace
//!     .collect::<EdgeSet>();
//! ```
//! [detect_edges] wraps this with the threshold choice and the input checks.

pub(crate) mod detectors;
pub(crate) mod edge;
pub(crate) mod events;

pub(crate) use detectors::{Detector, midpoint_threshold};
pub use edge::{Edge, EdgeDirection, EdgeSet};
pub(crate) use events::EventFilter;

use crate::error::EdgeError;
use midpoint_threshold::{MidpointThresholdDetector, midpoint_of};
use ndarray::ArrayView1;
use scope_jitter_common::Real;

/// Finds the rising and falling edges of a single voltage sequence.
///
/// The trace is considered high wherever it exceeds the midpoint of its own range.
/// A trace which starts high is treated as rising at index 0, and one which ends
/// high is treated as falling at its last index, so every pulse in the window,
/// including partial ones at either end, has both edges.
pub fn detect_edges<'a>(trace: impl Into<ArrayView1<'a, Real>>) -> Result<EdgeSet, EdgeError> {
    let trace = trace.into();
    let threshold = midpoint_of(trace)?;
    let edges = trace
        .iter()
        .copied()
        .enumerate()
        .events(MidpointThresholdDetector::new(threshold))
        .collect::<EdgeSet>();
    tracing::trace!(
        threshold,
        rising = edges.rising.len(),
        falling = edges.falling.len(),
        "Detected edges"
    );
    Ok(edges)
}
