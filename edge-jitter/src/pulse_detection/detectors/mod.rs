pub mod midpoint_threshold;

use scope_jitter_common::{Real, SampleIndex};

/// A state machine which is fed a trace one sample at a time.
pub(crate) trait Detector: Clone {
    type EventPointType;

    fn signal(&mut self, index: SampleIndex, value: Real) -> Option<Self::EventPointType>;

    /// Called once after the last sample, to emit anything left open by the end of the trace.
    fn finish(&mut self) -> Option<Self::EventPointType>;
}
