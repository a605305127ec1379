use super::Detector;
use crate::{
    error::EdgeError,
    pulse_detection::{Edge, EdgeDirection},
};
use ndarray::ArrayView1;
use scope_jitter_common::{Real, SampleIndex};

/// Halfway between the lowest and highest sample of a trace.
/// Fails when there is no range to split, as a flat trace means the capture went wrong.
pub(crate) fn midpoint_of(trace: ArrayView1<'_, Real>) -> Result<Real, EdgeError> {
    if let Some(index) = trace.iter().position(|v| !v.is_finite()) {
        return Err(EdgeError::NonFiniteSample { index });
    }
    let (min, max) = trace
        .iter()
        .fold(None, |range: Option<(Real, Real)>, &v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
        .ok_or(EdgeError::EmptyTrace)?;
    if min == max {
        Err(EdgeError::FlatSignal { level: min })
    } else {
        Ok(0.5 * (min + max))
    }
}

#[derive(Default, Debug, Clone, Copy)]
struct LastSample {
    index: SampleIndex,
    high: bool,
}

/// Emits an edge whenever the trace crosses a fixed threshold.
/// Samples strictly above the threshold are high.
#[derive(Default, Clone)]
pub(crate) struct MidpointThresholdDetector {
    threshold: Real,
    last: Option<LastSample>, // None until the first sample arrives
}

impl MidpointThresholdDetector {
    pub(crate) fn new(threshold: Real) -> Self {
        Self {
            threshold,
            last: None,
        }
    }
}

impl Detector for MidpointThresholdDetector {
    type EventPointType = Edge;

    fn signal(&mut self, index: SampleIndex, value: Real) -> Option<Edge> {
        let high = value > self.threshold;
        let was_high = self.last.map(|last| last.high);
        self.last = Some(LastSample { index, high });
        let direction = match (was_high, high) {
            // a trace which starts high rises at the start of the window
            (None, true) | (Some(false), true) => Some(EdgeDirection::Rising),
            (Some(true), false) => Some(EdgeDirection::Falling),
            _ => None,
        };
        direction.map(|direction| Edge { index, direction })
    }

    fn finish(&mut self) -> Option<Edge> {
        // a trace which ends high falls at the end of the window
        match self.last.take() {
            Some(LastSample { index, high: true }) => Some(Edge {
                index,
                direction: EdgeDirection::Falling,
            }),
            _ => None,
        }
    }
}
