use crate::{error::PulseError, pulse_detection::EdgeSet, run::TimeAxis};
use scope_jitter_common::{Real, SampleIndex};

/// A rising edge and the falling edge paired with it.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub rise_index: SampleIndex,
    pub fall_index: SampleIndex,
    pub rise_time: Real,
    pub fall_time: Real,
}

impl Pulse {
    pub fn duration(&self) -> Real {
        self.fall_time - self.rise_time
    }
}

/// Pairs the k-th rising edge with the k-th falling edge.
///
/// Edges from [crate::detect_edges] already alternate, so pairing by position
/// is exact; an unequal number of edges is reported rather than guessed at.
pub fn pair_pulses(edges: &EdgeSet, time: &TimeAxis) -> Result<Vec<Pulse>, PulseError> {
    if edges.num_pulses().is_none() {
        return Err(PulseError::UnpairedEdges {
            rising: edges.rising.len(),
            falling: edges.falling.len(),
        });
    }
    let time_at = |index: SampleIndex| {
        time.time_at(index).ok_or(PulseError::EdgeOutOfRange {
            index,
            len: time.len(),
        })
    };
    edges
        .rising
        .iter()
        .zip(&edges.falling)
        .enumerate()
        .map(|(pulse, (&rise_index, &fall_index))| {
            if fall_index < rise_index {
                return Err(PulseError::InvertedPulse {
                    pulse,
                    rise: rise_index,
                    fall: fall_index,
                });
            }
            Ok(Pulse {
                rise_index,
                fall_index,
                rise_time: time_at(rise_index)?,
                fall_time: time_at(fall_index)?,
            })
        })
        .collect()
}
