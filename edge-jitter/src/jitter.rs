use crate::{
    ensemble::Ensemble,
    error::{JitterError, PulseError},
    pulse::{Pulse, pair_pulses},
    pulse_detection::{EdgeSet, detect_edges},
    run::TimeAxis,
    statistics::mean_and_std_dev,
};
use ndarray::{Array2, Axis};
use scope_jitter_common::Real;
use tracing::{debug, trace};

/// Run-to-run spread of the edges of one pulse.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct JitterRecord {
    /// Position of the pulse within each run, from zero.
    pub pulse: usize,
    pub rise_mean: Real,
    pub rise_std: Real,
    pub fall_mean: Real,
    pub fall_std: Real,
}

/// Detects the edges of every run of `ensemble` independently and summarises,
/// for each pulse position, how the edge times vary between runs.
///
/// Every run must contain the same number of edges as run 0, otherwise
/// the k-th pulse of one run cannot be assumed to be the k-th pulse of another.
#[tracing::instrument(skip_all, fields(channel = ensemble.channel(), num_runs = ensemble.num_runs()))]
pub fn estimate_jitter(
    ensemble: &Ensemble,
    time: &TimeAxis,
) -> Result<Vec<JitterRecord>, JitterError> {
    let run_edges = ensemble
        .runs()
        .enumerate()
        .map(|(run, voltage)| {
            detect_edges(voltage).map_err(|error| JitterError::Edge { run, error })
        })
        .collect::<Result<Vec<EdgeSet>, _>>()?;

    let Some(reference) = run_edges.first() else {
        return Ok(Vec::new());
    };
    for (run, edges) in run_edges.iter().enumerate().skip(1) {
        if edges.rising.len() != reference.rising.len()
            || edges.falling.len() != reference.falling.len()
        {
            return Err(JitterError::PulseCountMismatch {
                run,
                expected_rising: reference.rising.len(),
                expected_falling: reference.falling.len(),
                rising: edges.rising.len(),
                falling: edges.falling.len(),
            });
        }
    }

    let run_pulses = run_edges
        .iter()
        .map(|edges| pair_pulses(edges, time))
        .collect::<Result<Vec<_>, PulseError>>()?;
    let num_pulses = reference.rising.len();
    trace!("Every run has {num_pulses} pulses");

    // Rows are runs, columns are pulse positions.
    let edge_times = |edge_time: fn(&Pulse) -> Real| {
        Array2::from_shape_fn((run_pulses.len(), num_pulses), |(run, pulse)| {
            edge_time(&run_pulses[run][pulse])
        })
    };
    let rise_times = edge_times(|pulse: &Pulse| pulse.rise_time);
    let fall_times = edge_times(|pulse: &Pulse| pulse.fall_time);

    let records: Vec<_> = rise_times
        .axis_iter(Axis(1))
        .zip(fall_times.axis_iter(Axis(1)))
        .enumerate()
        .map(|(pulse, (rises, falls))| {
            let (rise_mean, rise_std) = mean_and_std_dev(rises);
            let (fall_mean, fall_std) = mean_and_std_dev(falls);
            JitterRecord {
                pulse,
                rise_mean,
                rise_std,
                fall_mean,
                fall_std,
            }
        })
        .collect();
    debug!("Estimated jitter of {} pulses", records.len());
    Ok(records)
}
