use crate::{
    error::SessionError,
    parameters::AnalysisConfig,
    run::{Run, TimeAxis},
};
use ndarray::{Array2, ArrayView1, Axis};
use scope_jitter_common::{ChannelId, MIN_ENSEMBLE_RUNS, Real, SampleIndex};
use std::fmt::Display;
use thiserror::Error;
use tracing::{debug, warn};

/// Closeness test for the time axes of different runs, `|a - b| <= absolute + relative * |b|`
/// where `b` is taken from the reference run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentTolerance {
    pub relative: Real,
    pub absolute: Real,
}

impl Default for AlignmentTolerance {
    fn default() -> Self {
        Self {
            relative: 1e-5,
            absolute: 1e-8,
        }
    }
}

impl AlignmentTolerance {
    pub fn is_close(&self, value: Real, reference: Real) -> bool {
        (value - reference).abs() <= self.absolute + self.relative * reference.abs()
    }
}

impl Display for AlignmentTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.relative, self.absolute)
    }
}

/// How a run fails to line up with the reference run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignmentMismatch {
    #[error("{found} samples, expected {expected}")]
    SampleCount { expected: usize, found: usize },
    #[error("time {found} s at sample {sample} differs from {expected} s")]
    Time {
        sample: SampleIndex,
        expected: Real,
        found: Real,
    },
    #[error("channel {0} is missing")]
    MissingChannel(ChannelId),
}

/// The voltages of one channel across every run of a session, one row per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    channel: ChannelId,
    voltages: Array2<Real>,
}

impl Ensemble {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn voltages(&self) -> &Array2<Real> {
        &self.voltages
    }

    pub fn num_runs(&self) -> usize {
        self.voltages.nrows()
    }

    pub fn num_samples(&self) -> usize {
        self.voltages.ncols()
    }

    pub fn runs(&self) -> impl Iterator<Item = ArrayView1<'_, Real>> {
        self.voltages.axis_iter(Axis(0))
    }
}

/// Every selected channel of a set of runs, verified to share one time axis.
#[derive(Debug, Clone)]
pub struct AlignedSession {
    pub time: TimeAxis,
    pub ensembles: Vec<Ensemble>,
}

/// Checks that `runs` can be analysed together and rearranges them into one ensemble per channel.
/// Run 0 is the reference against which the others are compared.
///
/// `config` is validated first, and exactly `config.run_count` runs must be given.
#[tracing::instrument(skip_all, fields(num_runs = runs.len()))]
pub fn align_runs(runs: &[Run], config: &AnalysisConfig) -> Result<AlignedSession, SessionError> {
    config.validate()?;
    if runs.len() > config.run_count {
        return Err(SessionError::UnexpectedRuns {
            expected: config.run_count,
            found: runs.len(),
        });
    }
    let Some(reference) = runs.first().filter(|_| runs.len() == config.run_count) else {
        return Err(SessionError::InsufficientRuns {
            required: config.run_count,
            found: runs.len(),
        });
    };
    if runs.len() < MIN_ENSEMBLE_RUNS {
        warn!("Only {} run provided, standard deviations and jitter will be zero", runs.len());
    }

    for (run_index, run) in runs.iter().enumerate().skip(1) {
        check_time_alignment(reference.time(), run.time(), &config.tolerance).map_err(
            |mismatch| SessionError::Alignment {
                run: run_index,
                mismatch,
            },
        )?;
    }

    let ensembles = config
        .channels
        .iter()
        .map(|channel| build_ensemble(runs, channel))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Aligned {} runs of {} samples over {} channels",
        runs.len(),
        reference.num_samples(),
        ensembles.len()
    );
    Ok(AlignedSession {
        time: reference.time().clone(),
        ensembles,
    })
}

fn check_time_alignment(
    reference: &TimeAxis,
    time: &TimeAxis,
    tolerance: &AlignmentTolerance,
) -> Result<(), AlignmentMismatch> {
    if reference.len() != time.len() {
        return Err(AlignmentMismatch::SampleCount {
            expected: reference.len(),
            found: time.len(),
        });
    }
    match reference
        .iter()
        .zip(time.iter())
        .position(|(&expected, &found)| !tolerance.is_close(found, expected))
    {
        Some(sample) => Err(AlignmentMismatch::Time {
            sample,
            expected: reference[sample],
            found: time[sample],
        }),
        None => Ok(()),
    }
}

fn build_ensemble(runs: &[Run], channel: &ChannelId) -> Result<Ensemble, SessionError> {
    let traces = runs
        .iter()
        .enumerate()
        .map(|(run_index, run)| {
            let voltage = run.channel(channel).ok_or_else(|| SessionError::Alignment {
                run: run_index,
                mismatch: AlignmentMismatch::MissingChannel(channel.clone()),
            })?;
            if let Some(sample) = voltage.iter().position(|v| !v.is_finite()) {
                return Err(SessionError::NonFiniteSample {
                    run: run_index,
                    channel: channel.clone(),
                    sample,
                });
            }
            Ok(voltage)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let num_samples = traces.first().map(|v| v.len()).unwrap_or_default();
    let voltages = Array2::from_shape_fn((traces.len(), num_samples), |(run, sample)| {
        traces[run][sample]
    });
    Ok(Ensemble {
        channel: channel.clone(),
        voltages,
    })
}
