use crate::{
    channel_trace::{FlatPulse, PulseTemplate, RandomScalar, generate_trace},
    noise::Noise,
};
use edge_jitter::{
    ChannelTrace, Run, TimeAxis,
    error::{RunError, TimeAxisError},
};
use rand::Rng;
use rand_distr::NormalError;
use scope_jitter_common::{ChannelId, Real};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub(crate) enum SimulationError {
    #[error(transparent)]
    Jitter(#[from] NormalError),
    #[error(transparent)]
    TimeAxis(#[from] TimeAxisError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("pulse at {start} of width {width} does not fit in {samples} samples")]
    PulseOutOfRange {
        start: usize,
        width: usize,
        samples: usize,
    },
}

/// Describes every run of a simulated acquisition session.
#[derive(Debug, Clone)]
pub(crate) struct SimulationConfig {
    pub(crate) samples: usize,
    pub(crate) sample_time: Real,
    pub(crate) channels: Vec<ChannelId>,
    pub(crate) pulses: Vec<PulseTemplate>,
    pub(crate) low: Real,
    pub(crate) high: Real,
    /// Standard deviation of rising edge positions, in samples.
    pub(crate) rise_jitter: Real,
    /// Standard deviation of falling edge positions, in samples.
    pub(crate) fall_jitter: Real,
    pub(crate) noise: Real,
    pub(crate) smoothing_factor: Option<Real>,
}

pub(crate) struct Simulator {
    config: SimulationConfig,
    time: TimeAxis,
    rise_jitter: RandomScalar,
    fall_jitter: RandomScalar,
}

impl Simulator {
    pub(crate) fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        if let Some(template) = config
            .pulses
            .iter()
            .find(|template| {
                template
                    .start
                    .checked_add(template.width)
                    .is_none_or(|end| end > config.samples)
            })
        {
            return Err(SimulationError::PulseOutOfRange {
                start: template.start,
                width: template.width,
                samples: config.samples,
            });
        }
        Ok(Self {
            time: TimeAxis::uniform(config.samples, config.sample_time)?,
            rise_jitter: RandomScalar::jitter(config.rise_jitter)?,
            fall_jitter: RandomScalar::jitter(config.fall_jitter)?,
            config,
        })
    }

    /// Generates one run, each channel with independently jittered edges.
    pub(crate) fn run<R: Rng>(&self, rng: &mut R) -> Result<Run, SimulationError> {
        let samples = self.config.samples;
        let channels = self
            .config
            .channels
            .iter()
            .map(|channel| {
                let pulses: Vec<_> = self
                    .config
                    .pulses
                    .iter()
                    .map(|template| {
                        FlatPulse::sample(template, &self.rise_jitter, &self.fall_jitter, samples, rng)
                    })
                    .collect();
                trace!("{channel}: {pulses:?}");
                let mut noise = Noise::new(self.config.noise, self.config.smoothing_factor);
                let voltage = generate_trace(samples, &pulses, self.config.low, self.config.high)
                    .into_iter()
                    .map(|value| noise.noisify(value, rng))
                    .collect();
                ChannelTrace::new(channel.clone(), voltage)
            })
            .collect();
        Ok(Run::new(self.time.clone(), channels)?)
    }
}
