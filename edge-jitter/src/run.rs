use crate::error::{RunError, TimeAxisError};
use scope_jitter_common::{ChannelId, Real, SampleIndex};
use std::ops::Deref;

/// Strictly increasing sample times, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis(Vec<Real>);

impl TimeAxis {
    pub fn new(times: Vec<Real>) -> Result<Self, TimeAxisError> {
        if let Some(sample) = times.iter().position(|t| !t.is_finite()) {
            return Err(TimeAxisError::NonFinite { sample });
        }
        if let Some(sample) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(TimeAxisError::NotIncreasing { sample: sample + 1 });
        }
        Ok(Self(times))
    }

    /// A time axis starting at zero with a constant sample period,
    /// as produced by a scope running at a fixed sample rate.
    pub fn uniform(samples: usize, sample_time: Real) -> Result<Self, TimeAxisError> {
        if !sample_time.is_finite() || sample_time <= 0.0 {
            return Err(TimeAxisError::SampleTime(sample_time));
        }
        Self::new((0..samples).map(|i| i as Real * sample_time).collect())
    }

    pub fn time_at(&self, index: SampleIndex) -> Option<Real> {
        self.0.get(index).copied()
    }
}

impl Deref for TimeAxis {
    type Target = [Real];

    fn deref(&self) -> &[Real] {
        &self.0
    }
}

/// The voltages captured on one channel during one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTrace {
    pub channel: ChannelId,
    pub voltage: Vec<Real>,
}

impl ChannelTrace {
    pub fn new(channel: impl Into<ChannelId>, voltage: Vec<Real>) -> Self {
        Self {
            channel: channel.into(),
            voltage,
        }
    }
}

/// One acquisition: a time axis and the channels captured against it,
/// in acquisition (column) order.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    time: TimeAxis,
    channels: Vec<ChannelTrace>,
}

impl Run {
    pub fn new(time: TimeAxis, channels: Vec<ChannelTrace>) -> Result<Self, RunError> {
        for (i, trace) in channels.iter().enumerate() {
            if trace.voltage.len() != time.len() {
                return Err(RunError::ChannelLength {
                    channel: trace.channel.clone(),
                    expected: time.len(),
                    found: trace.voltage.len(),
                });
            }
            if channels[..i].iter().any(|other| other.channel == trace.channel) {
                return Err(RunError::DuplicateChannel(trace.channel.clone()));
            }
        }
        Ok(Self { time, channels })
    }

    pub fn time(&self) -> &TimeAxis {
        &self.time
    }

    pub fn channels(&self) -> &[ChannelTrace] {
        &self.channels
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|trace| trace.channel.as_str())
    }

    pub fn channel(&self, channel: &str) -> Option<&[Real]> {
        self.channels
            .iter()
            .find(|trace| trace.channel == channel)
            .map(|trace| trace.voltage.as_slice())
    }

    pub fn num_samples(&self) -> usize {
        self.time.len()
    }
}
