use anyhow::{Error, anyhow};
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use scope_jitter_common::{Real, SampleIndex};
use std::str::FromStr;

/// Nominal position of a pulse, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PulseTemplate {
    pub(crate) start: SampleIndex,
    pub(crate) width: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PulseTemplateWrapper(pub(crate) PulseTemplate);

impl FromStr for PulseTemplateWrapper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals: Vec<_> = s.split(',').map(str::trim).collect();
        if let [start, width] = vals.as_slice() {
            Ok(PulseTemplateWrapper(PulseTemplate {
                start: SampleIndex::from_str(start)?,
                width: usize::from_str(width)?,
            }))
        } else {
            Err(anyhow!(
                "Incorrect number of parameters in pulse, expected pattern 'start,width', got '{s}'"
            ))
        }
    }
}

/// An edge offset, in samples.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RandomScalar {
    Constant(Real),
    Normal(Normal<Real>),
}

impl RandomScalar {
    /// Normally distributed about zero, or exactly zero when `sd` is zero.
    pub(crate) fn jitter(sd: Real) -> Result<Self, NormalError> {
        if sd == 0.0 {
            Ok(Self::Constant(0.0))
        } else {
            Ok(Self::Normal(Normal::new(0.0, sd)?))
        }
    }

    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Real {
        match self {
            RandomScalar::Constant(t) => *t,
            RandomScalar::Normal(normal) => normal.sample(rng),
        }
    }
}

/// A pulse realised in one run, high on `start..stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FlatPulse {
    pub(crate) start: SampleIndex,
    pub(crate) stop: SampleIndex,
}

impl FlatPulse {
    /// Places `template` with each edge displaced by a whole number of samples,
    /// keeping the pulse within `samples` and never inverted.
    pub(crate) fn sample<R: Rng>(
        template: &PulseTemplate,
        rise_jitter: &RandomScalar,
        fall_jitter: &RandomScalar,
        samples: usize,
        rng: &mut R,
    ) -> Self {
        let displace = |index: SampleIndex, offset: Real| {
            index.saturating_add_signed(offset.round() as isize)
        };
        let start = displace(template.start, rise_jitter.sample(rng)).min(samples);
        let stop = displace(
            template.start.saturating_add(template.width),
            fall_jitter.sample(rng),
        )
        .clamp(start, samples);
        Self { start, stop }
    }

    pub(crate) fn is_high(&self, index: SampleIndex) -> bool {
        (self.start..self.stop).contains(&index)
    }
}

/// Two-level voltages of a trace containing `pulses`.
pub(crate) fn generate_trace(samples: usize, pulses: &[FlatPulse], low: Real, high: Real) -> Vec<Real> {
    (0..samples)
        .map(|index| {
            if pulses.iter().any(|pulse| pulse.is_high(index)) {
                high
            } else {
                low
            }
        })
        .collect()
}
