use rand::Rng;
use scope_jitter_common::Real;

/// Additive measurement noise, drawn per sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Noise {
    None,
    Uniform(Real),
    /// Uniform noise passed through a first order low pass filter,
    /// `factor` being the weight of each new draw.
    SmoothUniform {
        max: Real,
        factor: Real,
        prev: Real,
    },
}

fn symmetric_unit<R: Rng>(rng: &mut R) -> Real {
    rng.random_range(-1.0..=1.0)
}

impl Noise {
    pub(crate) fn new(max: Real, smoothing_factor: Option<Real>) -> Self {
        if max == 0.0 {
            return Self::None;
        }
        match smoothing_factor {
            Some(factor) => Self::SmoothUniform {
                max,
                factor,
                prev: Real::default(),
            },
            None => Self::Uniform(max),
        }
    }

    pub(crate) fn noisify<R: Rng>(&mut self, value: Real, rng: &mut R) -> Real {
        match self {
            Self::None => value,
            Self::Uniform(max) => value + *max * symmetric_unit(rng),
            Self::SmoothUniform { max, factor, prev } => {
                *prev = *prev * (1.0 - *factor) + symmetric_unit(rng) * *factor;
                value + *max * *prev
            }
        }
    }
}
