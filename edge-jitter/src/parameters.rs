use crate::{ensemble::AlignmentTolerance, error::ConfigError};
use anyhow::{Error, anyhow};
use clap::ValueEnum;
use scope_jitter_common::{ChannelId, MIN_ENSEMBLE_RUNS, Real, SCOPE_CHANNELS, TimeUnit};
use std::str::FromStr;

#[derive(Default, Debug, Clone, Copy)]
pub struct ToleranceWrapper(pub AlignmentTolerance);

impl FromStr for ToleranceWrapper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals: Vec<_> = s.split(',').map(str::trim).collect();
        if let [relative, absolute] = vals.as_slice() {
            Ok(ToleranceWrapper(AlignmentTolerance {
                relative: Real::from_str(relative)?,
                absolute: Real::from_str(absolute)?,
            }))
        } else {
            Err(anyhow!(
                "Incorrect number of parameters in tolerance, expected pattern 'relative,absolute', got '{s}'"
            ))
        }
    }
}

/// Everything an analysis session needs to know beyond the run data itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Channels to analyse, in report order.
    pub channels: Vec<ChannelId>,
    /// Number of runs making up the ensemble.
    pub run_count: usize,
    pub tolerance: AlignmentTolerance,
    /// Accept an ensemble of one run, whose deviations are all zero.
    pub allow_single_run: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            channels: SCOPE_CHANNELS.iter().map(|c| c.to_string()).collect(),
            run_count: 5,
            tolerance: AlignmentTolerance::default(),
            allow_single_run: false,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        for (i, channel) in self.channels.iter().enumerate() {
            if self.channels[..i].contains(channel) {
                return Err(ConfigError::DuplicateChannel(channel.clone()));
            }
        }
        let minimum = if self.allow_single_run {
            1
        } else {
            MIN_ENSEMBLE_RUNS
        };
        if self.run_count < minimum {
            return Err(ConfigError::RunCount(self.run_count, minimum));
        }
        let AlignmentTolerance { relative, absolute } = self.tolerance;
        if !(relative.is_finite() && absolute.is_finite() && relative >= 0.0 && absolute >= 0.0) {
            return Err(ConfigError::Tolerance { relative, absolute });
        }
        Ok(())
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human readable listing, one line per pulse
    #[default]
    Text,
    /// The report records serialised as JSON
    Json,
}

/// Controls how times are presented in a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub unit: TimeUnit,
    pub precision: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            unit: TimeUnit::default(),
            precision: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tolerance() {
        let ToleranceWrapper(tolerance) = ToleranceWrapper::from_str("1e-4, 2e-9").unwrap();
        assert_eq!(tolerance.relative, 1e-4);
        assert_eq!(tolerance.absolute, 2e-9);
        assert!(ToleranceWrapper::from_str("1e-4").is_err());
        assert!(ToleranceWrapper::from_str("1e-4,x").is_err());
    }

    #[test]
    fn default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.channels, vec!["CH1", "CH2", "CH3", "CH4"]);
        assert_eq!(config.run_count, 5);
        assert_eq!(config.tolerance, AlignmentTolerance::default());
    }

    #[test]
    fn invalid_configs() {
        let no_channels = AnalysisConfig {
            channels: vec![],
            ..Default::default()
        };
        assert_eq!(no_channels.validate(), Err(ConfigError::NoChannels));

        let duplicate = AnalysisConfig {
            channels: vec!["CH1".into(), "CH4".into(), "CH1".into()],
            ..Default::default()
        };
        assert_eq!(
            duplicate.validate(),
            Err(ConfigError::DuplicateChannel("CH1".into()))
        );

        let one_run = AnalysisConfig {
            run_count: 1,
            ..Default::default()
        };
        assert_eq!(one_run.clone().validate(), Err(ConfigError::RunCount(1, 2)));
        assert!(
            AnalysisConfig {
                allow_single_run: true,
                ..one_run
            }
            .validate()
            .is_ok()
        );

        let negative = AnalysisConfig {
            tolerance: AlignmentTolerance {
                relative: -1.0,
                absolute: 0.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::Tolerance { .. })
        ));
    }
}
