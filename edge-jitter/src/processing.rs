use crate::{
    channels::{ChannelAnalysis, analyse_channel},
    ensemble::align_runs,
    error::{ChannelError, SessionError},
    parameters::AnalysisConfig,
    run::{Run, TimeAxis},
};
use rayon::prelude::*;
use scope_jitter_common::ChannelId;
use tracing::{info, warn};

/// The result of analysing one channel. A failure here does not affect other channels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOutcome {
    pub channel: ChannelId,
    pub result: Result<ChannelAnalysis, ChannelError>,
}

#[derive(Debug, Clone)]
pub struct SessionAnalysis {
    pub time: TimeAxis,
    pub num_runs: usize,
    /// One entry per configured channel, in configured order.
    pub channels: Vec<ChannelOutcome>,
}

impl SessionAnalysis {
    pub fn num_failed(&self) -> usize {
        self.channels
            .iter()
            .filter(|outcome| outcome.result.is_err())
            .count()
    }
}

/// Aligns `runs` and analyses each configured channel independently.
/// Only problems with the runs as a whole are returned as errors.
#[tracing::instrument(skip_all, fields(num_runs = runs.len(), num_channels = config.channels.len()))]
pub fn analyse_session(runs: &[Run], config: &AnalysisConfig) -> Result<SessionAnalysis, SessionError> {
    let session = align_runs(runs, config)?;
    let time = &session.time;

    let channels: Vec<_> = session
        .ensembles
        .par_iter()
        .map(|ensemble| ChannelOutcome {
            channel: ensemble.channel().to_owned(),
            result: analyse_channel(ensemble, time),
        })
        .collect();

    for outcome in &channels {
        match &outcome.result {
            Ok(analysis) => info!(
                "Channel {}: {} pulses, {} jitter records",
                outcome.channel,
                analysis.pulses.len(),
                analysis.jitter.len()
            ),
            Err(e) => warn!("Channel {} abandoned: {e}", outcome.channel),
        }
    }

    Ok(SessionAnalysis {
        time: session.time,
        num_runs: runs.len(),
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ensemble::tests::make_run, error::EdgeError};
    use scope_jitter_common::Real;

    fn config(channels: &[&str], run_count: usize) -> AnalysisConfig {
        AnalysisConfig {
            channels: channels.iter().map(|c| c.to_string()).collect(),
            run_count,
            ..Default::default()
        }
    }

    fn square(len: usize, start: usize, end: usize) -> Vec<Real> {
        (0..len)
            .map(|i| if (start..end).contains(&i) { 3.3 } else { 0.0 })
            .collect()
    }

    #[test]
    fn failing_channel_does_not_affect_others() {
        let time = TimeAxis::uniform(64, 1e-6).unwrap();
        let runs: Vec<_> = (0..3)
            .map(|k| {
                make_run(
                    &time,
                    &[
                        ("CH1", square(64, 10 + k, 30)),
                        ("CH2", vec![0.0; 64]),
                        ("CH4", square(64, 40, 50 + k)),
                    ],
                )
            })
            .collect();
        let analysis = analyse_session(&runs, &config(&["CH1", "CH2", "CH4"], runs.len())).unwrap();

        assert_eq!(analysis.num_runs, 3);
        assert_eq!(analysis.num_failed(), 1);
        let channels: Vec<_> = analysis.channels.iter().map(|o| o.channel.as_str()).collect();
        assert_eq!(channels, vec!["CH1", "CH2", "CH4"]);

        assert_eq!(analysis.channels[0].result.as_ref().unwrap().pulses.len(), 1);
        assert_eq!(
            analysis.channels[1].result,
            Err(ChannelError::MeanTrace(EdgeError::FlatSignal { level: 0.0 }))
        );
        assert_eq!(analysis.channels[2].result.as_ref().unwrap().jitter.len(), 1);
    }

    #[test]
    fn misaligned_runs_fail_the_session() {
        let runs = vec![
            make_run(&TimeAxis::uniform(8, 1.0).unwrap(), &[("CH1", square(8, 2, 4))]),
            make_run(&TimeAxis::uniform(8, 2.0).unwrap(), &[("CH1", square(8, 2, 4))]),
        ];
        assert!(matches!(
            analyse_session(&runs, &config(&["CH1"], runs.len())),
            Err(SessionError::Alignment { run: 1, .. })
        ));
    }

    #[test]
    fn session_is_deterministic() {
        let time = TimeAxis::uniform(128, 1e-9).unwrap();
        let runs: Vec<_> = (0..5)
            .map(|k| {
                make_run(
                    &time,
                    &[
                        ("CH1", square(128, 20 + k, 60)),
                        ("CH2", square(128, 70, 100 + 2 * k)),
                    ],
                )
            })
            .collect();
        let first = analyse_session(&runs, &config(&["CH1", "CH2"], runs.len())).unwrap();
        let second = analyse_session(&runs, &config(&["CH1", "CH2"], runs.len())).unwrap();
        assert_eq!(first.channels, second.channels);
    }
}
