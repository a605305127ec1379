use crate::{
    ensemble::Ensemble,
    error::ChannelError,
    jitter::{JitterRecord, estimate_jitter},
    pulse::{Pulse, pair_pulses},
    pulse_detection::detect_edges,
    run::TimeAxis,
    statistics::{EnsembleStatistics, aggregate},
};
use scope_jitter_common::ChannelId;

/// Everything derived from the ensemble of one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelAnalysis {
    pub channel: ChannelId,
    pub statistics: EnsembleStatistics,
    /// Pulses of the mean trace.
    pub pulses: Vec<Pulse>,
    /// Edge jitter of each pulse, measured on the individual runs.
    pub jitter: Vec<JitterRecord>,
}

#[tracing::instrument(skip_all, fields(channel = ensemble.channel(), num_pulses))]
pub fn analyse_channel(
    ensemble: &Ensemble,
    time: &TimeAxis,
) -> Result<ChannelAnalysis, ChannelError> {
    let statistics = aggregate(ensemble);

    let edges = detect_edges(statistics.mean.view()).map_err(ChannelError::MeanTrace)?;
    let pulses = pair_pulses(&edges, time)?;
    tracing::Span::current().record("num_pulses", pulses.len());

    let jitter = estimate_jitter(ensemble, time)?;
    if jitter.len() != pulses.len() {
        tracing::warn!(
            "Mean trace has {} pulses but each run has {}",
            pulses.len(),
            jitter.len()
        );
    }

    Ok(ChannelAnalysis {
        channel: ensemble.channel().to_owned(),
        statistics,
        pulses,
        jitter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ensemble::{align_runs, tests::make_run},
        error::{EdgeError, JitterError},
        parameters::AnalysisConfig,
    };
    use assert_approx_eq::assert_approx_eq;
    use scope_jitter_common::Real;

    const SAMPLE_TIME: Real = 1e-9;
    const NUM_SAMPLES: usize = 4096;

    fn rectangular(start: usize, end: usize) -> Vec<Real> {
        (0..NUM_SAMPLES)
            .map(|i| if (start..end).contains(&i) { 3.3 } else { 0.0 })
            .collect()
    }

    fn analyse(traces: Vec<Vec<Real>>) -> Result<ChannelAnalysis, ChannelError> {
        let time = TimeAxis::uniform(NUM_SAMPLES, SAMPLE_TIME).unwrap();
        let runs: Vec<_> = traces
            .into_iter()
            .map(|trace| make_run(&time, &[("CH1", trace)]))
            .collect();
        let config = AnalysisConfig {
            channels: vec!["CH1".into()],
            run_count: runs.len(),
            ..Default::default()
        };
        let session = align_runs(&runs, &config).unwrap();
        analyse_channel(&session.ensembles[0], &session.time)
    }

    #[test]
    fn jittered_rising_edge() {
        // 100 sample pulse from sample 1000, rising edge jittered by up to 2 samples
        let analysis = analyse(
            [-2, -1, 0, 1, 2]
                .into_iter()
                .map(|offset: isize| rectangular(1000_usize.saturating_add_signed(offset), 1100))
                .collect(),
        )
        .unwrap();

        assert_eq!(analysis.channel, "CH1");
        assert_eq!(analysis.statistics.mean.len(), NUM_SAMPLES);

        assert_eq!(analysis.pulses.len(), 1);
        assert_eq!(analysis.pulses[0].rise_index, 1000);
        assert_eq!(analysis.pulses[0].fall_index, 1100);
        assert_approx_eq!(analysis.pulses[0].duration(), 100.0 * SAMPLE_TIME, 1e-15);

        assert_eq!(analysis.jitter.len(), 1);
        assert!(analysis.jitter[0].rise_std > 0.0);
        assert_approx_eq!(analysis.jitter[0].rise_std, Real::sqrt(2.0) * SAMPLE_TIME, 1e-18);
        assert_approx_eq!(analysis.jitter[0].fall_std, 0.0, 1e-18);
    }

    #[test]
    fn mean_trace_deviation_marks_jittered_samples() {
        let analysis = analyse(vec![rectangular(10, 20), rectangular(12, 20)]).unwrap();
        let std_dev = &analysis.statistics.std_dev;
        assert_approx_eq!(std_dev[9], 0.0);
        assert_approx_eq!(std_dev[10], 1.65);
        assert_approx_eq!(std_dev[11], 1.65);
        assert_approx_eq!(std_dev[12], 0.0);
    }

    #[test]
    fn flat_channel_fails_on_mean_trace() {
        assert_eq!(
            analyse(vec![vec![0.0; NUM_SAMPLES], vec![0.0; NUM_SAMPLES]]),
            Err(ChannelError::MeanTrace(EdgeError::FlatSignal { level: 0.0 }))
        );
    }

    #[test]
    fn mismatched_pulse_counts_fail_the_channel() {
        let mut extra_pulse = rectangular(1000, 1100);
        extra_pulse[2000..2050].fill(3.3);
        assert!(matches!(
            analyse(vec![rectangular(1000, 1100), extra_pulse]),
            Err(ChannelError::Jitter(JitterError::PulseCountMismatch { run: 1, .. }))
        ));
    }
}
