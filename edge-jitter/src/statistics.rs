use crate::ensemble::Ensemble;
use ndarray::{Array1, ArrayView1, Axis};
use scope_jitter_common::Real;

/// Sample-wise summary of an ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleStatistics {
    pub mean: Array1<Real>,
    /// Population standard deviation, i.e. divided by the number of runs.
    pub std_dev: Array1<Real>,
}

pub fn aggregate(ensemble: &Ensemble) -> EnsembleStatistics {
    let voltages = ensemble.voltages();
    EnsembleStatistics {
        mean: voltages.mean_axis(Axis(0)).unwrap_or_default(),
        std_dev: voltages.std_axis(Axis(0), 0.0),
    }
}

/// Mean and population standard deviation of a set of values, zero for an empty set.
pub(crate) fn mean_and_std_dev(values: ArrayView1<'_, Real>) -> (Real, Real) {
    match values.mean() {
        Some(mean) => (mean, values.std(0.0)),
        None => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ensemble::{align_runs, tests::make_run},
        parameters::AnalysisConfig,
        run::TimeAxis,
    };
    use assert_approx_eq::assert_approx_eq;

    fn ensemble(rows: &[Vec<Real>]) -> Ensemble {
        let time = TimeAxis::uniform(rows[0].len(), 1.0).unwrap();
        let runs: Vec<_> = rows
            .iter()
            .map(|row| make_run(&time, &[("CH1", row.clone())]))
            .collect();
        let config = AnalysisConfig {
            channels: vec!["CH1".into()],
            run_count: runs.len(),
            allow_single_run: true,
            ..Default::default()
        };
        align_runs(&runs, &config).unwrap().ensembles.remove(0)
    }

    #[test]
    fn population_std_dev() {
        let stats = aggregate(&ensemble(&[
            vec![1.0, 0.0, 2.0],
            vec![3.0, 0.0, 2.0],
        ]));
        assert_eq!(stats.mean.to_vec(), vec![2.0, 0.0, 2.0]);
        // divisor is the number of runs, so {1,3} has a deviation of 1, not sqrt(2)
        assert_approx_eq!(stats.std_dev[0], 1.0);
        assert_approx_eq!(stats.std_dev[1], 0.0);
        assert_approx_eq!(stats.std_dev[2], 0.0);
    }

    #[test]
    fn five_run_deviation() {
        let stats = aggregate(&ensemble(&[
            vec![100.0],
            vec![101.0],
            vec![102.0],
            vec![103.0],
            vec![104.0],
        ]));
        assert_approx_eq!(stats.mean[0], 102.0);
        assert_approx_eq!(stats.std_dev[0], Real::sqrt(2.0));
    }

    #[test]
    fn single_run_has_zero_deviation() {
        let stats = aggregate(&ensemble(&[vec![0.5, 3.3, 0.0]]));
        assert_eq!(stats.mean.to_vec(), vec![0.5, 3.3, 0.0]);
        assert_eq!(stats.std_dev.to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let ensemble = ensemble(&[
            vec![0.1, 0.7, 3.3, 1.1],
            vec![0.2, 0.3, 3.1, 1.9],
            vec![0.3, 0.9, 3.2, 1.3],
        ]);
        let first = aggregate(&ensemble);
        let second = aggregate(&ensemble);
        assert_eq!(
            first.mean.map(|v| v.to_bits()),
            second.mean.map(|v| v.to_bits())
        );
        assert_eq!(
            first.std_dev.map(|v| v.to_bits()),
            second.std_dev.map(|v| v.to_bits())
        );
    }

    #[test]
    fn scalar_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let (mean, std_dev) = mean_and_std_dev(ArrayView1::from(&values[..]));
        assert_approx_eq!(mean, 5.0);
        assert_approx_eq!(std_dev, 2.0);
        assert_eq!(mean_and_std_dev(ArrayView1::from(&[][..])), (0.0, 0.0));
    }
}
