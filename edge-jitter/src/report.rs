//! Presentation of a [SessionAnalysis], either as the console listing
//! or as JSON for further processing.
use crate::{
    channels::ChannelAnalysis, parameters::ReportOptions, processing::SessionAnalysis,
};
use itertools::Itertools;
use scope_jitter_common::{ChannelId, Real, TimeUnit};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulseRow {
    /// Counted from one.
    pub pulse: usize,
    pub duration_s: Real,
    /// `duration_s` in the report unit.
    pub duration: Real,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JitterRow {
    /// Counted from one.
    pub pulse: usize,
    pub rise_mean_s: Real,
    pub rise_std_s: Real,
    pub rise_std: Real,
    pub fall_mean_s: Real,
    pub fall_std_s: Real,
    pub fall_std: Real,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReport {
    pub channel: ChannelId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub pulses: Vec<PulseRow>,
    pub jitter: Vec<JitterRow>,
}

impl ChannelReport {
    fn from_analysis(analysis: &ChannelAnalysis, unit: TimeUnit) -> Self {
        Self {
            channel: analysis.channel.clone(),
            error: None,
            pulses: analysis
                .pulses
                .iter()
                .enumerate()
                .map(|(i, pulse)| PulseRow {
                    pulse: i + 1,
                    duration_s: pulse.duration(),
                    duration: unit.scale(pulse.duration()),
                })
                .collect(),
            jitter: analysis
                .jitter
                .iter()
                .map(|record| JitterRow {
                    pulse: record.pulse + 1,
                    rise_mean_s: record.rise_mean,
                    rise_std_s: record.rise_std,
                    rise_std: unit.scale(record.rise_std),
                    fall_mean_s: record.fall_mean,
                    fall_std_s: record.fall_std,
                    fall_std: unit.scale(record.fall_std),
                })
                .collect(),
        }
    }

    fn failed(channel: &ChannelId, error: String) -> Self {
        Self {
            channel: channel.clone(),
            error: Some(error),
            pulses: Vec::new(),
            jitter: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub unit: TimeUnit,
    pub num_runs: usize,
    pub channels: Vec<ChannelReport>,
}

impl Report {
    pub fn new(analysis: &SessionAnalysis, unit: TimeUnit) -> Self {
        Self {
            unit,
            num_runs: analysis.num_runs,
            channels: analysis
                .channels
                .iter()
                .map(|outcome| match &outcome.result {
                    Ok(channel) => ChannelReport::from_analysis(channel, unit),
                    Err(e) => ChannelReport::failed(&outcome.channel, e.to_string()),
                })
                .collect(),
        }
    }
}

fn text_sections(channel: &ChannelReport, unit: TimeUnit, precision: usize) -> Vec<String> {
    let name = &channel.channel;
    if let Some(error) = &channel.error {
        return vec![format!("=== {name} Analysis Failed ===\n {error}")];
    }
    let durations = channel
        .pulses
        .iter()
        .map(|row| format!(" Pulse #{}: {:.precision$} {unit}", row.pulse, row.duration));
    let jitter = channel.jitter.iter().map(|row| {
        format!(
            " Pulse #{}: rising σ = {:.precision$} {unit}, falling σ = {:.precision$} {unit}",
            row.pulse, row.rise_std, row.fall_std
        )
    });
    vec![
        std::iter::once(format!("=== {name} Pulse Durations ===")).chain(durations).join("\n"),
        std::iter::once(format!("=== {name} Edge-Time Jitter ===")).chain(jitter).join("\n"),
    ]
}

/// Writes the console listing, sections separated by blank lines.
pub fn render_text<W: Write>(report: &Report, options: &ReportOptions, mut writer: W) -> io::Result<()> {
    let text = report
        .channels
        .iter()
        .flat_map(|channel| text_sections(channel, report.unit, options.precision))
        .join("\n\n");
    writeln!(writer, "{text}")
}

pub fn render_json<W: Write>(report: &Report, mut writer: W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ensemble::tests::make_run, parameters::AnalysisConfig, processing::analyse_session,
        run::TimeAxis,
    };

    fn square(start: usize, end: usize) -> Vec<Real> {
        (0..4096)
            .map(|i| if (start..end).contains(&i) { 3.3 } else { 0.0 })
            .collect()
    }

    fn session() -> SessionAnalysis {
        let time = TimeAxis::uniform(4096, 1e-6).unwrap();
        let runs: Vec<_> = (0..5)
            .map(|_| {
                make_run(
                    &time,
                    &[
                        ("CH1", square(1000, 1100)),
                        ("CH2", vec![1.0; 4096]),
                    ],
                )
            })
            .collect();
        let config = AnalysisConfig {
            channels: vec!["CH1".into(), "CH2".into()],
            ..Default::default()
        };
        analyse_session(&runs, &config).unwrap()
    }

    fn text(report: &Report, options: &ReportOptions) -> String {
        let mut buffer = Vec::new();
        render_text(report, options, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn console_listing() {
        let options = ReportOptions::default();
        let report = Report::new(&session(), options.unit);
        assert_eq!(
            text(&report, &options),
            "=== CH1 Pulse Durations ===\n\
             \x20Pulse #1: 100.00 µs\n\
             \n\
             === CH1 Edge-Time Jitter ===\n\
             \x20Pulse #1: rising σ = 0.00 µs, falling σ = 0.00 µs\n\
             \n\
             === CH2 Analysis Failed ===\n\
             \x20edge detection failed on the mean trace: trace is flat at 1 V, no threshold can be placed\n"
        );
    }

    #[test]
    fn unit_and_precision() {
        let options = ReportOptions {
            unit: TimeUnit::Milliseconds,
            precision: 4,
        };
        let report = Report::new(&session(), options.unit);
        assert!(text(&report, &options).contains(" Pulse #1: 0.1000 ms\n"));
    }

    #[test]
    fn json_rows() {
        let report = Report::new(&session(), TimeUnit::Nanoseconds);
        let mut buffer = Vec::new();
        render_json(&report, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["unit"], "ns");
        assert_eq!(value["num_runs"], 5);
        let ch1 = &value["channels"][0];
        assert_eq!(ch1["channel"], "CH1");
        assert!(ch1.get("error").is_none());
        assert_eq!(ch1["pulses"][0]["pulse"], 1);
        assert!((ch1["pulses"][0]["duration"].as_f64().unwrap() - 100_000.0).abs() < 1e-6);
        assert_eq!(ch1["jitter"][0]["rise_std_s"], 0.0);
        let ch2 = &value["channels"][1];
        assert!(ch2["error"].is_string());
        assert_eq!(ch2["pulses"].as_array().map(Vec::len), Some(0));
    }
}
