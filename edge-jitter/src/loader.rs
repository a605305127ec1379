//! Tab separated run files as written by the acquisition tool:
//!
//! ```text
//! Time(s)	CH1(V)	CH2(V)
//! 0.000000000e+00	0.000000	3.300000
//! 1.000000000e-09	0.000000	3.300000
//! ```
use crate::{
    error::LoadError,
    run::{ChannelTrace, Run, TimeAxis},
    statistics::EnsembleStatistics,
};
use itertools::Itertools;
use scope_jitter_common::Real;
use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

const TIME_COLUMN: &str = "Time(s)";
const VOLTAGE_SUFFIX: &str = "(V)";
const TIME_PRECISION: usize = 9;
const STATISTICS_TIME_PRECISION: usize = 10;

/// Formats `value` in scientific notation as C's `%.*e` does, with an explicitly
/// signed exponent of at least two digits, e.g. `1.000000000e-09`.
pub fn format_scientific(value: Real, precision: usize) -> String {
    let formatted = format!("{value:.precision$e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

fn parse_value(value: &str, line: usize, column: usize) -> Result<Real, LoadError> {
    value.parse().map_err(|_| LoadError::ParseValue {
        line,
        column,
        value: value.to_owned(),
    })
}

/// Reads one run. Channel columns named `CH1(V)` are stored as `CH1`.
pub fn read_run<R: BufRead>(reader: R) -> Result<Run, LoadError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|line| (i + 1, line)));

    let header = loop {
        match lines.next().transpose()? {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => return Err(LoadError::MissingHeader),
        }
    };
    let mut columns = header.split_whitespace();
    if columns.next() != Some(TIME_COLUMN) {
        return Err(LoadError::BadHeader(header.trim().to_owned()));
    }
    let channels: Vec<_> = columns
        .map(|name| name.strip_suffix(VOLTAGE_SUFFIX).unwrap_or(name).to_owned())
        .collect();

    let mut times = Vec::new();
    let mut voltages = vec![Vec::new(); channels.len()];
    for line in lines {
        let (line, text) = line?;
        if text.trim().is_empty() {
            continue;
        }
        let values: Vec<_> = text.split_whitespace().collect();
        if values.len() != channels.len() + 1 {
            return Err(LoadError::ColumnCount {
                line,
                expected: channels.len() + 1,
                found: values.len(),
            });
        }
        for (column, value) in values.into_iter().enumerate() {
            let value = parse_value(value, line, column + 1)?;
            match column.checked_sub(1) {
                None => times.push(value),
                Some(channel) => {
                    if let Some(voltage) = voltages.get_mut(channel) {
                        voltage.push(value);
                    }
                }
            }
        }
    }

    let time = TimeAxis::new(times)?;
    let traces = channels
        .into_iter()
        .zip(voltages)
        .map(|(channel, voltage)| ChannelTrace::new(channel, voltage))
        .collect();
    Ok(Run::new(time, traces)?)
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_run_file(path: &Path) -> Result<Run, LoadError> {
    let file = File::open(path).map_err(|error| LoadError::Io {
        path: path.to_owned(),
        error,
    })?;
    let run = read_run(BufReader::new(file))?;
    debug!(
        "Loaded {} samples of channels {}",
        run.num_samples(),
        run.channel_ids().join(",")
    );
    Ok(run)
}

/// Writes `run` in the format read by [read_run].
pub fn write_run<W: Write>(mut writer: W, run: &Run) -> Result<(), LoadError> {
    let header = run
        .channel_ids()
        .map(|channel| format!("{channel}{VOLTAGE_SUFFIX}"));
    writeln!(
        writer,
        "{}",
        std::iter::once(TIME_COLUMN.to_owned()).chain(header).join("\t")
    )?;
    for (sample, time) in run.time().iter().enumerate() {
        let voltages = run
            .channels()
            .iter()
            .filter_map(|trace| trace.voltage.get(sample))
            .map(|voltage| format!("{voltage:.6}"));
        writeln!(
            writer,
            "{}",
            std::iter::once(format_scientific(*time, TIME_PRECISION))
                .chain(voltages)
                .join("\t")
        )?;
    }
    Ok(())
}

/// Writes the sample-wise mean and deviation of one channel.
pub fn write_statistics<W: Write>(
    mut writer: W,
    time: &TimeAxis,
    channel: &str,
    statistics: &EnsembleStatistics,
) -> Result<(), LoadError> {
    writeln!(writer, "{TIME_COLUMN}\t{channel}_Mean(V)\t{channel}_Std(V)")?;
    for ((time, mean), std_dev) in time
        .iter()
        .zip(&statistics.mean)
        .zip(&statistics.std_dev)
    {
        writeln!(
            writer,
            "{}\t{mean:.6}\t{std_dev:.6}",
            format_scientific(*time, STATISTICS_TIME_PRECISION)
        )?;
    }
    Ok(())
}

/// The first `count` files matching `pattern`, in lexicographic order.
pub fn find_run_files(pattern: &str, count: usize) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    if paths.len() < count {
        return Err(LoadError::MissingRunFiles {
            pattern: pattern.to_owned(),
            expected: count,
            found: paths.len(),
        });
    }
    paths.truncate(count);
    info!("Using {count} run files matching {pattern}");
    Ok(paths)
}
