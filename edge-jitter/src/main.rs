use anyhow::{Result, anyhow};
use clap::Parser;
use edge_jitter::{
    AnalysisConfig, ReportFormat, ReportOptions, SessionAnalysis, ToleranceWrapper,
    analyse_session,
    loader::{find_run_files, load_run_file, write_statistics},
    report::{Report, render_json, render_text},
};
use scope_jitter_common::{ChannelId, TimeUnit, init_tracer};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{error, info, level_filters::LevelFilter};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Glob pattern matching the run files, which are used in sorted order
    #[clap(long, env = "EDGE_JITTER_PATTERN", default_value = "waveform_run*.txt")]
    pattern: String,

    /// Number of runs in the ensemble
    #[clap(long, env = "EDGE_JITTER_RUNS", default_value = "5")]
    runs: usize,

    /// Channels to analyse, in report order
    #[clap(long, env = "EDGE_JITTER_CHANNELS", value_delimiter = ',', default_value = "CH1,CH2,CH3,CH4")]
    channels: Vec<ChannelId>,

    /// Time axis alignment tolerance, of the form: relative,absolute
    #[clap(long, env = "EDGE_JITTER_TOLERANCE", default_value = "1e-5,1e-8")]
    tolerance: ToleranceWrapper,

    /// Accept a single run, all deviations are then zero
    #[clap(long)]
    allow_single_run: bool,

    /// Unit in which times are reported
    #[clap(long, env = "EDGE_JITTER_UNIT", default_value = "us")]
    unit: TimeUnit,

    /// Number of decimal places of reported times
    #[clap(long, env = "EDGE_JITTER_PRECISION", default_value = "2")]
    precision: usize,

    #[clap(long, env = "EDGE_JITTER_FORMAT", default_value = "text")]
    format: ReportFormat,

    /// If set, the sample-wise mean and deviation of each analysed channel
    /// are written to <CHANNEL>_mean_std.txt in this directory
    #[clap(long, env = "EDGE_JITTER_STATISTICS_DIR")]
    statistics_dir: Option<PathBuf>,

    /// Default log level, overridden by RUST_LOG
    #[clap(long, env = "EDGE_JITTER_LOG_LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

fn save_statistics(directory: &Path, analysis: &SessionAnalysis) -> Result<()> {
    std::fs::create_dir_all(directory)?;
    for channel in analysis
        .channels
        .iter()
        .filter_map(|outcome| outcome.result.as_ref().ok())
    {
        let path = directory.join(format!("{}_mean_std.txt", channel.channel));
        let mut writer = BufWriter::new(File::create(&path)?);
        write_statistics(&mut writer, &analysis.time, &channel.channel, &channel.statistics)?;
        writer.flush()?;
        info!("Mean and standard deviation saved to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let _tracer = init_tracer!(args.log_level);

    let config = AnalysisConfig {
        channels: args.channels,
        run_count: args.runs,
        tolerance: args.tolerance.0,
        allow_single_run: args.allow_single_run,
    };
    config.validate()?;

    let runs = find_run_files(&args.pattern, config.run_count)?
        .iter()
        .map(|path| load_run_file(path).map_err(|e| anyhow!("{}: {e}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let analysis = analyse_session(&runs, &config)?;

    if let Some(directory) = &args.statistics_dir {
        save_statistics(directory, &analysis)?;
    }

    let options = ReportOptions {
        unit: args.unit,
        precision: args.precision,
    };
    let report = Report::new(&analysis, options.unit);
    let stdout = std::io::stdout().lock();
    match args.format {
        ReportFormat::Text => render_text(&report, &options, stdout)?,
        ReportFormat::Json => render_json(&report, stdout)?,
    }

    if analysis.num_failed() == analysis.channels.len() {
        error!("No channel could be analysed");
        return Err(anyhow!("all {} channels failed", analysis.channels.len()));
    }
    Ok(())
}
