mod channel_trace;
mod noise;
mod simulation;

use anyhow::Result;
use channel_trace::PulseTemplateWrapper;
use clap::Parser;
use edge_jitter::loader::write_run;
use rand::{SeedableRng, rngs::StdRng};
use scope_jitter_common::{ChannelId, Real, init_tracer};
use simulation::{SimulationConfig, Simulator};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::{debug, info, level_filters::LevelFilter};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Directory in which run files are written
    #[clap(long, env = "SCOPE_SIMULATOR_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Run files are named <FILE_PREFIX><RUN>.txt, runs being numbered from 01
    #[clap(long, env = "SCOPE_SIMULATOR_FILE_PREFIX", default_value = "waveform_run")]
    file_prefix: String,

    #[clap(long, default_value = "5")]
    runs: usize,

    /// Number of samples per run
    #[clap(long, default_value = "4096")]
    samples: usize,

    /// Time between samples, in seconds
    #[clap(long, default_value = "1e-9")]
    sample_time: Real,

    #[clap(long, value_delimiter = ',', default_value = "CH1,CH2,CH3,CH4")]
    channels: Vec<ChannelId>,

    /// Nominal pulse, of the form: start,width (in samples). May be repeated
    #[clap(long = "pulse", default_value = "1000,100")]
    pulses: Vec<PulseTemplateWrapper>,

    /// Voltage of the low state
    #[clap(long, default_value = "0.0")]
    low: Real,

    /// Voltage of the high state
    #[clap(long, default_value = "3.3")]
    high: Real,

    /// Standard deviation of rising edge positions, in samples
    #[clap(long, default_value = "0.0")]
    rise_jitter: Real,

    /// Standard deviation of falling edge positions, in samples
    #[clap(long, default_value = "0.0")]
    fall_jitter: Real,

    /// Amplitude of uniform voltage noise
    #[clap(long, default_value = "0.0")]
    noise: Real,

    /// If set, noise is low pass filtered with this weight given to each new sample
    #[clap(long)]
    smooth_noise: Option<Real>,

    /// Seed of the random number generator, random if not given
    #[clap(long, env = "SCOPE_SIMULATOR_SEED")]
    seed: Option<u64>,

    #[clap(long, env = "SCOPE_SIMULATOR_LOG_LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let _tracer = init_tracer!(args.log_level);

    let simulator = Simulator::new(SimulationConfig {
        samples: args.samples,
        sample_time: args.sample_time,
        channels: args.channels,
        pulses: args.pulses.iter().map(|PulseTemplateWrapper(template)| *template).collect(),
        low: args.low,
        high: args.high,
        rise_jitter: args.rise_jitter,
        fall_jitter: args.fall_jitter,
        noise: args.noise,
        smoothing_factor: args.smooth_noise,
    })?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    std::fs::create_dir_all(&args.output_dir)?;
    for run in 1..=args.runs {
        let path = args
            .output_dir
            .join(format!("{}{run:02}.txt", args.file_prefix));
        debug!("Capturing run {run}");
        let mut writer = BufWriter::new(File::create(&path)?);
        write_run(&mut writer, &simulator.run(&mut rng)?)?;
        writer.flush()?;
        info!("Saved: {}", path.display());
    }
    Ok(())
}
