pub mod tracer;
pub mod units;

pub use units::TimeUnit;

/// Times (seconds) and voltages (volts) are processed in double precision throughout.
pub type Real = f64;

/// Position of a sample within a captured run.
pub type SampleIndex = usize;

/// Position of a run within an ensemble, in load order.
pub type RunIndex = usize;

/// Oscilloscope channel identifier, e.g. `CH1`.
pub type ChannelId = String;

pub const SCOPE_CHANNELS: [&str; 4] = ["CH1", "CH2", "CH3", "CH4"];

/// The minimum ensemble size for which run-to-run statistics are meaningful.
pub const MIN_ENSEMBLE_RUNS: usize = 2;
