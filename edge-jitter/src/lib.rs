//! Pulse timing analysis of repeated oscilloscope captures.
//!
//! A session is an ensemble of runs sharing one time axis. For each channel the
//! sample-wise mean trace gives the pulse durations, and edge detection on every
//! individual run gives the run-to-run spread (jitter) of each pulse edge.
pub mod channels;
pub mod ensemble;
pub mod error;
pub mod jitter;
pub mod loader;
pub mod parameters;
pub mod processing;
pub mod pulse;
pub mod pulse_detection;
pub mod report;
pub mod run;
pub mod statistics;

pub use channels::{ChannelAnalysis, analyse_channel};
pub use ensemble::{AlignedSession, AlignmentTolerance, Ensemble, align_runs};
pub use jitter::{JitterRecord, estimate_jitter};
pub use parameters::{AnalysisConfig, ReportFormat, ReportOptions, ToleranceWrapper};
pub use processing::{ChannelOutcome, SessionAnalysis, analyse_session};
pub use pulse::{Pulse, pair_pulses};
pub use pulse_detection::{EdgeSet, detect_edges};
pub use run::{ChannelTrace, Run, TimeAxis};
pub use statistics::{EnsembleStatistics, aggregate};
