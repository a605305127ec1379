use crate::ensemble::AlignmentMismatch;
use scope_jitter_common::{ChannelId, Real, RunIndex, SampleIndex};
use std::{io, path::PathBuf};
use thiserror::Error;

/// Invalid time axis, detected when a run is constructed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeAxisError {
    #[error("time at sample {sample} is not finite")]
    NonFinite { sample: SampleIndex },
    #[error("time axis is not strictly increasing at sample {sample}")]
    NotIncreasing { sample: SampleIndex },
    #[error("sample time {0} s must be finite and positive")]
    SampleTime(Real),
}

/// Inconsistent run record, detected when a run is constructed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RunError {
    #[error("channel {channel} has {found} samples, the time axis has {expected}")]
    ChannelLength {
        channel: ChannelId,
        expected: usize,
        found: usize,
    },
    #[error("channel {0} appears more than once")]
    DuplicateChannel(ChannelId),
}

/// Failures of the edge detector on a single voltage sequence.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EdgeError {
    #[error("trace contains no samples")]
    EmptyTrace,
    #[error("trace is flat at {level} V, no threshold can be placed")]
    FlatSignal { level: Real },
    #[error("sample {index} is not a finite voltage")]
    NonFiniteSample { index: SampleIndex },
}

/// Failures pairing the edges of a single voltage sequence into pulses.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PulseError {
    #[error("{rising} rising edges cannot be paired with {falling} falling edges")]
    UnpairedEdges { rising: usize, falling: usize },
    #[error("pulse {pulse} falls at sample {fall} before it rises at sample {rise}")]
    InvertedPulse {
        pulse: usize,
        rise: SampleIndex,
        fall: SampleIndex,
    },
    #[error("edge at sample {index} lies outside a time axis of {len} samples")]
    EdgeOutOfRange { index: SampleIndex, len: usize },
}

/// Failures estimating edge jitter across the runs of an ensemble.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JitterError {
    #[error("edge detection failed on run {run}: {error}")]
    Edge { run: RunIndex, error: EdgeError },
    #[error(
        "run {run} has {rising} rising and {falling} falling edges, expected {expected_rising} and {expected_falling} as in run 0"
    )]
    PulseCountMismatch {
        run: RunIndex,
        expected_rising: usize,
        expected_falling: usize,
        rising: usize,
        falling: usize,
    },
    #[error(transparent)]
    Pulse(#[from] PulseError),
}

/// Failures which abandon the analysis of one channel only.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChannelError {
    #[error("edge detection failed on the mean trace: {0}")]
    MeanTrace(EdgeError),
    #[error(transparent)]
    Pulse(#[from] PulseError),
    #[error(transparent)]
    Jitter(#[from] JitterError),
}

/// Failures which abandon the whole session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("at least {required} runs are required, {found} provided")]
    InsufficientRuns { required: usize, found: usize },
    #[error("{expected} runs are configured, {found} provided")]
    UnexpectedRuns { expected: usize, found: usize },
    #[error("run {run} is not aligned with run 0: {mismatch}")]
    Alignment {
        run: RunIndex,
        mismatch: AlignmentMismatch,
    },
    #[error("run {run} channel {channel} sample {sample} is not a finite voltage")]
    NonFiniteSample {
        run: RunIndex,
        channel: ChannelId,
        sample: SampleIndex,
    },
}

/// Invalid analysis configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("at least one channel must be selected")]
    NoChannels,
    #[error("channel {0} is selected more than once")]
    DuplicateChannel(ChannelId),
    #[error("run count {0} is too small, use at least {1} or allow single runs")]
    RunCount(usize, usize),
    #[error("alignment tolerance ({relative}, {absolute}) must be finite and non-negative")]
    Tolerance { relative: Real, absolute: Real },
}

/// Failures reading, discovering or writing run files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot access {path}: {error}")]
    Io { path: PathBuf, error: io::Error },
    #[error(transparent)]
    Read(#[from] io::Error),
    #[error("run file has no header line")]
    MissingHeader,
    #[error("header must begin with Time(s), found {0}")]
    BadHeader(String),
    #[error("line {line} has {found} columns, expected {expected}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line} column {column}: cannot parse {value} as a number")]
    ParseValue {
        line: usize,
        column: usize,
        value: String,
    },
    #[error(transparent)]
    TimeAxis(#[from] TimeAxisError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
    #[error("expected {expected} files matching {pattern}, found only {found}")]
    MissingRunFiles {
        pattern: String,
        expected: usize,
        found: usize,
    },
}
