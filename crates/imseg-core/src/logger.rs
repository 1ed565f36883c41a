//! Stderr logging for the command line.
//!
//! Records from the `imseg*` crates pass at the configured level; records from
//! other crates (image decoders and the like) are capped at
//! [`LogConfig::foreign_level`] so `-vv` stays readable. Lines look like
//! `[  0.012s  INFO imseg_threshold::otsu] message`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Crate-name prefix of everything logged by this workspace.
const OWN_TARGET_PREFIX: &str = "imseg";

/// Targets matched by [`OWN_TARGET_PREFIX`], spelled out for `EnvFilter`.
const OWN_CRATES: [&str; 5] = [
    "imseg",
    "imseg_core",
    "imseg_threshold",
    "imseg_cluster",
    "imseg_texture",
];

/// Level policy of the stderr logger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// Level for the `imseg*` crates.
    pub level: LevelFilter,
    /// Cap for every other target.
    pub foreign_level: LevelFilter,
}

impl LogConfig {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            foreign_level: level.min(LevelFilter::Warn),
        }
    }

    fn is_own(target: &str) -> bool {
        target.starts_with(OWN_TARGET_PREFIX)
    }

    /// Effective level for one log target.
    pub fn level_for(&self, target: &str) -> LevelFilter {
        if Self::is_own(target) {
            self.level
        } else {
            self.foreign_level
        }
    }

    /// The same policy as an `EnvFilter` directive string, e.g.
    /// `warn,imseg=debug,imseg_core=debug,...`.
    pub fn directive(&self) -> String {
        let level = self.level.to_string().to_lowercase();
        let mut out = self.foreign_level.to_string().to_lowercase();
        for name in OWN_CRATES {
            out.push_str(&format!(",{name}={level}"));
        }
        out
    }
}

struct StderrLogger {
    config: LogConfig,
    started: Instant,
}

fn write_record(out: &mut impl Write, elapsed_s: f64, record: &Record) -> std::io::Result<()> {
    writeln!(
        out,
        "[{:7.3}s {:>5} {}] {}",
        elapsed_s,
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.config.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let elapsed = self.started.elapsed().as_secs_f64();
            let _ = write_record(&mut std::io::stderr().lock(), elapsed, record);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger. Later calls are no-ops.
pub fn init(config: LogConfig) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        config,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(config.level.max(config.foreign_level));
    Ok(())
}

/// [`init`] with other crates capped at `warn`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    init(LogConfig::new(level))
}

/// Map a `-v` count to a level: 0 → info, 1 → debug, 2+ → trace.
pub fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init_from_verbosity(verbose: u8) -> Result<(), log::SetLoggerError> {
    init_with_level(level_from_verbosity(verbose))
}

/// Install a `tracing` subscriber. `RUST_LOG` wins when set; otherwise the
/// filter follows [`LogConfig::directive`] for `level`.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LogConfig::new(level).directive()));
    let builder = fmt().with_env_filter(filter).with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
