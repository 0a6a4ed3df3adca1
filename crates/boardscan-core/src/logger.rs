//! Stderr logging for the scan stages.
//!
//! Lines look like `[  0.012s DEBUG locator] accepted quad ...`: seconds since
//! [`init_with_level`] ran, the level, and the last path segment of the
//! record target. With the `tracing` feature, [`init_tracing`] installs an
//! `EnvFilter`-driven subscriber that also reports stage span timings.

use std::fmt::Arguments;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, fmt::format::FmtSpan, util::SubscriberInitExt, EnvFilter};

struct StageLogger {
    level: LevelFilter,
    started: Instant,
}

fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn format_line(elapsed_s: f64, level: Level, target: &str, args: &Arguments<'_>) -> String {
    format!(
        "[{elapsed_s:7.3}s {level:>5} {}] {args}",
        short_target(target)
    )
}

impl Log for StageLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StageLogger> = OnceLock::new();

/// Route `log` records at or above `level` to stderr.
///
/// Only the first call installs the logger; later calls return `Ok(())`
/// and keep the original level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StageLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` fmt subscriber on stderr.
///
/// `RUST_LOG` wins over `default_filter`. `json` switches to flattened JSON
/// events. Does nothing if a global subscriber is already set.
#[cfg(feature = "tracing")]
pub fn init_tracing(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_keeps_last_target_segment() {
        let line = format_line(
            0.5,
            Level::Debug,
            "boardscan_board::locator",
            &format_args!("threshold {}", 200),
        );
        assert_eq!(line, "[  0.500s DEBUG locator] threshold 200");
    }

    #[test]
    fn plain_target_is_kept() {
        let line = format_line(12.0, Level::Info, "boardscan", &format_args!("done"));
        assert_eq!(line, "[ 12.000s  INFO boardscan] done");
    }

    #[test]
    fn second_install_is_a_no_op() {
        assert!(init_with_level(LevelFilter::Warn).is_ok());
        assert!(init_with_level(LevelFilter::Trace).is_ok());
        assert_eq!(LOGGER.get().map(|l| l.level), Some(LevelFilter::Warn));
    }
}
