//! Structured logging for the cave core
//!
//! `tracing` events are emitted throughout the pipeline; this module owns the
//! subscriber side:
//! - one-shot subscriber installation shared by the CLI, FFI hosts and tests
//! - default filter directives per crate area, overridable with `RUST_LOG`
//! - `PhaseTimer`, a span guard that reports how long a pipeline phase took

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use bevy::app::{App, Plugin};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Installs the subscriber when added to a Bevy app
#[derive(Default)]
pub struct LoggingPlugin {
    pub settings: LogSettings,
}

impl Plugin for LoggingPlugin {
    fn build(&self, _app: &mut App) {
        init_tracing(&self.settings);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Level from a CLI verbosity count: 0 = warn, 1 = info, 2 = debug, 3+ = trace
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// A `target=level` filter directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub target: String,
    pub level: LogLevel,
}

impl Directive {
    pub fn new(target: &str, level: LogLevel) -> Self {
        Self {
            target: target.to_string(),
            level,
        }
    }
}

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Level for everything not matched by a directive
    pub level: LogLevel,
    pub directives: Vec<Directive>,
    pub show_targets: bool,
    pub ansi: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            directives: vec![
                // Hosts poll the bridge at frame rate; keep it quiet
                Directive::new("cave_core::bridge", LogLevel::Warn),
                Directive::new("cave_core::generation", LogLevel::Info),
                Directive::new("cave_core::hotreload", LogLevel::Info),
            ],
            show_targets: true,
            ansi: true,
        }
    }
}

impl LogSettings {
    /// Default directive targets, all pinned to `level`
    pub fn with_level(level: LogLevel) -> Self {
        let mut settings = Self {
            level,
            ..Self::default()
        };
        for directive in &mut settings.directives {
            directive.level = level;
        }
        settings
    }

    /// Comma-separated `EnvFilter` syntax, base level first
    pub fn filter_string(&self) -> String {
        std::iter::once(self.level.to_string())
            .chain(
                self.directives
                    .iter()
                    .map(|d| format!("{}={}", d.target, d.level)),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.filter_string()))
    }
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install a stderr subscriber. Only the first call has any effect; returns
/// whether this call was it. A subscriber set by the host stays in place.
pub fn init_tracing(settings: &LogSettings) -> bool {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }

    tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_target(settings.show_targets)
        .with_ansi(settings.ansi)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .is_ok()
}

pub fn init_tracing_default() -> bool {
    init_tracing(&LogSettings::default())
}

/// Enters a `phase` span and logs its duration at debug level when dropped
pub struct PhaseTimer {
    name: &'static str,
    started: Instant,
    _span: tracing::span::EnteredSpan,
}

impl PhaseTimer {
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            started: Instant::now(),
            _span: tracing::debug_span!("phase", name).entered(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        debug!(phase = self.name, elapsed_ms = self.elapsed_ms(), "phase finished");
    }
}
