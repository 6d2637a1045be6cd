use parking_lot::Mutex;
/// Logging bridge for evidence-panel
///
/// Routes every `log::info!()` etc. from this crate and the library crates
/// into one debug file, `evidence_panel_debug.log` in the system temp
/// directory. Output never goes to stdout, which the CLI uses for results.
///
/// Level precedence: `--log-level` flag, then `RUST_LOG`, then
/// `DEBUG_LEVEL` (0-4). When `RUST_LOG` is set, lines are mirrored to stderr.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Self {
        if let Ok(val) = std::env::var("RUST_LOG") {
            return Self::from_name(&val).unwrap_or(DebugLevel::Info);
        }
        match std::env::var("DEBUG_LEVEL") {
            Ok(val) => match val.trim().parse::<u8>() {
                Ok(1) => DebugLevel::Error,
                Ok(2) => DebugLevel::Info,
                Ok(3) => DebugLevel::Debug,
                Ok(4) => DebugLevel::Trace,
                _ => DebugLevel::Off,
            },
            Err(_) => DebugLevel::Off,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "off" => Some(DebugLevel::Off),
            "error" | "warn" => Some(DebugLevel::Error),
            "info" => Some(DebugLevel::Info),
            "debug" => Some(DebugLevel::Debug),
            "trace" => Some(DebugLevel::Trace),
            _ => None,
        }
    }

    fn to_filter(self) -> log::LevelFilter {
        match self {
            DebugLevel::Off => log::LevelFilter::Off,
            DebugLevel::Error => log::LevelFilter::Warn,
            DebugLevel::Info => log::LevelFilter::Info,
            DebugLevel::Debug => log::LevelFilter::Debug,
            DebugLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Global debug logger
struct DebugLogger {
    file: Mutex<Option<std::fs::File>>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(level: DebugLevel) -> Self {
        let file = if level != DebugLevel::Off {
            match OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
            {
                Ok(mut f) => {
                    let _ = writeln!(
                        f,
                        "{}\nevidence-panel debug session started at {} (level={:?})\n{}",
                        "=".repeat(80),
                        get_timestamp(),
                        level,
                        "=".repeat(80)
                    );
                    Some(f)
                }
                // A missing log file must never stop the host
                Err(_) => None,
            }
        } else {
            None
        };

        DebugLogger {
            file: Mutex::new(file),
            mirror_stderr: std::env::var_os("RUST_LOG").is_some(),
        }
    }
}

impl log::Log for DebugLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("evidence_panel_debug.log")
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Install the logger. Later calls are no-ops.
pub fn init_log_bridge(cli_level: Option<DebugLevel>) {
    let level = cli_level.unwrap_or_else(DebugLevel::from_env);
    let logger = LOGGER.get_or_init(|| DebugLogger::new(level));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level.to_filter());
    }
}
