//! Logger setup: env_logger writing to stdout, optionally teed to a file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Console writer that copies every write to a log file with ANSI codes
/// stripped.
struct TeeWriter {
    console: io::Stdout,
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

pub(crate) fn level_filter(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger.
///
/// Info messages are printed as-is so commands can use `log::info!` for
/// their normal output. `RUST_LOG` still overrides the level.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let file = logfile.map(File::create).transpose()?;

    let mut builder = Builder::new();
    builder
        .filter_level(level_filter(quiet, verbose))
        // HTTP internals are noisy at debug level.
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("rustls", LevelFilter::Warn)
        .parse_default_env()
        .target(Target::Pipe(Box::new(TeeWriter {
            console: io::stdout(),
            file,
        })))
        .format(move |buf, record| {
            if verbose {
                write!(buf, "{} ", chrono::Local::now().format("%H:%M:%S%.3f"))?;
            }
            match record.level() {
                Level::Error => writeln!(
                    buf,
                    "{} {}",
                    "error:".if_supports_color(Stdout, |t| t.red()),
                    record.args()
                ),
                Level::Warn => writeln!(
                    buf,
                    "{} {}",
                    "warning:".if_supports_color(Stdout, |t| t.yellow()),
                    record.args()
                ),
                Level::Info => writeln!(buf, "{}", record.args()),
                level => writeln!(
                    buf,
                    "{} {}",
                    level.as_str().to_lowercase().if_supports_color(Stdout, |t| t.dimmed()),
                    record.args()
                ),
            }
        });

    builder
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}
