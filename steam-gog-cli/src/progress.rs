//! Terminal progress for long-running library calls.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use steam_gog_gogdb::DownloadProgress;
use steam_gog_import::{ImportProgress, LogProgress};

pub(crate) fn spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A bar when stderr is a terminal, periodic log lines otherwise.
pub(crate) fn import_progress(quiet: bool) -> Box<dyn ImportProgress> {
    if quiet || std::io::stderr().is_terminal() {
        Box::new(BarProgress::new(quiet))
    } else {
        Box::new(LogProgress::default())
    }
}

/// Item progress bar for indexing, importing and matching.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::with_template(
                    "  {bar:40.cyan/blue} {pos:>7}/{len:7} {wide_msg}",
                )
                .expect("static pattern")
                .progress_chars("=> "),
            );
            pb
        };
        Self { bar }
    }
}

impl ImportProgress for BarProgress {
    fn on_item(&self, current: usize, total: usize, name: &str) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
        }
        self.bar.set_position(current as u64);
        self.bar.set_message(name.to_string());
    }

    fn on_phase(&self, message: &str) {
        self.bar.suspend(|| log::info!("{}", message));
    }

    fn on_complete(&self, message: &str) {
        self.bar.finish_and_clear();
        log::info!("{}", message);
    }
}

/// Byte progress for the dump download, then an entry counter for unpacking.
pub(crate) struct FetchProgress {
    download: ProgressBar,
    unpack: ProgressBar,
    unpacking: AtomicBool,
    quiet: bool,
}

impl FetchProgress {
    pub(crate) fn new(quiet: bool) -> Self {
        Self {
            download: ProgressBar::hidden(),
            unpack: ProgressBar::hidden(),
            unpacking: AtomicBool::new(false),
            quiet,
        }
    }
}

impl DownloadProgress for FetchProgress {
    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_download_start(&self, total_bytes: Option<u64>) {
        if self.quiet {
            return;
        }
        let style = match total_bytes {
            Some(total) => {
                self.download.set_length(total);
                ProgressStyle::with_template(
                    "  {bar:40.cyan/blue} {bytes:>10}/{total_bytes:10} {bytes_per_sec} eta {eta}",
                )
            }
            None => ProgressStyle::with_template("  {spinner:.cyan} {bytes} {bytes_per_sec}"),
        };
        self.download
            .set_style(style.expect("static pattern").progress_chars("=> "));
        self.download.set_draw_target(ProgressDrawTarget::stderr());
    }

    fn on_download_progress(&self, bytes: u64) {
        self.download.set_position(bytes);
    }

    fn on_unpack_progress(&self, entries: u64) {
        if self.quiet {
            return;
        }
        if !self.unpacking.swap(true, Ordering::Relaxed) {
            self.download.finish_and_clear();
            self.unpack.set_style(
                ProgressStyle::with_template("  {spinner:.cyan} {pos} entries unpacked")
                    .expect("static pattern")
                    .tick_chars("/-\\|"),
            );
            self.unpack.set_draw_target(ProgressDrawTarget::stderr());
        }
        self.unpack.set_position(entries);
    }

    fn on_complete(&self) {
        self.download.finish_and_clear();
        self.unpack.finish_and_clear();
    }
}
