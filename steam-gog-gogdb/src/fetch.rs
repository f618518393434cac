//! Download and unpack the latest GOGDB product backup.
//!
//! The backup index lists monthly directories (`2024-03/`), each holding
//! daily archives (`gogdb_2024-03-01.tar.xz`). The newest archive is
//! downloaded to a `.part` file and unpacked into a `.partial` directory;
//! both are renamed into place only once complete, so an interrupted fetch
//! never leaves something that looks like a valid dump root.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use regex::Regex;

use crate::dump::is_valid_dump_root;
use crate::error::GogdbError;

pub const BACKUP_INDEX_URL: &str = "https://www.gogdb.org/backups_v3/products/";

const USER_AGENT: &str = concat!("steam-gog/", env!("CARGO_PKG_VERSION"));
const ARCHIVE_SUFFIX: &str = ".tar.xz";

/// Progress callbacks for a fetch. All methods default to no-ops.
pub trait DownloadProgress {
    /// A new phase started ("Resolving", "Downloading", "Unpacking").
    fn on_phase(&self, _message: &str) {}
    /// Download started; `total_bytes` is known when the server sends a length.
    fn on_download_start(&self, _total_bytes: Option<u64>) {}
    /// Bytes received so far.
    fn on_download_progress(&self, _bytes: u64) {}
    /// Archive entries unpacked so far.
    fn on_unpack_progress(&self, _entries: u64) {}
    fn on_complete(&self) {}
}

/// No-op progress implementation.
pub struct NoDownloadProgress;

impl DownloadProgress for NoDownloadProgress {}

/// Options for [`fetch_latest_dump`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Directory that receives the archive and the unpacked dump root.
    pub dest_dir: PathBuf,
    pub index_url: String,
    /// Total attempts per HTTP request.
    pub attempts: u32,
    /// Delay before the first retry; later retries wait proportionally longer.
    pub retry_delay: Duration,
    /// Keep the `.tar.xz` after a successful unpack.
    pub keep_archive: bool,
}

impl FetchOptions {
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            index_url: BACKUP_INDEX_URL.to_string(),
            attempts: 3,
            retry_delay: Duration::from_secs(2),
            keep_archive: false,
        }
    }
}

/// Fetch the newest backup and return its unpacked dump root.
///
/// If that dump is already unpacked and valid under `dest_dir`, nothing is
/// downloaded.
pub fn fetch_latest_dump(
    options: &FetchOptions,
    progress: &dyn DownloadProgress,
) -> Result<PathBuf, GogdbError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(30))
        .timeout(None)
        .build()
        .map_err(|e| GogdbError::download(format!("Failed to build HTTP client: {e}")))?;

    progress.on_phase("Resolving latest backup");
    let archive_url = resolve_latest_archive(&client, options)?;
    let archive_name = last_segment(&archive_url).to_string();
    let root_name = archive_name
        .strip_suffix(ARCHIVE_SUFFIX)
        .unwrap_or(&archive_name)
        .to_string();
    log::info!("Latest GOGDB backup: {archive_url}");

    fs::create_dir_all(&options.dest_dir)?;
    let dest_root = options.dest_dir.join(&root_name);
    if is_valid_dump_root(&dest_root) {
        log::info!("{} is already unpacked", dest_root.display());
        progress.on_complete();
        return Ok(dest_root);
    }

    let archive_path = options.dest_dir.join(&archive_name);
    if archive_path.is_file() {
        log::info!("Using existing archive {}", archive_path.display());
    } else {
        progress.on_phase("Downloading");
        with_retries(options, "Download", || {
            download_to(&client, &archive_url, &archive_path, progress)
        })?;
    }

    progress.on_phase("Unpacking");
    unpack_dump(&archive_path, &dest_root, progress)?;

    if !options.keep_archive {
        fs::remove_file(&archive_path)?;
    }
    progress.on_complete();
    Ok(dest_root)
}

fn resolve_latest_archive(
    client: &reqwest::blocking::Client,
    options: &FetchOptions,
) -> Result<String, GogdbError> {
    let index_url = with_trailing_slash(&options.index_url);
    let index = with_retries(options, "Backup index request", || get_text(client, &index_url))?;
    let month = latest_month(&listing_links(&index)?)
        .ok_or_else(|| GogdbError::download(format!("No monthly backups listed at {index_url}")))?;

    let month_url = format!("{index_url}{month}");
    let listing = with_retries(options, "Backup listing request", || get_text(client, &month_url))?;
    let archive = latest_archive(&listing_links(&listing)?)
        .ok_or_else(|| GogdbError::download(format!("No dump archives listed at {month_url}")))?;

    Ok(format!("{month_url}{archive}"))
}

/// Extract the final path segment of every `href` in an HTML listing.
///
/// Directory links keep their trailing slash.
pub fn listing_links(html: &str) -> Result<Vec<String>, GogdbError> {
    let href = Regex::new(r#"href="([^"?#]+)""#)
        .map_err(|e| GogdbError::download(format!("Bad link pattern: {e}")))?;
    Ok(href
        .captures_iter(html)
        .filter_map(|cap| {
            let link = cap.get(1)?.as_str();
            let is_dir = link.ends_with('/');
            let name = last_segment(link);
            if name.is_empty() {
                return None;
            }
            Some(if is_dir { format!("{name}/") } else { name.to_string() })
        })
        .collect())
}

/// Newest monthly directory (`YYYY-MM/`) in a listing.
pub fn latest_month(links: &[String]) -> Option<String> {
    links
        .iter()
        .filter(|link| is_month_dir(link))
        .max()
        .cloned()
}

/// Newest `gogdb_YYYY-MM-DD.tar.xz` in a listing.
pub fn latest_archive(links: &[String]) -> Option<String> {
    links
        .iter()
        .filter(|link| {
            link.strip_suffix(ARCHIVE_SUFFIX)
                .and_then(crate::dump::dump_date)
                .is_some()
        })
        .max()
        .cloned()
}

fn is_month_dir(link: &str) -> bool {
    let Some(month) = link.strip_suffix('/') else {
        return false;
    };
    let bytes = month.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && matches!(month[5..].parse::<u8>(), Ok(1..=12))
}

fn last_segment(link: &str) -> &str {
    link.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

fn get_text(client: &reqwest::blocking::Client, url: &str) -> Result<String, GogdbError> {
    let response = client
        .get(url)
        .timeout(Duration::from_secs(30))
        .send()
        .map_err(|e| GogdbError::download(format!("GET {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(GogdbError::download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }
    response
        .text()
        .map_err(|e| GogdbError::download(format!("Failed to read {url}: {e}")))
}

fn download_to(
    client: &reqwest::blocking::Client,
    url: &str,
    dest: &Path,
    progress: &dyn DownloadProgress,
) -> Result<(), GogdbError> {
    let mut response = client
        .get(url)
        .send()
        .map_err(|e| GogdbError::download(format!("GET {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(GogdbError::download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }
    progress.on_download_start(response.content_length());

    let part = dest.with_extension("xz.part");
    let mut file = BufWriter::new(File::create(&part)?);
    let mut buf = vec![0u8; 64 * 1024];
    let mut received: u64 = 0;
    loop {
        let n = response
            .read(&mut buf)
            .map_err(|e| GogdbError::download(format!("Connection lost while downloading {url}: {e}")))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])?;
        received += n as u64;
        progress.on_download_progress(received);
    }
    file.flush()?;
    drop(file);

    match response.content_length() {
        Some(expected) if expected != received => {
            return Err(GogdbError::download(format!(
                "Truncated download of {url}: {received} of {expected} bytes"
            )));
        }
        _ => {}
    }

    fs::rename(&part, dest)?;
    log::debug!("Downloaded {received} bytes to {}", dest.display());
    Ok(())
}

/// Unpack a `.tar.xz` dump archive into `dest_root`.
///
/// Archives may hold `products/` at the top level or inside a directory
/// named like the dump; either way `dest_root/products` is the result.
pub fn unpack_dump(
    archive: &Path,
    dest_root: &Path,
    progress: &dyn DownloadProgress,
) -> Result<(), GogdbError> {
    let partial = dest_root.with_extension("partial");
    if partial.exists() {
        fs::remove_dir_all(&partial)?;
    }
    fs::create_dir_all(&partial)?;

    let decoder = xz2::read::XzDecoder::new(BufReader::new(File::open(archive)?));
    let mut tar = tar::Archive::new(decoder);
    let mut unpacked: u64 = 0;
    let entries = tar
        .entries()
        .map_err(|e| GogdbError::archive(format!("Failed to read {}: {e}", archive.display())))?;
    for entry in entries {
        let mut entry = entry
            .map_err(|e| GogdbError::archive(format!("Corrupt entry in {}: {e}", archive.display())))?;
        let inside = entry
            .unpack_in(&partial)
            .map_err(|e| GogdbError::archive(format!("Failed to unpack {}: {e}", archive.display())))?;
        if !inside {
            log::warn!("Skipping archive entry outside the dump directory");
        }
        unpacked += 1;
        progress.on_unpack_progress(unpacked);
    }

    let nested = dest_root
        .file_name()
        .map(|name| partial.join(name))
        .filter(|inner| inner.join("products").is_dir() && !partial.join("products").is_dir());
    let unpacked_root = nested.unwrap_or_else(|| partial.clone());
    if !is_valid_dump_root(&unpacked_root) {
        return Err(GogdbError::invalid_dump(format!(
            "{} contains no products/<id>/product.json",
            archive.display()
        )));
    }

    if dest_root.exists() {
        fs::remove_dir_all(dest_root)?;
    }
    fs::rename(&unpacked_root, dest_root)?;
    if partial.exists() {
        fs::remove_dir_all(&partial)?;
    }
    log::info!("Unpacked {unpacked} entries into {}", dest_root.display());
    Ok(())
}

fn with_retries<T>(
    options: &FetchOptions,
    what: &str,
    mut op: impl FnMut() -> Result<T, GogdbError>,
) -> Result<T, GogdbError> {
    let attempts = options.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e @ GogdbError::Download(_)) if attempt < attempts => {
                let delay = options.retry_delay * attempt;
                log::warn!(
                    "{what} failed (attempt {attempt}/{attempts}): {e}; retrying in {}s",
                    delay.as_secs()
                );
                thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
