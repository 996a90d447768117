//! Atomic file write operations.
//!
//! Output is written to a hidden temporary file in the target directory and
//! then renamed over the target, so a failed run never leaves a half-written
//! output file behind.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use cap_std::fs::{Dir, OpenOptions};

use crate::report::ErrorReporter;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `contents` to `file_name` inside `dir` using a temp file and rename.
///
/// Any existing file at `file_name` is replaced. Cleanup failures after an
/// error are passed to `reporter`; the original error is still returned.
pub(crate) fn write_atomic(
    dir: &Dir,
    file_name: &str,
    contents: &[u8],
    reporter: &dyn ErrorReporter,
) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{}.tmp.{}.{}.{}",
        file_name,
        std::process::id(),
        suffix,
        counter
    );

    write_to_temp_file(dir, &tmp_name, contents, reporter)?;
    rename_temp_to_target(dir, &tmp_name, file_name, reporter)?;
    sync_parent_directory(dir, reporter);

    Ok(())
}

fn write_to_temp_file(
    dir: &Dir,
    tmp_name: &str,
    contents: &[u8],
    reporter: &dyn ErrorReporter,
) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;

    let written = file.write_all(contents).and_then(|()| file.sync_all());
    drop(file);
    if let Err(err) = written {
        remove_temp_file(dir, tmp_name, reporter);
        return Err(err);
    }
    Ok(())
}

fn rename_temp_to_target(
    dir: &Dir,
    tmp_name: &str,
    target_name: &str,
    reporter: &dyn ErrorReporter,
) -> io::Result<()> {
    if let Err(err) = rename_temp_to_target_impl(dir, tmp_name, target_name) {
        remove_temp_file(dir, tmp_name, reporter);
        return Err(err);
    }
    Ok(())
}

#[cfg(windows)]
fn rename_temp_to_target_impl(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists, so remove it first.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_temp_to_target_impl(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn remove_temp_file(dir: &Dir, tmp_name: &str, reporter: &dyn ErrorReporter) {
    if let Err(err) = dir.remove_file(tmp_name) {
        reporter.report_error(&err);
    }
}

fn sync_parent_directory(parent: &Dir, reporter: &dyn ErrorReporter) {
    if let Err(err) = parent.open(".").and_then(|dir| dir.sync_all()) {
        reporter.report_error(&err);
    }
}
