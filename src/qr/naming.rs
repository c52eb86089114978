//! Collision-free output file names

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Return `dir/base_YYYYMMDD.ext`, or the first free `dir/base_YYYYMMDD_N.ext`.
///
/// The check and the later write are not atomic; two concurrent runs may pick
/// the same name.
pub fn unique_path(base: &str, dir: &Path, ext: &str, date: NaiveDate) -> PathBuf {
    let stamp = date.format("%Y%m%d");
    let ext = ext.trim_start_matches('.');

    let mut counter: u64 = 0;
    loop {
        let file_name = if counter == 0 {
            format!("{base}_{stamp}.{ext}")
        } else {
            format!("{base}_{stamp}_{counter}.{ext}")
        };
        let candidate = dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// [`unique_path`] keyed on the local calendar date.
pub fn unique_path_today(base: &str, dir: &Path, ext: &str) -> PathBuf {
    unique_path(base, dir, ext, Local::now().date_naive())
}
