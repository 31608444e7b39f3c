//! Concat demuxer list files.
//!
//! FFmpeg's concat demuxer reads a text file of `file '<path>'` lines
//! and joins the inputs without re-encoding. Order in the list file is
//! authoritative, which is exactly the guarantee segment concatenation
//! needs.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::command::FfmpegCommand;
use crate::error::MediaResult;

/// Render a concat demuxer list for the given files, in order.
pub fn concat_list<P: AsRef<Path>>(paths: &[P]) -> String {
    let mut list = String::new();
    for path in paths {
        list.push_str("file '");
        list.push_str(&escape_concat_path(&path.as_ref().to_string_lossy()));
        list.push_str("'\n");
    }
    list
}

/// Write a concat list file into `dir` and return its path.
///
/// The demuxer resolves relative entries against the list file's own
/// directory, not the working directory, so entries are absolutized
/// before writing.
pub async fn write_concat_list<P: AsRef<Path>>(
    dir: &Path,
    name: &str,
    paths: &[P],
) -> MediaResult<PathBuf> {
    let cwd = std::env::current_dir()?;
    let absolute: Vec<PathBuf> = paths
        .iter()
        .map(|p| {
            let p = p.as_ref();
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                cwd.join(p)
            }
        })
        .collect();

    let list_path = dir.join(name);
    fs::write(&list_path, concat_list(&absolute)).await?;
    Ok(list_path)
}

/// Build a stream-copy concat command over a list file.
pub fn concat_copy_command(list_path: &Path, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input_with_args(list_path, ["-f", "concat", "-safe", "0"])
        .output_args(["-c", "copy"])
}

/// Escape a path for a single-quoted concat list entry.
///
/// The demuxer's quoting rule: close the quote, emit an escaped quote,
/// reopen.
fn escape_concat_path(path: &str) -> String {
    path.replace('\'', "'\\''")
}
