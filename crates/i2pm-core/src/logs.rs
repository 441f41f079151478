// ── Daemon log access ──
//
// Reads the i2pd log directly rather than shelling out to `tail`. Following
// is poll-based: the caller drives `LogFollower::poll` on its own interval.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::CoreError;

/// How often a follower should be polled.
pub const FOLLOW_INTERVAL: Duration = Duration::from_millis(500);

/// First candidate that exists as a regular file.
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Last `lines` lines of the file at `path`.
///
/// Invalid UTF-8 is replaced rather than rejected; log files get truncated
/// mid-write often enough.
pub fn tail(path: &Path, lines: usize) -> Result<Vec<String>, CoreError> {
    let file = File::open(path).map_err(|e| CoreError::fs("open", path, e))?;
    if lines == 0 {
        return Ok(Vec::new());
    }

    let mut reader = BufReader::new(file);
    let mut window: VecDeque<String> = VecDeque::with_capacity(lines.min(4096));
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| CoreError::fs("read", path, e))?;
        if n == 0 {
            break;
        }
        if window.len() == lines {
            window.pop_front();
        }
        window.push_back(trim_newline(&buf));
    }

    Ok(window.into())
}

fn trim_newline(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Streams lines appended to a log file after it was opened.
#[derive(Debug)]
pub struct LogFollower {
    path: PathBuf,
    offset: u64,
    partial: Vec<u8>,
}

impl LogFollower {
    /// Start following at the current end of the file.
    pub fn from_end(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let offset = std::fs::metadata(&path)
            .map_err(|e| CoreError::fs("stat", &path, e))?
            .len();
        Ok(Self {
            path,
            offset,
            partial: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Complete lines written since the last poll. A trailing line without
    /// a newline is held back until it is finished.
    ///
    /// If the file shrank (rotation or truncation) reading restarts from
    /// the beginning.
    pub fn poll(&mut self) -> Result<Vec<String>, CoreError> {
        let mut file = File::open(&self.path).map_err(|e| CoreError::fs("open", &self.path, e))?;
        let len = file
            .metadata()
            .map_err(|e| CoreError::fs("stat", &self.path, e))?
            .len();

        if len < self.offset {
            debug!(path = %self.path.display(), "log truncated, rewinding");
            self.offset = 0;
            self.partial.clear();
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.offset))
            .map_err(|e| CoreError::fs("seek", &self.path, e))?;
        let mut chunk = Vec::new();
        let read = file
            .read_to_end(&mut chunk)
            .map_err(|e| CoreError::fs("read", &self.path, e))?;
        self.offset += u64::try_from(read).unwrap_or(u64::MAX);

        self.partial.extend_from_slice(&chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let rest = self.partial.split_off(pos + 1);
            lines.push(trim_newline(&self.partial));
            self.partial = rest;
        }
        Ok(lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn log_with(lines: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 1..=lines {
            writeln!(file, "line {i}").unwrap();
        }
        file
    }

    #[test]
    fn tail_returns_exactly_the_last_lines() {
        let file = log_with(120);
        let lines = tail(file.path(), 50).unwrap();
        assert_eq!(lines.len(), 50);
        assert_eq!(lines.first().map(String::as_str), Some("line 71"));
        assert_eq!(lines.last().map(String::as_str), Some("line 120"));
    }

    #[test]
    fn tail_of_short_file_is_whole_file() {
        let file = log_with(3);
        assert_eq!(tail(file.path(), 50).unwrap(), vec!["line 1", "line 2", "line 3"]);
    }

    #[test]
    fn tail_zero_lines_is_empty() {
        let file = log_with(3);
        assert!(tail(file.path(), 0).unwrap().is_empty());
    }

    #[test]
    fn tail_keeps_unterminated_last_line_and_strips_crlf() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first\r\nsecond").unwrap();
        assert_eq!(tail(file.path(), 5).unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn missing_file_is_fs_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = tail(&dir.path().join("nope.log"), 5).unwrap_err();
        assert!(matches!(err, CoreError::Fs { action: "open", .. }));
    }

    #[test]
    fn first_existing_skips_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("i2pd.log");
        std::fs::write(&real, "x\n").unwrap();
        let candidates = vec![dir.path().join("missing.log"), dir.path().to_path_buf(), real.clone()];
        assert_eq!(first_existing(&candidates), Some(real));
        assert_eq!(first_existing(&candidates[..2]), None);
    }

    #[test]
    fn follower_sees_only_appended_complete_lines() {
        let mut file = log_with(2);
        let mut follower = LogFollower::from_end(file.path()).unwrap();
        assert!(follower.poll().unwrap().is_empty());

        write!(file, "third\nfour").unwrap();
        file.flush().unwrap();
        assert_eq!(follower.poll().unwrap(), vec!["third"]);

        writeln!(file, "th").unwrap();
        file.flush().unwrap();
        assert_eq!(follower.poll().unwrap(), vec!["fourth"]);
    }

    #[test]
    fn follower_rewinds_after_truncation() {
        let file = log_with(5);
        let mut follower = LogFollower::from_end(file.path()).unwrap();
        std::fs::write(file.path(), "fresh\n").unwrap();
        assert_eq!(follower.poll().unwrap(), vec!["fresh"]);
    }
}
