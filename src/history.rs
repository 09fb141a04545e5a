use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("repository path {0} is not a directory")]
    RepoNotFound(PathBuf),
    #[error("failed to run `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`git log` failed in {repo} ({status}): {stderr}")]
    Failed {
        repo: PathBuf,
        status: String,
        stderr: String,
    },
    #[error("`git log` output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Source of per-commit dates for a repository, one `YYYY-MM-DD` string per commit.
pub trait HistoryReader {
    fn read_dates(&self, repo: &Path, since: &str, until: &str) -> Result<Vec<String>, HistoryError>;
}

/// Reads dates by shelling out to the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn log_args<'a>(since: &'a str, until: &'a str) -> [&'a str; 8] {
        [
            "log",
            "--no-merges",
            "--date=short",
            "--pretty=format:%ad",
            "--since",
            since,
            "--until",
            until,
        ]
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryReader for GitCli {
    fn read_dates(&self, repo: &Path, since: &str, until: &str) -> Result<Vec<String>, HistoryError> {
        if !repo.is_dir() {
            return Err(HistoryError::RepoNotFound(repo.to_path_buf()));
        }
        tracing::debug!(repo = %repo.display(), since, until, "running git log");
        let output = Command::new(&self.program)
            .args(Self::log_args(since, until))
            .current_dir(repo)
            .output()
            .map_err(|source| HistoryError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(HistoryError::Failed {
                repo: repo.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)?;
        Ok(parse_log_output(&stdout))
    }
}

/// Splits line-oriented log output into dates, dropping blank lines.
pub fn parse_log_output(output: &str) -> Vec<String> {
    output
        .replace("\r\n", "\n")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Commit counts keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: HashMap<String, u32>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dates<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut histogram = Self::new();
        for date in dates {
            histogram.record(date.as_ref());
        }
        histogram
    }

    pub fn record(&mut self, date: &str) {
        *self.counts.entry(date.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.get(&date.format("%Y-%m-%d").to_string())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&count| count as u64).sum()
    }
}

/// `--since`/`--until` values covering the whole of `year`.
///
/// Git reads a bare date as that date at the current time of day, so both ends
/// carry an explicit time.
pub fn year_range_args(year: i32) -> (String, String) {
    (format!("{year}-01-01 00:00:00"), format!("{year}-12-31 23:59:59"))
}

/// Reads the non-merge commit dates of `year` and tallies them per day.
pub fn build_histogram(
    reader: &dyn HistoryReader,
    repo: &Path,
    year: i32,
) -> Result<Histogram, HistoryError> {
    let (since, until) = year_range_args(year);
    let dates = reader.read_dates(repo, &since, &until)?;
    let histogram = Histogram::from_dates(&dates);
    tracing::debug!(
        commits = dates.len(),
        days = histogram.len(),
        year,
        "built commit histogram"
    );
    if histogram.is_empty() {
        tracing::info!(year, repo = %repo.display(), "no commits in range");
    }
    Ok(histogram)
}
