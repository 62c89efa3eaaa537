//! Result sinks, written once after the worker pool fully drains.

use anyhow::{Context, Result};
use handlescout_core::FilesConfig;
use handlescout_probe::{ProbeReport, ResolvedKind};

/// Write the three sinks: taken identifiers, the winner (if any), and the
/// raw response log. Each file is truncated and written fresh.
pub async fn write_report(files: &FilesConfig, report: &ProbeReport) -> Result<()> {
    let taken: Vec<&str> = report
        .results
        .iter()
        .filter(|r| r.kind == ResolvedKind::Taken)
        .map(|r| r.candidate.as_str())
        .collect();
    tokio::fs::write(&files.taken, join_lines(&taken))
        .await
        .with_context(|| format!("writing {}", files.taken.display()))?;

    let available = report
        .winner
        .as_ref()
        .map(|winner| format!("{winner}\n"))
        .unwrap_or_default();
    tokio::fs::write(&files.available, available)
        .await
        .with_context(|| format!("writing {}", files.available.display()))?;

    let log: String = report.log.iter().map(|entry| format!("{entry}\n")).collect();
    tokio::fs::write(&files.response_log, log)
        .await
        .with_context(|| format!("writing {}", files.response_log.display()))?;

    Ok(())
}

fn join_lines(lines: &[&str]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handlescout_core::Candidate;
    use handlescout_probe::{LogEntry, ResultRecord};
    use std::time::Duration;

    fn candidate(name: &str) -> Candidate {
        Candidate::new(name).expect("valid candidate")
    }

    fn files_in(dir: &std::path::Path) -> FilesConfig {
        FilesConfig {
            candidates: dir.join("candidates.txt"),
            taken: dir.join("taken.txt"),
            available: dir.join("available.txt"),
            response_log: dir.join("responses.log"),
        }
    }

    fn sample_report(winner: Option<&str>) -> ProbeReport {
        ProbeReport {
            winner: winner.map(candidate),
            results: vec![
                ResultRecord {
                    candidate: candidate("alice"),
                    kind: ResolvedKind::Taken,
                    message: "already in use".to_string(),
                },
                ResultRecord {
                    candidate: candidate("carol"),
                    kind: ResolvedKind::Taken,
                    message: "already in use".to_string(),
                },
            ],
            log: vec![
                LogEntry::Response {
                    candidate: candidate("alice"),
                    status: 200,
                    payload: r#"{"code":1}"#.to_string(),
                },
                LogEntry::Transport {
                    candidate: candidate("carol"),
                    error: "timed out".to_string(),
                },
            ],
            checked: 2,
            elapsed: Duration::from_secs(1),
            final_rate: 8.0,
            interrupted: false,
        }
    }

    #[tokio::test]
    async fn test_write_report_with_winner() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let files = files_in(tmp.path());

        write_report(&files, &sample_report(Some("bob")))
            .await
            .expect("write sinks");

        let taken = std::fs::read_to_string(&files.taken).expect("read taken");
        assert_eq!(taken, "alice\ncarol\n");

        let available = std::fs::read_to_string(&files.available).expect("read available");
        assert_eq!(available, "bob\n");

        let log = std::fs::read_to_string(&files.response_log).expect("read log");
        assert!(log.contains(r#"alice -> 200 {"code":1}"#));
        assert!(log.contains("carol -> network error: timed out"));
    }

    #[tokio::test]
    async fn test_write_report_without_winner() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let files = files_in(tmp.path());

        write_report(&files, &sample_report(None))
            .await
            .expect("write sinks");

        let available = std::fs::read_to_string(&files.available).expect("read available");
        assert!(available.is_empty());
    }

    #[tokio::test]
    async fn test_write_report_truncates_stale_files() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let files = files_in(tmp.path());
        std::fs::write(&files.available, "stale-winner\n").expect("seed stale file");

        write_report(&files, &sample_report(None))
            .await
            .expect("write sinks");

        let available = std::fs::read_to_string(&files.available).expect("read available");
        assert!(available.is_empty(), "stale winner must be truncated");
    }

    #[test]
    fn test_join_lines() {
        assert_eq!(join_lines(&[]), "");
        assert_eq!(join_lines(&["a"]), "a\n");
        assert_eq!(join_lines(&["a", "b"]), "a\nb\n");
    }
}
