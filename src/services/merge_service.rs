use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::PodcastResult;
use crate::storage::ScratchDir;

pub const REPORT_HEADER: &str = "#\n\
# --------------------------------------- PODCASTS ---------------------------------------\n\
#\n";

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"wget\s-O").expect("static regex"));

/// The merged download script and the artifacts it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub text: String,
    pub included: Vec<PathBuf>,
}

impl Report {
    pub fn has_downloads(&self) -> bool {
        !self.included.is_empty()
    }
}

/// Concatenate every artifact that has at least one download directive.
///
/// Artifacts are visited in file-name order so the same directory always
/// merges to the same bytes. An artifact that can't be read is skipped; only
/// failing to list the directory is an error.
pub fn merge_artifacts(scratch: &ScratchDir) -> PodcastResult<Report> {
    let mut report = Report {
        text: REPORT_HEADER.to_string(),
        included: Vec::new(),
    };

    for path in scratch.list_artifacts()? {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable artifact");
                continue;
            }
        };

        if !DIRECTIVE.is_match(&content) {
            continue;
        }

        report.text.push_str(&content);
        report.text.push('\n');
        report.included.push(path);
    }

    tracing::info!(included = report.included.len(), "merged artifacts");
    Ok(report)
}
