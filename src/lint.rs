use crate::config::LineCatalog;
use crate::station::{Station, seq_key};
use std::collections::HashSet;
use thiserror::Error;

/// Dataset problems worth a warning. None of them stop a diagram from rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintIssue {
    #[error("station #{index} has no id")]
    MissingId { index: usize },
    #[error("duplicate station id {id:?}")]
    DuplicateId { id: String },
    #[error("{id} is on {line} but lacks {key}", key = seq_key(.line))]
    MissingSequence { id: String, line: String },
}

pub fn lint_stations(stations: &[Station], catalog: &LineCatalog) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for (index, station) in stations.iter().enumerate() {
        if station.id.is_empty() {
            issues.push(LintIssue::MissingId { index });
        } else if !seen.insert(station.id.as_str()) {
            issues.push(LintIssue::DuplicateId {
                id: station.id.clone(),
            });
        }
        for line in catalog.codes() {
            if station.serves(line) && station.seq_for(line).is_none() {
                issues.push(LintIssue::MissingSequence {
                    id: station.id.clone(),
                    line: line.to_string(),
                });
            }
        }
    }
    issues
}

pub fn log_issues(issues: &[LintIssue]) {
    for issue in issues {
        tracing::warn!("[lint] {issue}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn station(id: &str, lines: &[&str], seq: &[(&str, i64)]) -> Station {
        Station {
            id: id.to_string(),
            name: id.to_string(),
            position: None,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            interchange: false,
            seq: seq.iter().map(|(l, s)| (l.to_string(), *s)).collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn clean_dataset_has_no_issues() {
        let stations = vec![
            station("a", &["PURPLE"], &[("PURPLE", 1)]),
            station("b", &["PURPLE", "GREEN"], &[("PURPLE", 2), ("GREEN", 7)]),
        ];
        assert!(lint_stations(&stations, &LineCatalog::default()).is_empty());
    }

    #[test]
    fn reports_every_issue_kind() {
        let stations = vec![
            station("", &[], &[]),
            station("a", &["PURPLE"], &[("PURPLE", 1)]),
            station("a", &["GREEN", "PINK"], &[]),
        ];
        let issues = lint_stations(&stations, &LineCatalog::default());
        assert_eq!(
            issues,
            vec![
                LintIssue::MissingId { index: 0 },
                LintIssue::DuplicateId { id: "a".to_string() },
                LintIssue::MissingSequence {
                    id: "a".to_string(),
                    line: "GREEN".to_string()
                },
            ]
        );
        assert_eq!(issues[2].to_string(), "a is on GREEN but lacks seq_green");
    }
}
