//! Matches the commit history against artifacts or workflow runs.
//!
//! The latest artifact isn't necessarily the one of the latest commit: GitHub may finish an older
//! commit's workflow after a newer one's, and the newest commit may have nothing yet. So the
//! history is walked newest first, and the first commit with an entry wins.

use std::collections::HashMap;

use super::{Commit, WorkflowRun, artifact::Artifact};

/// The artifact name carrying the build output.
pub const ARTIFACT_NAME: &str = "GDS";

/// The workflow run name producing [`ARTIFACT_NAME`].
pub const RUN_NAME: &str = "gds";

/// Returns the value of the first commit, in history order, that has an entry.
///
/// Entries are indexed by `key_fn` (entries without a key are skipped) and mapped by `value_fn`.
/// If two entries share a key the last one wins: keys are commit shas, and a repository does not
/// publish more than one matching entry per commit.
pub fn most_recent_match<'a, E, I, K, F, V>(
    commits: &[Commit],
    entries: I,
    key_fn: K,
    value_fn: F,
) -> Option<V>
where
    E: 'a,
    I: IntoIterator<Item = &'a E>,
    K: Fn(&'a E) -> Option<&'a str>,
    F: Fn(&'a E) -> V,
{
    let mut index: HashMap<&str, V> = entries
        .into_iter()
        .filter_map(|entry| key_fn(entry).map(|key| (key, value_fn(entry))))
        .collect();

    commits
        .iter()
        .find_map(|commit| index.remove(commit.sha.as_str()))
}

/// Returns the artifact of the most recent commit that has one. Its
/// [`archive_download_url`](Artifact::archive_download_url) is the download URL.
///
/// The artifacts are expected to be filtered to [`ARTIFACT_NAME`] already.
pub fn most_recent_artifact<'a>(commits: &[Commit], artifacts: &'a [Artifact]) -> Option<&'a Artifact> {
    most_recent_match(commits, artifacts, Artifact::head_sha, |artifact| artifact)
}

/// Returns the page URL of the [`RUN_NAME`] run of the most recent commit that has one.
pub fn most_recent_run_page<'a>(commits: &[Commit], runs: &'a [WorkflowRun]) -> Option<&'a str> {
    most_recent_match(
        commits,
        runs.iter().filter(|run| run.name.as_deref() == Some(RUN_NAME)),
        |run| Some(run.head_sha.as_str()),
        |run| run.html_url.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Entry {
        sha: &'static str,
        url: &'static str,
    }

    fn commits(shas: &[&str]) -> Vec<Commit> {
        shas.iter()
            .map(|sha| Commit {
                sha: (*sha).to_owned(),
            })
            .collect()
    }

    fn find(commits: &[Commit], entries: &[Entry]) -> Option<&'static str> {
        most_recent_match(commits, entries, |entry| Some(entry.sha), |entry| entry.url)
    }

    #[test]
    fn newest_commit_with_an_entry_wins() {
        let entries = [
            Entry { sha: "c1", url: "urlA" },
            Entry { sha: "c3", url: "urlC" },
        ];
        assert_eq!(find(&commits(&["c3", "c2", "c1"]), &entries), Some("urlC"));
    }

    #[test]
    fn unmatched_newer_commits_are_skipped() {
        let entries = [Entry { sha: "c1", url: "urlA" }];
        assert_eq!(find(&commits(&["c3", "c2", "c1"]), &entries), Some("urlA"));
    }

    #[test]
    fn no_overlap_is_none() {
        let entries = [Entry { sha: "c0", url: "urlZ" }];
        assert_eq!(find(&commits(&["c3", "c2", "c1"]), &entries), None);
        assert_eq!(find(&commits(&[]), &entries), None);
        assert_eq!(find(&commits(&["c1"]), &[]), None);
    }

    #[test]
    fn duplicate_keys_keep_the_last_entry() {
        let entries = [
            Entry { sha: "c1", url: "first" },
            Entry { sha: "c1", url: "second" },
        ];
        assert_eq!(find(&commits(&["c1"]), &entries), Some("second"));
    }

    #[test]
    fn artifacts_match_on_their_workflow_run() {
        let artifacts: Vec<Artifact> = serde_json::from_value(json!([
            {
                "id": 1,
                "name": "GDS",
                "archive_download_url": "https://dl.test/1",
                "workflow_run": { "head_sha": "c1" }
            },
            {
                "id": 2,
                "name": "GDS",
                "archive_download_url": "https://dl.test/2"
            },
            {
                "id": 3,
                "name": "GDS",
                "archive_download_url": "https://dl.test/3",
                "workflow_run": { "head_sha": "c2" }
            }
        ]))
        .unwrap();

        let artifact = most_recent_artifact(&commits(&["c3", "c2", "c1"]), &artifacts).unwrap();
        assert_eq!(artifact.archive_download_url, "https://dl.test/3");
    }

    #[test]
    fn runs_match_only_by_name() {
        let runs: Vec<WorkflowRun> = serde_json::from_value(json!([
            {
                "id": 1,
                "name": "docs",
                "head_sha": "c3",
                "html_url": "https://github.com/acme/widget/actions/runs/1"
            },
            {
                "id": 2,
                "name": "gds",
                "head_sha": "c2",
                "html_url": "https://github.com/acme/widget/actions/runs/2"
            }
        ]))
        .unwrap();

        assert_eq!(
            most_recent_run_page(&commits(&["c3", "c2", "c1"]), &runs),
            Some("https://github.com/acme/widget/actions/runs/2")
        );
    }

    #[test]
    fn unnamed_runs_never_match() {
        let runs: Vec<WorkflowRun> = serde_json::from_value(json!([
            {
                "id": 1,
                "name": null,
                "head_sha": "c2",
                "html_url": "https://github.com/acme/widget/actions/runs/1"
            },
            {
                "id": 2,
                "head_sha": "c2",
                "html_url": "https://github.com/acme/widget/actions/runs/2"
            },
            {
                "id": 3,
                "name": "gds",
                "head_sha": "c1",
                "html_url": "https://github.com/acme/widget/actions/runs/3"
            }
        ]))
        .unwrap();

        assert_eq!(
            most_recent_run_page(&commits(&["c2", "c1"]), &runs),
            Some("https://github.com/acme/widget/actions/runs/3")
        );
    }
}
