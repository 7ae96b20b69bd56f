//! Structural validation of work-item documents.
//!
//! Validation never fails: problems are collected into a [`ValidationReport`].
//! Errors make a document invalid, warnings do not.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{load, summarize, WorkItemSummary};
use crate::models::*;

static EPIC_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^E\d+$").expect("valid regex"));
static STORY_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^US\d+$").expect("valid regex"));
static TASK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^T\d+$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Present whenever the document could be parsed.
    pub summary: Option<WorkItemSummary>,
}

impl ValidationReport {
    fn structural(message: String) -> Self {
        Self {
            valid: false,
            errors: vec![message],
            warnings: vec![],
            summary: None,
        }
    }
}

/// Validate the work items stored at `path`.
///
/// Unreadable or unparseable files produce an invalid report rather than an error.
pub fn validate_file(path: &Path) -> ValidationReport {
    match load(path) {
        Ok(document) => validate(&document),
        Err(e) => ValidationReport::structural(e.to_string()),
    }
}

/// Check id patterns, id uniqueness per level, and task dependencies.
pub fn validate(document: &Document) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut epic_ids = HashSet::new();
    let mut story_ids = HashSet::new();
    let mut task_ids = HashSet::new();

    for epic in &document.epics {
        check_id("Epic", &epic.id, &EPIC_ID, "E<number>", &mut epic_ids, &mut errors);
        check_title("Epic", &epic.id, &epic.title, &mut warnings);

        for story in &epic.user_stories {
            check_id("User story", &story.id, &STORY_ID, "US<number>", &mut story_ids, &mut errors);
            check_title("User story", &story.id, &story.title, &mut warnings);

            for task in &story.tasks {
                check_id("Task", &task.id, &TASK_ID, "T<number>", &mut task_ids, &mut errors);
                check_title("Task", &task.id, &task.title, &mut warnings);
            }
        }
    }

    for task in document.tasks() {
        for dep in &task.dependencies {
            if !task_ids.contains(dep.as_str()) {
                warnings.push(format!(
                    "Task '{}' depends on unknown task '{}'",
                    task.id, dep
                ));
            }
        }
    }

    for cycle in dependency_cycles(document) {
        errors.push(format!("Dependency cycle: {}", cycle.join(" -> ")));
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        summary: Some(summarize(document)),
    }
}

fn check_id<'a>(
    kind: &str,
    id: &'a str,
    pattern: &Regex,
    expected: &str,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<String>,
) {
    if !pattern.is_match(id) {
        errors.push(format!(
            "{} id '{}' is malformed (expected {})",
            kind, id, expected
        ));
    }
    if !seen.insert(id) {
        errors.push(format!("{} id '{}' is duplicated", kind, id));
    }
}

fn check_title(kind: &str, id: &str, title: &str, warnings: &mut Vec<String>) {
    if title.trim().is_empty() {
        warnings.push(format!("{} '{}' has an empty title", kind, id));
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Find dependency cycles among known tasks. Each cycle is reported once,
/// starting and ending at the task where it was first entered.
fn dependency_cycles(document: &Document) -> Vec<Vec<String>> {
    // BTreeMap keeps traversal, and therefore reported cycles, deterministic.
    let mut graph: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for task in document.tasks() {
        graph.entry(task.id.as_str()).or_default();
    }
    for task in document.tasks() {
        let known: Vec<&str> = task
            .dependencies
            .iter()
            .map(String::as_str)
            .filter(|d| graph.contains_key(d))
            .collect();
        if let Some(deps) = graph.get_mut(task.id.as_str()) {
            deps.extend(known);
        }
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut cycles = Vec::new();

    for &start in graph.keys() {
        if !marks.contains_key(start) {
            visit(start, &graph, &mut marks, &mut cycles);
        }
    }

    cycles
}

/// Depth-first search from `start` with an explicit stack of
/// `(node, next dependency index)` frames, so chain length is not bounded by
/// the thread's stack.
fn visit<'a>(
    start: &'a str,
    graph: &BTreeMap<&'a str, Vec<&'a str>>,
    marks: &mut HashMap<&'a str, Mark>,
    cycles: &mut Vec<Vec<String>>,
) {
    let mut frames: Vec<(&'a str, usize)> = vec![(start, 0)];
    marks.insert(start, Mark::Visiting);

    while let Some(frame) = frames.last_mut() {
        let (node, idx) = *frame;
        let deps = graph.get(node).map(Vec::as_slice).unwrap_or_default();

        let Some(&next) = deps.get(idx) else {
            marks.insert(node, Mark::Done);
            frames.pop();
            continue;
        };
        frame.1 += 1;

        match marks.get(next) {
            None => {
                marks.insert(next, Mark::Visiting);
                frames.push((next, 0));
            }
            Some(Mark::Visiting) => {
                if let Some(pos) = frames.iter().position(|&(n, _)| n == next) {
                    let mut cycle: Vec<String> =
                        frames[pos..].iter().map(|(n, _)| n.to_string()).collect();
                    cycle.push(next.to_string());
                    cycles.push(cycle);
                }
            }
            Some(Mark::Done) => {}
        }
    }
}
