use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A large body of work, broken down into user stories.
///
/// Ids follow the `E<n>` pattern and are unique among epics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Epic {
    pub id: String,
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
    pub user_stories: Vec<UserStory>,
}

/// A user-facing capability within an epic. Ids follow `US<n>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
    pub tasks: Vec<Task>,
}

/// A unit of implementation work within a user story. Ids follow `T<n>`.
///
/// `dependencies` holds the ids of other tasks anywhere in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub purpose: String,
    pub implementation_details: String,
    pub dependencies: Vec<String>,
    pub assignee: String,
    pub status: TaskStatus,
    pub estimated_effort: String,
}

/// The progress of a task.
///
/// - `Todo`: Not started
/// - `InProgress`: Someone is working on it
/// - `Done`: Finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "in-progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// The persisted work-item file: the epic tree plus provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub epics: Vec<Epic>,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Set when the document is written, never taken from the caller.
    pub generated_at: DateTime<Utc>,
    /// Path of the requirements document the epics were extracted from.
    pub source_document: String,
    pub parser_version: String,
}

impl Document {
    /// Iterate over every user story in document order.
    pub fn user_stories(&self) -> impl Iterator<Item = &UserStory> {
        self.epics.iter().flat_map(|e| e.user_stories.iter())
    }

    /// Iterate over every task in document order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.user_stories().flat_map(|s| s.tasks.iter())
    }
}
