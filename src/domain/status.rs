use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Column a card lives in, in the client's own vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

/// Status as the REST backend spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Todo,
    InProgress,
    Done,
}

impl Status {
    /// Board column order, left to right
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    /// The internal identifier (`todo`, `inProgress`, `done`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inProgress",
            Self::Done => "done",
        }
    }

    /// Column heading shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    fn from_internal(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

impl ApiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<Status> for ApiStatus {
    fn from(status: Status) -> Self {
        to_api_status(status)
    }
}

/// Parses user input such as a CLI argument.
///
/// Unlike [`to_ui_status`] this is strict: unknown names are an error.
impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "todo" => Ok(Status::Todo),
            "inprogress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            _ => Err(format!(
                "Invalid status '{}'. Valid statuses: todo, in-progress, done",
                s
            )),
        }
    }
}

/// Maps a loosely-typed status value from the server onto a column.
///
/// `in_progress` is the wire spelling; the three internal names pass through.
/// Anything else, including non-strings and null, lands in `todo`.
pub fn to_ui_status(raw: &Value) -> Status {
    match raw.as_str() {
        Some("in_progress") => Status::InProgress,
        Some(other) => Status::from_internal(other).unwrap_or(Status::Todo),
        None => Status::Todo,
    }
}

/// Key-based variant of [`to_ui_status`] for column names.
///
/// Returns `None` for keys that name no known column, so callers can drop them.
pub fn status_for_column_key(key: &str) -> Option<Status> {
    match key {
        "in_progress" => Some(Status::InProgress),
        other => Status::from_internal(other),
    }
}

pub fn to_api_status(status: Status) -> ApiStatus {
    match status {
        Status::Todo => ApiStatus::Todo,
        Status::InProgress => ApiStatus::InProgress,
        Status::Done => ApiStatus::Done,
    }
}
