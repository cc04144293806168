use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// Server-assigned task identifier.
///
/// The API is free to use numbers or strings; the id is echoed back in the
/// same JSON shape it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{n}"),
            TaskId::Text(s) => f.write_str(s),
        }
    }
}

/// A calendar date with no time-of-day.
///
/// The wire carries ISO-8601 date-times; only the date written on the wire is
/// kept, the clock time and offset are dropped. Serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(NaiveDate);

impl DueDate {
    const FORMAT: &'static str = "%Y-%m-%d";

    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim();
        // date_naive() on a fixed-offset value is the date in that offset,
        // i.e. the date portion of the string.
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(DueDate(dt.date_naive()));
        }
        // Any other ISO-8601 shape: keep the text before the time part.
        let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, Self::FORMAT)
            .map(DueDate)
            .map_err(|_| ParseError::DueDate(raw.to_string()))
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for DueDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DueDate::parse(s)
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DueDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub due_date: DueDate,
    pub status: bool,
}

/// Which slice of the collection the working list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Completed, StatusFilter::Pending];

    /// Value of the `status` query parameter, `None` for the whole collection.
    pub fn status_query(self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Completed => Some(true),
            StatusFilter::Pending => Some(false),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Completed => "Completed",
            StatusFilter::Pending => "Pending",
        }
    }
}

/// The two-valued completion label shown next to each task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    Completed,
    NotCompleted,
}

impl StatusLabel {
    pub fn from_status(status: bool) -> Self {
        if status {
            StatusLabel::Completed
        } else {
            StatusLabel::NotCompleted
        }
    }

    pub fn is_completed(self) -> bool {
        self == StatusLabel::Completed
    }

    pub fn toggled(self) -> Self {
        StatusLabel::from_status(!self.is_completed())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::Completed => "Completed",
            StatusLabel::NotCompleted => "Not Completed",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusLabel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "completed" => Ok(StatusLabel::Completed),
            "not completed" => Ok(StatusLabel::NotCompleted),
            _ => Err(ParseError::StatusLabel(s.to_string())),
        }
    }
}

/// The edit form. The task under edit lives inside `Edit`, so there is never
/// a selection without an open form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormState {
    #[default]
    Closed,
    Create,
    Edit(Task),
}

impl FormState {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Closed)
    }

    pub fn selected(&self) -> Option<&Task> {
        match self {
            FormState::Edit(task) => Some(task),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Edit,
}

impl SubmitMode {
    pub fn failure_message(self) -> &'static str {
        match self {
            SubmitMode::Create => "Failed to create the task. Please try again.",
            SubmitMode::Edit => "Failed to edit the task. Please try again.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Description,
    DueDate,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Description,
            FormField::Description => FormField::DueDate,
            FormField::DueDate => FormField::Name,
        }
    }
}

/// User-entered form text. The due date stays as typed until submit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormDraft {
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub focus: FormField,
}

impl FormDraft {
    pub fn from_task(task: &Task) -> Self {
        FormDraft {
            name: task.name.clone(),
            description: task.description.clone(),
            due_date: task.due_date.to_string(),
            focus: FormField::Name,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.description.is_empty() && !self.due_date.is_empty()
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Description => &mut self.description,
            FormField::DueDate => &mut self.due_date,
        }
    }
}

/// Body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub due_date: String,
}

impl NewTask {
    pub fn from_draft(draft: &FormDraft) -> Self {
        NewTask {
            name: draft.name.clone(),
            description: draft.description.clone(),
            due_date: draft.due_date.clone(),
        }
    }
}

/// Body of `PUT /todos`. Unset fields are left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

impl TaskUpdate {
    pub fn from_draft(id: TaskId, draft: &FormDraft) -> Self {
        TaskUpdate {
            id,
            name: Some(draft.name.clone()),
            description: Some(draft.description.clone()),
            due_date: Some(draft.due_date.clone()),
            status: None,
        }
    }

    pub fn status(id: TaskId, status: bool) -> Self {
        TaskUpdate {
            id,
            name: None,
            description: None,
            due_date: None,
            status: Some(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> DueDate {
        DueDate(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn due_date_strips_time_of_day() {
        assert_eq!(DueDate::parse("2024-03-01T00:00:00Z").unwrap(), date(2024, 3, 1));
        assert_eq!(DueDate::parse("2024-03-01T23:59:59.123-05:00").unwrap(), date(2024, 3, 1));
        assert_eq!(DueDate::parse("2024-03-01T10:00:00.000").unwrap(), date(2024, 3, 1));
        assert_eq!(DueDate::parse("2024-03-01").unwrap().to_string(), "2024-03-01");
    }

    #[test]
    fn due_date_accepts_other_iso_shapes() {
        for raw in [
            "2024-03-01T00:00:00.000+0000",
            "2024-03-01T00:00:00+0300",
            "2024-03-01T00:00Z",
            "2024-03-01 00:00:00",
        ] {
            assert_eq!(DueDate::parse(raw), Ok(date(2024, 3, 1)), "{raw}");
        }
    }

    #[test]
    fn one_odd_due_date_does_not_break_the_list() {
        let raw = r#"[
            {"id": 1, "name": "a", "description": "x", "dueDate": "2024-03-01T00:00:00Z", "status": false},
            {"id": 2, "name": "b", "description": "y", "dueDate": "2024-03-02T00:00:00.000+0000", "status": true}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(raw).unwrap();
        assert_eq!(tasks[1].due_date, date(2024, 3, 2));
    }

    #[test]
    fn due_date_rejects_garbage() {
        assert_eq!(
            DueDate::parse("tomorrow"),
            Err(ParseError::DueDate("tomorrow".to_string()))
        );
        assert!(DueDate::parse("2024-02-30").is_err());
    }

    #[test]
    fn task_reads_wire_shape() {
        let raw = json!({
            "id": 7,
            "name": "Buy milk",
            "description": "2%",
            "dueDate": "2024-01-01T00:00:00.000Z",
            "status": false,
            "createdAt": "2023-12-30T12:00:00.000Z"
        });
        let task: Task = serde_json::from_value(raw).unwrap();
        assert_eq!(
            task,
            Task {
                id: TaskId::Number(7),
                name: "Buy milk".into(),
                description: "2%".into(),
                due_date: date(2024, 1, 1),
                status: false,
            }
        );
    }

    #[test]
    fn task_id_keeps_its_json_shape() {
        let numeric: TaskId = serde_json::from_value(json!(42)).unwrap();
        let text: TaskId = serde_json::from_value(json!("a1b2")).unwrap();
        assert_eq!(serde_json::to_value(&numeric).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("a1b2"));
        assert_eq!(text.to_string(), "a1b2");
    }

    #[test]
    fn status_update_omits_unset_fields() {
        let body = serde_json::to_value(TaskUpdate::status(TaskId::Number(3), true)).unwrap();
        assert_eq!(body, json!({ "id": 3, "status": true }));
    }

    #[test]
    fn edit_update_carries_draft_fields() {
        let draft = FormDraft {
            name: "Walk".into(),
            description: "Dog".into(),
            due_date: "2024-05-05".into(),
            ..FormDraft::default()
        };
        let body = serde_json::to_value(TaskUpdate::from_draft(TaskId::Number(9), &draft)).unwrap();
        assert_eq!(
            body,
            json!({ "id": 9, "name": "Walk", "description": "Dog", "dueDate": "2024-05-05" })
        );
    }

    #[test]
    fn filter_maps_to_status_query() {
        assert_eq!(StatusFilter::All.status_query(), None);
        assert_eq!(StatusFilter::Completed.status_query(), Some(true));
        assert_eq!(StatusFilter::Pending.status_query(), Some(false));
        let labels: Vec<_> = StatusFilter::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, vec!["All", "Completed", "Pending"]);
    }

    #[test]
    fn status_label_round_trips_through_toggle() {
        let label = StatusLabel::from_status(false);
        assert_eq!(label.as_str(), "Not Completed");
        assert_eq!(label.toggled(), StatusLabel::Completed);
        assert_eq!(label.toggled().toggled(), label);
        assert_eq!("not completed".parse::<StatusLabel>().unwrap(), StatusLabel::NotCompleted);
        assert_eq!("Completed".parse::<StatusLabel>().unwrap(), StatusLabel::Completed);
        assert!("done".parse::<StatusLabel>().is_err());
    }

    #[test]
    fn draft_requires_every_field() {
        let mut draft = FormDraft::default();
        assert!(!draft.is_complete());
        draft.name = "a".into();
        draft.description = "b".into();
        assert!(!draft.is_complete());
        draft.due_date = "2024-01-01".into();
        assert!(draft.is_complete());
    }
}
