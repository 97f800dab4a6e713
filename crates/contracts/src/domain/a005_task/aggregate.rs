use crate::domain::common::{
    normalize_ref, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata,
};
use crate::shared::hierarchy::HierarchyItem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(TaskId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    #[default]
    Todo,
    Blocked,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::InProgress,
        TaskStatus::Todo,
        TaskStatus::Blocked,
        TaskStatus::Done,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Todo => "todo",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Позиция в списке задач: активные выше закрытых
    pub fn rank(&self) -> u8 {
        match self {
            TaskStatus::InProgress => 0,
            TaskStatus::Todo => 1,
            TaskStatus::Blocked => 2,
            TaskStatus::Done => 3,
            TaskStatus::Cancelled => 4,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            "urgent" => Some(TaskPriority::Urgent),
            _ => None,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================
/// Work item. Tasks nest through `parent_task_id` into sub-tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    pub base: BaseAggregate<TaskId>,

    #[serde(rename = "parentTaskId")]
    pub parent_task_id: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub priority: TaskPriority,

    #[serde(rename = "assigneeId")]
    pub assignee_id: Option<String>,

    #[serde(rename = "dueDate")]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new_for_insert(code: String, dto: &TaskDto) -> Self {
        let mut base = BaseAggregate::new(TaskId::new_v4(), code, dto.title.clone());
        base.comment = dto.comment.clone();

        Self {
            base,
            parent_task_id: normalize_ref(dto.parent_task_id.as_deref()),
            status: dto.status.unwrap_or_default(),
            priority: dto.priority.unwrap_or_default(),
            assignee_id: normalize_ref(dto.assignee_id.as_deref()),
            due_date: dto.due_date,
        }
    }

    pub fn title(&self) -> &str {
        &self.base.description
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &TaskDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.title.clone();
        self.base.comment = dto.comment.clone();
        self.parent_task_id = normalize_ref(dto.parent_task_id.as_deref());
        if let Some(status) = dto.status {
            self.status = status;
        }
        if let Some(priority) = dto.priority {
            self.priority = priority;
        }
        self.assignee_id = normalize_ref(dto.assignee_id.as_deref());
        self.due_date = dto.due_date;
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_required()?;
        if self.parent_task_id.as_deref() == Some(self.to_string_id().as_str()) {
            return Err("A task cannot be its own parent".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }

    /// Sibling order in the task tree: status rank, then newest first
    pub fn tree_order(a: &Task, b: &Task) -> Ordering {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| b.base.metadata.created_at.cmp(&a.base.metadata.created_at))
    }
}

impl HierarchyItem for Task {
    fn node_key(&self) -> String {
        self.to_string_id()
    }

    fn parent_key(&self) -> Option<&str> {
        self.parent_task_id.as_deref()
    }
}

impl AggregateRoot for Task {
    fn code(&self) -> &str {
        &self.base.code
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn element_name() -> &'static str {
        "Task"
    }

    fn code_prefix() -> &'static str {
        "TSK"
    }
}

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub title: String,
    #[serde(rename = "parentTaskId")]
    pub parent_task_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(rename = "assigneeId")]
    pub assignee_id: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<NaiveDate>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::hierarchy::{build_hierarchy, flatten_all};
    use chrono::{Duration, Utc};

    fn task(title: &str, status: TaskStatus, age_minutes: i64, parent: Option<&Task>) -> Task {
        let mut t = Task::new_for_insert(
            format!("TSK-{title}"),
            &TaskDto {
                title: title.into(),
                status: Some(status),
                parent_task_id: parent.map(|p| p.to_string_id()),
                ..Default::default()
            },
        );
        t.base.metadata.created_at = Utc::now() - Duration::minutes(age_minutes);
        t
    }

    #[test]
    fn test_status_rank_then_newest_first() {
        let old_todo = task("old todo", TaskStatus::Todo, 60, None);
        let new_todo = task("new todo", TaskStatus::Todo, 5, None);
        let done = task("done", TaskStatus::Done, 1, None);
        let active = task("active", TaskStatus::InProgress, 500, None);

        let roots = build_hierarchy(
            vec![old_todo, done, new_todo, active],
            Task::tree_order,
        )
        .unwrap();
        let titles: Vec<&str> = roots.iter().map(|n| n.item.title()).collect();
        assert_eq!(titles, vec!["active", "new todo", "old todo", "done"]);
    }

    #[test]
    fn test_subtasks_nest_under_parent() {
        let parent = task("Stocktake", TaskStatus::InProgress, 10, None);
        let blocked = task("Count aisle 2", TaskStatus::Blocked, 3, Some(&parent));
        let todo = task("Count aisle 1", TaskStatus::Todo, 4, Some(&parent));

        let roots = build_hierarchy(vec![blocked, todo, parent], Task::tree_order).unwrap();
        let rows: Vec<(&str, usize)> = flatten_all(&roots)
            .into_iter()
            .map(|(t, d)| (t.title(), d))
            .collect();
        assert_eq!(
            rows,
            vec![("Stocktake", 0), ("Count aisle 1", 1), ("Count aisle 2", 1)]
        );
    }

    #[test]
    fn test_status_strings() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(TaskPriority::from_str("urgent"), Some(TaskPriority::Urgent));
        assert!(TaskStatus::Cancelled.is_closed());
        assert!(!TaskStatus::Blocked.is_closed());
    }

    #[test]
    fn test_dto_json() {
        let dto: TaskDto = serde_json::from_str(
            r#"{"title":"Load van","parentTaskId":null,"status":"in_progress","dueDate":"2026-11-02"}"#,
        )
        .unwrap();
        assert_eq!(dto.status, Some(TaskStatus::InProgress));
        assert_eq!(dto.due_date, NaiveDate::from_ymd_opt(2026, 11, 2));
    }
}
