use super::repository;
use contracts::domain::a005_task::{Task, TaskDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::hierarchy::{self, build_hierarchy, HierarchyNode};
use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::shared::error::{ServiceError, ServiceResult};
use crate::shared::parent_guard::check_parent;
use crate::system::users;

/// Held from the parent check until the write, so concurrent re-parents
/// cannot close a cycle between them.
static TREE_WRITES: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

async fn check_assignee(task: &Task) -> ServiceResult<()> {
    if let Some(user_id) = task.assignee_id.as_deref() {
        let assignee = users::repository::get_by_id(user_id).await?;
        if !assignee.map(|u| u.is_active).unwrap_or(false) {
            return Err(ServiceError::validation(format!(
                "Unknown assignee {}",
                user_id
            )));
        }
    }
    Ok(())
}

pub async fn create(dto: TaskDto) -> ServiceResult<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(Task::generate_code);
    let mut aggregate = Task::new_for_insert(code, &dto);

    aggregate.validate().map_err(ServiceError::Validation)?;
    check_assignee(&aggregate).await?;

    let _guard = TREE_WRITES.lock().await;
    let existing = repository::list_all().await?;
    check_parent(
        &existing,
        &aggregate.to_string_id(),
        aggregate.parent_task_id.as_deref(),
    )?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Created task {}", aggregate.code());
    Ok(id)
}

pub async fn update(dto: TaskDto) -> ServiceResult<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ServiceError::validation("Invalid ID"))?;

    let _guard = TREE_WRITES.lock().await;
    let mut aggregate = repository::get_by_id(id)
        .await?
        .filter(Task::is_active)
        .ok_or(ServiceError::NotFound("Task"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::Validation)?;
    check_assignee(&aggregate).await?;

    let existing = repository::list_all().await?;
    check_parent(
        &existing,
        &aggregate.to_string_id(),
        aggregate.parent_task_id.as_deref(),
    )?;

    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(())
}

/// Мягкое удаление задачи. Подзадачи поднимаются в корень дерева.
pub async fn delete(id: Uuid) -> ServiceResult<bool> {
    let _guard = TREE_WRITES.lock().await;
    Ok(repository::soft_delete(id).await?)
}

pub async fn get_by_id(id: Uuid) -> ServiceResult<Option<Task>> {
    let found = repository::get_by_id(id).await?;
    Ok(found.filter(Task::is_active))
}

pub async fn list_all() -> ServiceResult<Vec<Task>> {
    Ok(repository::list_all().await?)
}

pub async fn list_by_assignee(user_id: &str) -> ServiceResult<Vec<Task>> {
    Ok(repository::list_by_assignee(user_id).await?)
}

/// Дерево задач: сначала по статусу, затем новые выше старых
pub async fn tree() -> ServiceResult<Vec<HierarchyNode<Task>>> {
    let items = repository::list_all().await?;
    Ok(build_hierarchy(items, Task::tree_order)?)
}

pub async fn parent_candidates(id: Uuid) -> ServiceResult<Vec<Task>> {
    let items = repository::list_all().await?;
    let key = id.to_string();
    if !items.iter().any(|t| t.to_string_id() == key) {
        return Err(ServiceError::NotFound("Task"));
    }
    Ok(hierarchy::parent_candidates(&items, Some(&key))
        .into_iter()
        .cloned()
        .collect())
}
