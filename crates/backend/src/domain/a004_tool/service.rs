use super::repository;
use crate::domain::a001_category;
use crate::system::users;
use contracts::domain::a004_tool::{Tool, ToolAction, ToolDto};
use contracts::domain::common::AggregateRoot;
use contracts::system::access::{AccessContext, Page, Role};
use uuid::Uuid;

use crate::shared::error::{ServiceError, ServiceResult};

async fn check_category(tool: &Tool) -> ServiceResult<()> {
    if let Some(category_id) = tool.category_id.as_deref() {
        if !a001_category::repository::exists(category_id).await? {
            return Err(ServiceError::validation(format!(
                "Category {} does not exist",
                category_id
            )));
        }
    }
    Ok(())
}

/// Whether `ctx` may perform `action` on `tool`.
///
/// Editors of the Tools page may do anything; technicians may only start
/// using or hand back a tool that is assigned to them.
pub fn authorize_action(tool: &Tool, action: &ToolAction, ctx: &AccessContext) -> ServiceResult<()> {
    if ctx.can_edit(Page::Tools) {
        return Ok(());
    }
    if ctx.role == Role::Technician && action.is_holder_action() && tool.is_held_by(&ctx.user_id) {
        return Ok(());
    }
    Err(ServiceError::Forbidden)
}

pub async fn create(dto: ToolDto) -> ServiceResult<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(Tool::generate_code);
    let mut aggregate = Tool::new_for_insert(code, &dto);

    aggregate.validate().map_err(ServiceError::Validation)?;
    check_category(&aggregate).await?;

    aggregate.before_write();
    Ok(repository::insert(&aggregate).await?)
}

/// Обновление описательных полей; статус меняется только через [`apply_action`]
pub async fn update(dto: ToolDto) -> ServiceResult<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ServiceError::validation("Invalid ID"))?;

    let mut aggregate = get_live(id).await?;
    let version = aggregate.base.metadata.version;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::Validation)?;
    check_category(&aggregate).await?;

    aggregate.before_write();
    save(&aggregate, version).await
}

/// Перевод инструмента в новое состояние жизненного цикла
pub async fn apply_action(id: Uuid, action: ToolAction, ctx: &AccessContext) -> ServiceResult<Tool> {
    let mut aggregate = get_live(id).await?;
    let version = aggregate.base.metadata.version;

    authorize_action(&aggregate, &action, ctx)?;

    let from = aggregate.status;
    aggregate.apply(&action)?;
    aggregate.validate().map_err(ServiceError::Validation)?;

    if let (ToolAction::Assign { .. }, Some(assignee_id)) = (&action, aggregate.assigned_to.as_deref()) {
        let assignee = users::repository::get_by_id(assignee_id).await?;
        if !assignee.map(|u| u.is_active).unwrap_or(false) {
            return Err(ServiceError::validation(format!(
                "Unknown assignee {}",
                assignee_id
            )));
        }
    }

    aggregate.before_write();
    save(&aggregate, version).await?;

    tracing::info!(
        "Tool {} {}: {} -> {} by {}",
        aggregate.base.code,
        action.name(),
        from,
        aggregate.status,
        ctx.username
    );
    Ok(aggregate)
}

async fn get_live(id: Uuid) -> ServiceResult<Tool> {
    repository::get_by_id(id)
        .await?
        .filter(Tool::is_active)
        .ok_or(ServiceError::NotFound("Tool"))
}

async fn save(aggregate: &Tool, expected_version: i32) -> ServiceResult<()> {
    if repository::update_if_version(aggregate, expected_version).await? {
        Ok(())
    } else {
        Err(ServiceError::Conflict(format!(
            "Tool {} was changed concurrently",
            aggregate.base.code
        )))
    }
}

/// Мягкое удаление; инструмент на руках удалить нельзя
pub async fn delete(id: Uuid) -> ServiceResult<bool> {
    let Some(tool) = get_by_id(id).await? else {
        return Ok(false);
    };
    if tool.status.is_checked_out() {
        return Err(ServiceError::Conflict(format!(
            "Tool {} is {} and cannot be deleted",
            tool.code(),
            tool.status
        )));
    }
    if !repository::soft_delete_if_version(id, tool.base.metadata.version).await? {
        return Err(ServiceError::Conflict(format!(
            "Tool {} was changed concurrently",
            tool.code()
        )));
    }
    tracing::info!("Deleted tool {}", tool.code());
    Ok(true)
}

pub async fn get_by_id(id: Uuid) -> ServiceResult<Option<Tool>> {
    let found = repository::get_by_id(id).await?;
    Ok(found.filter(Tool::is_active))
}

pub async fn list_all() -> ServiceResult<Vec<Tool>> {
    Ok(repository::list_all().await?)
}

pub async fn list_assigned_to(user_id: &str) -> ServiceResult<Vec<Tool>> {
    Ok(repository::list_assigned_to(user_id).await?)
}
