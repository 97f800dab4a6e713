use chrono::Utc;
use contracts::domain::a004_tool::{Tool, ToolId, ToolStatus};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_tool")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub serial_number: String,
    pub category_id: Option<String>,
    pub status: String,
    pub assigned_to: Option<String>,
    pub assigned_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tool {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let status = ToolStatus::from_str(&m.status).unwrap_or_else(|| {
            tracing::warn!("Unknown tool status '{}' for {}, using default", m.status, m.id);
            ToolStatus::default()
        });

        Tool {
            base: BaseAggregate::with_metadata(
                ToolId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            serial_number: m.serial_number,
            category_id: m.category_id,
            status,
            assigned_to: m.assigned_to,
            assigned_at: m.assigned_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Tool) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        serial_number: Set(aggregate.serial_number.clone()),
        category_id: Set(aggregate.category_id.clone()),
        status: Set(aggregate.status.as_str().to_string()),
        assigned_to: Set(aggregate.assigned_to.clone()),
        assigned_at: Set(aggregate.assigned_at),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Tool>> {
    let mut items: Vec<Tool> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| {
        a.base
            .description
            .to_lowercase()
            .cmp(&b.base.description.to_lowercase())
    });
    Ok(items)
}

/// Инструменты, закреплённые за пользователем
pub async fn list_assigned_to(user_id: &str) -> anyhow::Result<Vec<Tool>> {
    let items = Entity::find()
        .filter(Column::AssignedTo.eq(user_id))
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Tool>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Tool) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

/// Сохраняет агрегат, если версия в базе не изменилась с момента чтения.
///
/// Returns `false` when another writer got there first or the tool has
/// been deleted meanwhile.
pub async fn update_if_version(aggregate: &Tool, expected_version: i32) -> anyhow::Result<bool> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.is_deleted = sea_orm::ActiveValue::NotSet;
    let result = Entity::update_many()
        .set(active)
        .filter(Column::Id.eq(aggregate.base.id.value().to_string()))
        .filter(Column::Version.eq(expected_version))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

/// Мягкое удаление при неизменной версии; версия увеличивается, чтобы
/// прочитанные до удаления копии больше не могли быть сохранены.
///
/// Checked-out tools are never deleted, whatever the caller has read.
pub async fn soft_delete_if_version(id: Uuid, expected_version: i32) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let checked_out: Vec<&str> = ToolStatus::ALL
        .iter()
        .filter(|s| s.is_checked_out())
        .map(ToolStatus::as_str)
        .collect();
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::Version.eq(expected_version))
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.is_not_in(checked_out))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
