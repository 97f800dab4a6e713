use super::repository;
use contracts::domain::a001_category::{Category, CategoryDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::hierarchy::{self, build_hierarchy, HierarchyNode};
use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::shared::error::{ServiceError, ServiceResult};
use crate::shared::parent_guard::check_parent;

/// Held from the parent check until the write, so concurrent re-parents
/// cannot close a cycle between them.
static TREE_WRITES: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Создание новой категории
pub async fn create(dto: CategoryDto) -> ServiceResult<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(Category::generate_code);
    let mut aggregate = Category::new_for_insert(code, dto.name, dto.parent_id, dto.comment);

    aggregate.validate().map_err(ServiceError::Validation)?;

    let _guard = TREE_WRITES.lock().await;
    let existing = repository::list_all().await?;
    check_parent(
        &existing,
        &aggregate.to_string_id(),
        aggregate.parent_id.as_deref(),
    )?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Created category {} '{}'", aggregate.code(), aggregate.name());
    Ok(id)
}

/// Обновление существующей категории
pub async fn update(dto: CategoryDto) -> ServiceResult<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ServiceError::validation("Invalid ID"))?;

    let _guard = TREE_WRITES.lock().await;
    let mut aggregate = repository::get_by_id(id)
        .await?
        .filter(Category::is_active)
        .ok_or(ServiceError::NotFound("Category"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::Validation)?;

    let existing = repository::list_all().await?;
    check_parent(
        &existing,
        &aggregate.to_string_id(),
        aggregate.parent_id.as_deref(),
    )?;

    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(())
}

/// Мягкое удаление категории. Дочерние категории поднимаются в корень дерева.
pub async fn delete(id: Uuid) -> ServiceResult<bool> {
    let _guard = TREE_WRITES.lock().await;
    Ok(repository::soft_delete(id).await?)
}

pub async fn get_by_id(id: Uuid) -> ServiceResult<Option<Category>> {
    let found = repository::get_by_id(id).await?;
    Ok(found.filter(Category::is_active))
}

pub async fn list_all() -> ServiceResult<Vec<Category>> {
    Ok(repository::list_all().await?)
}

/// Дерево категорий, отсортированное по имени на каждом уровне
pub async fn tree() -> ServiceResult<Vec<HierarchyNode<Category>>> {
    let items = repository::list_all().await?;
    Ok(build_hierarchy(items, Category::tree_order)?)
}

/// Категории, которые можно выбрать родителем для `id`
pub async fn parent_candidates(id: Uuid) -> ServiceResult<Vec<Category>> {
    let items = repository::list_all().await?;
    let key = id.to_string();
    if !items.iter().any(|c| c.to_string_id() == key) {
        return Err(ServiceError::NotFound("Category"));
    }
    Ok(hierarchy::parent_candidates(&items, Some(&key))
        .into_iter()
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_db;

    async fn create_named(name: &str, parent: Option<Uuid>) -> Uuid {
        create(CategoryDto {
            name: test_db::unique(name),
            parent_id: parent.map(|p| p.to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    async fn move_under(id: Uuid, parent: Option<Uuid>) -> ServiceResult<()> {
        let current = get_by_id(id).await.unwrap().unwrap();
        update(CategoryDto {
            id: Some(id.to_string()),
            name: current.name().to_string(),
            parent_id: parent.map(|p| p.to_string()),
            ..Default::default()
        })
        .await
    }

    #[test]
    fn test_create_generates_code_and_nests() {
        test_db::run(async {
            let tools = create_named("Tools", None).await;
            let hand = create_named("Hand Tools", Some(tools)).await;

            let stored = get_by_id(hand).await.unwrap().unwrap();
            assert!(stored.base.code.starts_with("CAT-"));
            assert_eq!(stored.parent_id, Some(tools.to_string()));
        });
    }

    #[test]
    fn test_create_with_missing_parent_is_rejected() {
        test_db::run(async {
            let err = create(CategoryDto {
                name: test_db::unique("Orphan"),
                parent_id: Some(Uuid::new_v4().to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        });
    }

    #[test]
    fn test_update_under_descendant_is_rejected() {
        test_db::run(async {
            let tools = create_named("Tools", None).await;
            let hand = create_named("Hand Tools", Some(tools)).await;
            let hammer = create_named("Hammer", Some(hand)).await;

            let err = move_under(tools, Some(hammer)).await.unwrap_err();
            assert!(err.to_string().contains("its own ancestor"));

            let err = move_under(tools, Some(tools)).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));

            let stored = get_by_id(tools).await.unwrap().unwrap();
            assert_eq!(stored.parent_id, None);
        });
    }

    #[test]
    fn test_concurrent_opposite_moves_keep_tree_acyclic() {
        test_db::run(async {
            for _ in 0..10 {
                let a = create_named("A", None).await;
                let b = create_named("B", None).await;

                let first = tokio::spawn(move_under(a, Some(b)));
                let second = tokio::spawn(move_under(b, Some(a)));
                let first = first.await.unwrap();
                let second = second.await.unwrap();

                assert!(
                    first.is_err() || second.is_err(),
                    "both opposite moves were accepted"
                );
                assert!(tree().await.is_ok());
            }
        });
    }

    #[test]
    fn test_deleted_parent_lifts_children_to_root() {
        test_db::run(async {
            let root = create_named("Garden", None).await;
            let child = create_named("Shovels", Some(root)).await;
            assert!(delete(root).await.unwrap());
            assert!(get_by_id(root).await.unwrap().is_none());

            let roots = tree().await.unwrap();
            assert!(roots
                .iter()
                .any(|node| node.item.to_string_id() == child.to_string()));
        });
    }

    #[test]
    fn test_parent_candidates_exclude_subtree() {
        test_db::run(async {
            let tools = create_named("Tools", None).await;
            let hand = create_named("Hand Tools", Some(tools)).await;
            let other = create_named("Paint", None).await;

            let keys: Vec<String> = parent_candidates(tools)
                .await
                .unwrap()
                .iter()
                .map(|c| c.to_string_id())
                .collect();
            assert!(!keys.contains(&tools.to_string()));
            assert!(!keys.contains(&hand.to_string()));
            assert!(keys.contains(&other.to_string()));

            assert!(matches!(
                parent_candidates(Uuid::new_v4()).await,
                Err(ServiceError::NotFound("Category"))
            ));
        });
    }
}
