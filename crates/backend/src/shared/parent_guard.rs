use contracts::domain::common::{normalize_ref, AggregateRoot};
use contracts::shared::hierarchy::{would_create_cycle, HierarchyItem};

use super::error::{ServiceError, ServiceResult};

/// Checks a parent reference before a hierarchical record is written.
///
/// `items` is the current live collection, `key` the record being written
/// (new records are not in `items` yet). The parent must exist and must not
/// be the record itself or one of its descendants. Callers hold their
/// hierarchy's write lock from reading `items` until the write is done.
pub fn check_parent<T: HierarchyItem + AggregateRoot>(
    items: &[T],
    key: &str,
    parent: Option<&str>,
) -> ServiceResult<()> {
    let kind = T::element_name();
    let Some(parent) = normalize_ref(parent) else {
        return Ok(());
    };

    if parent == key {
        return Err(ServiceError::validation(format!(
            "{} cannot be its own parent",
            kind
        )));
    }

    if !items.iter().any(|item| item.node_key() == parent) {
        return Err(ServiceError::validation(format!(
            "Parent {} {} does not exist",
            kind.to_lowercase(),
            parent
        )));
    }

    if would_create_cycle(items, key, Some(&parent)) {
        return Err(ServiceError::validation(format!(
            "Moving {} {} under {} would make it its own ancestor",
            kind.to_lowercase(),
            key,
            parent
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_category::Category;

    fn category(name: &str, parent: Option<&Category>) -> Category {
        Category::new_for_insert(
            format!("CAT-{}", name),
            name.to_string(),
            parent.map(|p| p.to_string_id()),
            None,
        )
    }

    #[test]
    fn test_no_parent_is_accepted() {
        let tools = category("Tools", None);
        let items = vec![tools.clone()];
        assert!(check_parent(&items, &tools.to_string_id(), None).is_ok());
        assert!(check_parent(&items, &tools.to_string_id(), Some("")).is_ok());
    }

    #[test]
    fn test_existing_parent_is_accepted() {
        let tools = category("Tools", None);
        let hand = category("Hand Tools", Some(&tools));
        let items = vec![tools.clone(), hand.clone()];
        let new_key = uuid::Uuid::new_v4().to_string();
        assert!(check_parent(&items, &new_key, Some(&hand.to_string_id())).is_ok());
    }

    #[test]
    fn test_missing_parent_is_rejected() {
        let tools = category("Tools", None);
        let items = vec![tools.clone()];
        let missing = uuid::Uuid::new_v4().to_string();
        let err = check_parent(&items, &tools.to_string_id(), Some(&missing))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_self_parent_is_rejected() {
        let tools = category("Tools", None);
        let id = tools.to_string_id();
        let err = check_parent(&[tools], &id, Some(&id)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Category cannot be its own parent"
        );
    }

    #[test]
    fn test_descendant_parent_is_rejected() {
        let tools = category("Tools", None);
        let hand = category("Hand Tools", Some(&tools));
        let hammer = category("Hammer", Some(&hand));
        let items = vec![tools.clone(), hand, hammer.clone()];
        let err = check_parent(
            &items,
            &tools.to_string_id(),
            Some(&hammer.to_string_id()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("its own ancestor"));
    }
}
