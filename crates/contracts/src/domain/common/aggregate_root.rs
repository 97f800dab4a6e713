use super::EntityMetadata;
use uuid::Uuid;

/// Трейт для корня агрегата
///
/// Общие метаданные записи и класса агрегата, которые нужны сервисам
pub trait AggregateRoot {
    /// Бизнес-код записи (например, "TL-1A2B3C4D")
    fn code(&self) -> &str;

    /// Метаданные жизненного цикла
    fn metadata(&self) -> &EntityMetadata;

    /// Имя элемента для сообщений и логов (единственное число)
    fn element_name() -> &'static str;

    /// Префикс генерируемого бизнес-кода, например "CAT"
    fn code_prefix() -> &'static str;

    /// Whether the record is visible in lists (not soft-deleted)
    fn is_active(&self) -> bool {
        !self.metadata().is_deleted
    }

    /// New business code: prefix plus eight random hex digits
    fn generate_code() -> String {
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        format!("{}-{}", Self::code_prefix(), suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_category::Category;
    use crate::domain::a004_tool::Tool;

    #[test]
    fn test_generated_codes_use_prefix() {
        let code = Tool::generate_code();
        assert!(code.starts_with("TL-"));
        assert_eq!(code.len(), "TL-".len() + 8);
        assert!(code[3..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        assert_ne!(Tool::generate_code(), code);
        assert!(Category::generate_code().starts_with("CAT-"));
    }

    #[test]
    fn test_soft_deleted_record_is_not_active() {
        let mut category = Category::new_for_insert("CAT-1".into(), "Tools".into(), None, None);
        assert!(category.is_active());
        category.base.metadata.is_deleted = true;
        assert!(!category.is_active());
        assert_eq!(Category::element_name(), "Category");
    }
}
