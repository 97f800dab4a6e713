use crate::domain::common::{
    normalize_ref, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata,
};
use crate::shared::hierarchy::{cmp_names, HierarchyItem};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(CategoryId);

// ============================================================================
// Aggregate Root
// ============================================================================
/// Product/tool category. Categories nest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(flatten)]
    pub base: BaseAggregate<CategoryId>,

    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
}

impl Category {
    pub fn new_for_insert(
        code: String,
        name: String,
        parent_id: Option<String>,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(CategoryId::new_v4(), code, name);
        base.comment = comment;

        Self {
            base,
            parent_id: normalize_ref(parent_id.as_deref()),
        }
    }

    pub fn name(&self) -> &str {
        &self.base.description
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &CategoryDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.name.clone();
        self.base.comment = dto.comment.clone();
        self.parent_id = normalize_ref(dto.parent_id.as_deref());
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_required()?;
        if self.parent_id.as_deref() == Some(self.to_string_id().as_str()) {
            return Err("A category cannot be its own parent".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }

    /// Sibling order in the category tree: alphabetical by name
    pub fn tree_order(a: &Category, b: &Category) -> Ordering {
        cmp_names(a.name(), b.name())
    }
}

impl HierarchyItem for Category {
    fn node_key(&self) -> String {
        self.to_string_id()
    }

    fn parent_key(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}

impl AggregateRoot for Category {
    fn code(&self) -> &str {
        &self.base.code
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn element_name() -> &'static str {
        "Category"
    }

    fn code_prefix() -> &'static str {
        "CAT"
    }
}

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoryDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub comment: Option<String>,
}
