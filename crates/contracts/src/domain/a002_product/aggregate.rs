use crate::domain::common::{
    normalize_ref, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(ProductId);

// ============================================================================
// Aggregate Root
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    /// Артикул
    #[serde(default)]
    pub sku: String,

    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,

    /// Единица измерения ("pcs", "kg", ...)
    #[serde(default)]
    pub unit: String,

    /// Остаток на складе
    #[serde(default)]
    pub quantity: i32,

    #[serde(rename = "reorderLevel", default)]
    pub reorder_level: i32,
}

impl Product {
    pub fn new_for_insert(code: String, dto: &ProductDto) -> Self {
        let mut base = BaseAggregate::new(ProductId::new_v4(), code, dto.name.clone());
        base.comment = dto.comment.clone();

        Self {
            base,
            sku: dto.sku.clone().unwrap_or_default(),
            category_id: normalize_ref(dto.category_id.as_deref()),
            unit: dto.unit.clone().unwrap_or_else(|| "pcs".to_string()),
            quantity: dto.quantity.unwrap_or(0),
            reorder_level: dto.reorder_level.unwrap_or(0),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &ProductDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.name.clone();
        self.base.comment = dto.comment.clone();
        self.sku = dto.sku.clone().unwrap_or_default();
        self.category_id = normalize_ref(dto.category_id.as_deref());
        if let Some(unit) = &dto.unit {
            self.unit = unit.clone();
        }
        if let Some(quantity) = dto.quantity {
            self.quantity = quantity;
        }
        if let Some(level) = dto.reorder_level {
            self.reorder_level = level;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_required()?;
        if self.quantity < 0 {
            return Err("Quantity cannot be negative".into());
        }
        if self.reorder_level < 0 {
            return Err("Reorder level cannot be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }

    /// Остаток на уровне точки заказа или ниже
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

impl AggregateRoot for Product {
    fn code(&self) -> &str {
        &self.base.code
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn element_name() -> &'static str {
        "Product"
    }

    fn code_prefix() -> &'static str {
        "PRD"
    }
}

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub sku: Option<String>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<i32>,
    #[serde(rename = "reorderLevel")]
    pub reorder_level: Option<i32>,
    pub comment: Option<String>,
}
