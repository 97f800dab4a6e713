use super::lifecycle::{ToolAction, ToolLifecycleError, ToolStatus};
use crate::domain::common::{
    normalize_ref, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(ToolId);

// ============================================================================
// Aggregate Root
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(flatten)]
    pub base: BaseAggregate<ToolId>,

    #[serde(rename = "serialNumber", default)]
    pub serial_number: String,

    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,

    #[serde(default)]
    pub status: ToolStatus,

    /// ID пользователя, за которым закреплён инструмент
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,

    #[serde(rename = "assignedAt")]
    pub assigned_at: Option<DateTime<Utc>>,
}

impl Tool {
    pub fn new_for_insert(code: String, dto: &ToolDto) -> Self {
        let mut base = BaseAggregate::new(ToolId::new_v4(), code, dto.name.clone());
        base.comment = dto.comment.clone();

        Self {
            base,
            serial_number: dto.serial_number.clone().unwrap_or_default(),
            category_id: normalize_ref(dto.category_id.as_deref()),
            status: ToolStatus::Available,
            assigned_to: None,
            assigned_at: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Updates descriptive fields only; status moves through [`Tool::apply`]
    pub fn update(&mut self, dto: &ToolDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.name.clone();
        self.base.comment = dto.comment.clone();
        self.serial_number = dto.serial_number.clone().unwrap_or_default();
        self.category_id = normalize_ref(dto.category_id.as_deref());
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_required()?;
        if self.status.is_checked_out() != self.assigned_to.is_some() {
            return Err(format!(
                "Tool in status '{}' has inconsistent assignee",
                self.status
            ));
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }

    pub fn is_held_by(&self, user_id: &str) -> bool {
        self.assigned_to.as_deref() == Some(user_id)
    }

    /// Apply a lifecycle action, keeping the assignee in step with the status
    pub fn apply(&mut self, action: &ToolAction) -> Result<(), ToolLifecycleError> {
        let next = self.status.transition(action)?;

        match action {
            ToolAction::Assign { to } => {
                self.assigned_to = Some(to.trim().to_string());
                self.assigned_at = Some(Utc::now());
            }
            ToolAction::Return => {
                self.assigned_to = None;
                self.assigned_at = None;
            }
            _ => {}
        }
        self.status = next;
        Ok(())
    }
}

impl AggregateRoot for Tool {
    fn code(&self) -> &str {
        &self.base.code
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn element_name() -> &'static str {
        "Tool"
    }

    fn code_prefix() -> &'static str {
        "TL"
    }
}

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    #[serde(rename = "serialNumber")]
    pub serial_number: Option<String>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
    pub comment: Option<String>,
}
