use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(ClientId);

// ============================================================================
// Aggregate Root
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(flatten)]
    pub base: BaseAggregate<ClientId>,

    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl Client {
    pub fn new_for_insert(code: String, dto: &ClientDto) -> Self {
        let mut base = BaseAggregate::new(ClientId::new_v4(), code, dto.name.clone());
        base.comment = dto.comment.clone();

        Self {
            base,
            email: dto.email.clone().unwrap_or_default(),
            phone: dto.phone.clone().unwrap_or_default(),
            address: dto.address.clone().unwrap_or_default(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &ClientDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.name.clone();
        self.base.comment = dto.comment.clone();
        self.email = dto.email.clone().unwrap_or_default();
        self.phone = dto.phone.clone().unwrap_or_default();
        self.address = dto.address.clone().unwrap_or_default();
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_required()?;
        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err("Invalid email format".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }
}

impl AggregateRoot for Client {
    fn code(&self) -> &str {
        &self.base.code
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn element_name() -> &'static str {
        "Client"
    }

    fn code_prefix() -> &'static str {
        "CL"
    }
}

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub comment: Option<String>,
}
