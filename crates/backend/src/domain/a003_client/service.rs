use super::repository;
use contracts::domain::a003_client::{Client, ClientDto};
use contracts::domain::common::AggregateRoot;
use uuid::Uuid;

use crate::shared::error::{ServiceError, ServiceResult};

pub async fn create(dto: ClientDto) -> ServiceResult<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(Client::generate_code);
    let mut aggregate = Client::new_for_insert(code, &dto);

    aggregate.validate().map_err(ServiceError::Validation)?;
    aggregate.before_write();

    Ok(repository::insert(&aggregate).await?)
}

pub async fn update(dto: ClientDto) -> ServiceResult<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ServiceError::validation("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .filter(Client::is_active)
        .ok_or(ServiceError::NotFound("Client"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::Validation)?;
    aggregate.before_write();

    repository::update(&aggregate).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> ServiceResult<bool> {
    Ok(repository::soft_delete(id).await?)
}

pub async fn get_by_id(id: Uuid) -> ServiceResult<Option<Client>> {
    let found = repository::get_by_id(id).await?;
    Ok(found.filter(Client::is_active))
}

pub async fn list_all() -> ServiceResult<Vec<Client>> {
    Ok(repository::list_all().await?)
}
