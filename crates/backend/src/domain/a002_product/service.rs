use super::repository;
use crate::domain::a001_category;
use contracts::domain::a002_product::{Product, ProductDto};
use contracts::domain::common::AggregateRoot;
use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

use crate::shared::error::{ServiceError, ServiceResult};

async fn check_category(product: &Product) -> ServiceResult<()> {
    if let Some(category_id) = product.category_id.as_deref() {
        if !a001_category::repository::exists(category_id).await? {
            return Err(ServiceError::validation(format!(
                "Category {} does not exist",
                category_id
            )));
        }
    }
    Ok(())
}

async fn check_sku_unique(product: &Product) -> ServiceResult<()> {
    if product.sku.trim().is_empty() {
        return Ok(());
    }
    if let Some(other) = repository::get_by_sku(&product.sku).await? {
        if other.base.id != product.base.id {
            return Err(ServiceError::validation(format!(
                "SKU '{}' is already used by {}",
                product.sku, other.base.code
            )));
        }
    }
    Ok(())
}

/// A concurrent writer may claim the SKU between the check and the write;
/// the unique index turns that into the same validation error.
fn map_write_error(product: &Product, e: anyhow::Error) -> ServiceError {
    let duplicate = e
        .downcast_ref::<DbErr>()
        .and_then(DbErr::sql_err)
        .map(|err| matches!(err, SqlErr::UniqueConstraintViolation(_)))
        .unwrap_or(false);
    if duplicate {
        ServiceError::validation(format!("SKU '{}' is already used", product.sku))
    } else {
        ServiceError::Internal(e)
    }
}

pub async fn create(dto: ProductDto) -> ServiceResult<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(Product::generate_code);
    let mut aggregate = Product::new_for_insert(code, &dto);

    aggregate.validate().map_err(ServiceError::Validation)?;
    check_category(&aggregate).await?;
    check_sku_unique(&aggregate).await?;

    aggregate.before_write();
    repository::insert(&aggregate)
        .await
        .map_err(|e| map_write_error(&aggregate, e))
}

pub async fn update(dto: ProductDto) -> ServiceResult<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ServiceError::validation("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .filter(Product::is_active)
        .ok_or(ServiceError::NotFound("Product"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::Validation)?;
    check_category(&aggregate).await?;
    check_sku_unique(&aggregate).await?;

    aggregate.before_write();
    repository::update(&aggregate)
        .await
        .map_err(|e| map_write_error(&aggregate, e))
}

pub async fn delete(id: Uuid) -> ServiceResult<bool> {
    Ok(repository::soft_delete(id).await?)
}

pub async fn get_by_id(id: Uuid) -> ServiceResult<Option<Product>> {
    let found = repository::get_by_id(id).await?;
    Ok(found.filter(Product::is_active))
}

pub async fn list_all() -> ServiceResult<Vec<Product>> {
    Ok(repository::list_all().await?)
}

pub async fn list_by_category(category_id: Uuid) -> ServiceResult<Vec<Product>> {
    Ok(repository::list_by_category(&category_id.to_string()).await?)
}

/// Товары с остатком на уровне точки заказа или ниже
pub async fn list_to_reorder() -> ServiceResult<Vec<Product>> {
    let items = repository::list_all().await?;
    Ok(items.into_iter().filter(Product::needs_reorder).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_category;
    use crate::shared::data::test_db;
    use contracts::domain::a001_category::CategoryDto;

    fn dto(sku: &str) -> ProductDto {
        ProductDto {
            name: test_db::unique("Screws"),
            sku: Some(sku.to_string()),
            quantity: Some(10),
            reorder_level: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_duplicate_sku_is_rejected() {
        test_db::run(async {
            let sku = test_db::unique("SKU");
            create(dto(&sku)).await.unwrap();

            let err = create(dto(&sku)).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        });
    }

    #[test]
    fn test_sku_of_deleted_product_can_be_reused() {
        test_db::run(async {
            let sku = test_db::unique("SKU");
            let id = create(dto(&sku)).await.unwrap();
            assert!(delete(id).await.unwrap());
            assert!(create(dto(&sku)).await.is_ok());
        });
    }

    #[test]
    fn test_concurrent_creates_with_same_sku() {
        test_db::run(async {
            let sku = test_db::unique("SKU");
            let first = tokio::spawn(create(dto(&sku)));
            let second = tokio::spawn(create(dto(&sku)));
            let results = [first.await.unwrap(), second.await.unwrap()];

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            for result in &results {
                if let Err(e) = result {
                    assert!(matches!(e, ServiceError::Validation(_)), "{e}");
                }
            }
        });
    }

    #[test]
    fn test_products_without_sku_do_not_collide() {
        test_db::run(async {
            assert!(create(dto("")).await.is_ok());
            assert!(create(dto("")).await.is_ok());
        });
    }

    #[test]
    fn test_category_must_exist() {
        test_db::run(async {
            let mut missing = dto(&test_db::unique("SKU"));
            missing.category_id = Some(Uuid::new_v4().to_string());
            let err = create(missing).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));

            let category = a001_category::service::create(CategoryDto {
                name: test_db::unique("Fasteners"),
                ..Default::default()
            })
            .await
            .unwrap();
            let mut filed = dto(&test_db::unique("SKU"));
            filed.category_id = Some(category.to_string());
            let id = create(filed).await.unwrap();

            let listed = list_by_category(category).await.unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].base.id.value(), id);
        });
    }
}
