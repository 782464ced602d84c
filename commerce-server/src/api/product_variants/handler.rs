//! Product variant API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::catalog::{AxisValue, VariantAxis, generate_variants};
use crate::core::ServerState;
use crate::db::models::{
    AttributeAssignment, AttributeValueData, GeneratedVariant, GroupedAttributeValue,
    ProductVariant, VariantAxisValue, VariantCreate, VariantUpdate,
};
use crate::db::repository::{
    AttributeRepository, ProductAttributeValueRepository, ProductRepository,
    ProductVariantRepository,
};
use crate::utils::validation::validate_code;
use crate::utils::{AppError, AppResult};

/// GET /api/products/:product_id/variants
pub async fn list(
    State(state): State<ServerState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<Vec<ProductVariant>>> {
    require_product(&state, product_id).await?;
    let repo = ProductVariantRepository::new(state.db.clone());
    Ok(Json(repo.find_by_product(product_id).await?))
}

/// POST /api/products/:product_id/variants
pub async fn create(
    State(state): State<ServerState>,
    Path(product_id): Path<i64>,
    Json(payload): Json<VariantCreate>,
) -> AppResult<Json<ProductVariant>> {
    validate_code(&payload.sku, "sku")?;
    let repo = ProductVariantRepository::new(state.db.clone());
    Ok(Json(repo.create(product_id, payload).await?))
}

/// GET /api/products/:product_id/variants/generate
///
/// Previews the cartesian product over the product's select-attribute
/// values. Nothing is persisted; a product without select values
/// yields an empty list.
pub async fn generate(
    State(state): State<ServerState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<Vec<GeneratedVariant>>> {
    require_product(&state, product_id).await?;

    let values_repo = ProductAttributeValueRepository::new(state.db.clone());
    let attr_repo = AttributeRepository::new(state.db.clone());

    let grouped = values_repo.find_grouped(product_id).await?;
    let mut axes: Vec<VariantAxis> = Vec::new();
    for group in &grouped {
        let value_ids = match &group.data {
            AttributeValueData::Selection { attribute_value_id } => vec![*attribute_value_id],
            AttributeValueData::Selections {
                attribute_value_ids,
            } => attribute_value_ids.clone(),
            // Free-form values never span an axis
            _ => continue,
        };
        let values = attr_repo.find_values_by_ids(&value_ids).await?;
        axes.push(VariantAxis {
            attribute_id: group.attribute_id,
            values: values
                .into_iter()
                .map(|v| AxisValue {
                    attribute_value_id: v.id,
                    label: v.label,
                })
                .collect(),
        });
    }

    Ok(Json(generate_variants(&axes)))
}

/// GET /api/variants/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductVariant>> {
    let repo = ProductVariantRepository::new(state.db.clone());
    let variant = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Variant {}", id)))?;
    Ok(Json(variant))
}

/// GET /api/variants/:id/axis-values
pub async fn axis_values(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<VariantAxisValue>>> {
    let repo = ProductVariantRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("Variant {}", id)));
    }
    Ok(Json(repo.find_axis_values(id).await?))
}

/// GET /api/variants/:id/attribute-values - grouped per attribute
pub async fn get_attribute_values(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<GroupedAttributeValue>>> {
    let repo = ProductVariantRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("Variant {}", id)));
    }
    Ok(Json(repo.find_attribute_values(id).await?))
}

/// PUT /api/variants/:id/attribute-values - replace all assignments
pub async fn replace_attribute_values(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<Vec<AttributeAssignment>>,
) -> AppResult<Json<Vec<GroupedAttributeValue>>> {
    let repo = ProductVariantRepository::new(state.db.clone());
    repo.replace_attribute_values(id, &payload).await?;
    Ok(Json(repo.find_attribute_values(id).await?))
}

/// PUT /api/variants/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<VariantUpdate>,
) -> AppResult<Json<ProductVariant>> {
    let repo = ProductVariantRepository::new(state.db.clone());
    Ok(Json(repo.update(id, payload).await?))
}

/// DELETE /api/variants/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = ProductVariantRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Variant {}", id)));
    }
    Ok(Json(true))
}

async fn require_product(state: &ServerState, product_id: i64) -> AppResult<()> {
    let repo = ProductRepository::new(state.db.clone());
    if repo.find_by_id(product_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Product {}",
            product_id
        )));
    }
    Ok(())
}
