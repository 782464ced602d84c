//! Product API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::catalog::{self, SetInference};
use crate::core::ServerState;
use crate::db::models::{
    AttributeAssignment, FacetCount, GroupedAttributeValue, Product, ProductCreate,
    ProductSearchRequest, ProductUpdate,
};
use crate::db::repository::{
    AttributeSetRepository, ProductAttributeValueRepository, ProductRepository,
};
use crate::utils::validation::{MAX_NAME_LEN, validate_code, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /api/products
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_code(&payload.sku, "sku")?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.update(id, payload).await?))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = ProductRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Product {}", id)));
    }
    Ok(Json(true))
}

/// Facet search response: matching page plus live facet counts
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub facets: Vec<FacetCount>,
}

/// POST /api/products/search
///
/// Attribute filters narrow the product set (AND across attributes,
/// OR inside one); facet counts are computed over that narrowed set.
pub async fn search(
    State(state): State<ServerState>,
    Json(payload): Json<ProductSearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    let products_repo = ProductRepository::new(state.db.clone());
    let values_repo = ProductAttributeValueRepository::new(state.db.clone());

    let restrict_ids = if payload.filters.is_empty() {
        None
    } else {
        Some(values_repo.filter_product_ids(&payload.filters).await?)
    };

    let products = products_repo
        .search(&payload, restrict_ids.as_deref())
        .await?;
    let facets = values_repo.facet_counts(restrict_ids.as_deref()).await?;

    Ok(Json(SearchResponse { products, facets }))
}

/// GET /api/products/:id/attribute-values - grouped per attribute
pub async fn get_attribute_values(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<GroupedAttributeValue>>> {
    let products_repo = ProductRepository::new(state.db.clone());
    if products_repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("Product {}", id)));
    }

    let values_repo = ProductAttributeValueRepository::new(state.db.clone());
    Ok(Json(values_repo.find_grouped(id).await?))
}

/// PUT /api/products/:id/attribute-values - replace all assignments
pub async fn replace_attribute_values(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<Vec<AttributeAssignment>>,
) -> AppResult<Json<Vec<GroupedAttributeValue>>> {
    let values_repo = ProductAttributeValueRepository::new(state.db.clone());
    values_repo.replace_for_product(id, &payload).await?;
    Ok(Json(values_repo.find_grouped(id).await?))
}

/// GET /api/products/:id/infer-set
///
/// Runs set inference over the product's current select/multiselect
/// values. Sets are tried in their configured sort order.
pub async fn infer_set(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SetInference>> {
    let products_repo = ProductRepository::new(state.db.clone());
    if products_repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("Product {}", id)));
    }

    let values_repo = ProductAttributeValueRepository::new(state.db.clone());
    let grouped = values_repo.find_grouped(id).await?;
    let pairs: Vec<(i64, i64)> = grouped
        .iter()
        .flat_map(|g| {
            g.data
                .value_ids()
                .into_iter()
                .map(|value_id| (g.attribute_id, value_id))
        })
        .collect();
    let values = catalog::group_value_ids(&pairs);

    let sets_repo = AttributeSetRepository::new(state.db.clone());
    let sets = sets_repo.find_all().await?;
    let assignments = sets_repo.find_all_assignments().await?;
    let candidates: Vec<(i64, Vec<i64>)> = sets
        .iter()
        .map(|set| {
            let attribute_ids = assignments
                .iter()
                .filter(|a| a.attribute_set_id == set.id)
                .map(|a| a.attribute_id)
                .collect();
            (set.id, attribute_ids)
        })
        .collect();

    Ok(Json(catalog::infer_set(values, &candidates)))
}
