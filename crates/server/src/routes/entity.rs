//! Generic CRUD controller shared by every entity type.
//!
//! [`entity_routes`] mounts the same handler set under `/{ENTITY_NAME}`;
//! each handler delegates to [`EntityRepository`] and maps failures through
//! [`ApiError::entity`].

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use models::{CyodaEntity, EntityWithMetadata, SearchCondition};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TransitionQuery {
    pub transition: Option<String>,
}

type EntityResult<T> = Result<Json<EntityWithMetadata<T>>, ApiError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(v)| v).map_err(|e| ApiError::bad_request(e.body_text()))
}

pub async fn create<T: CyodaEntity>(
    State(state): State<AppState>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<(StatusCode, Json<EntityWithMetadata<T>>), ApiError> {
    let input = body(payload)?;
    info!(entity = T::ENTITY_NAME, business_id = %input.business_id(), "entity_create_request");
    let created = state.repo::<T>().create(input).await.map_err(ApiError::entity)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_by_id<T: CyodaEntity>(State(state): State<AppState>, Path(id): Path<Uuid>) -> EntityResult<T> {
    state.repo::<T>().get(id).await.map(Json).map_err(ApiError::entity)
}

pub async fn get_by_business_id<T: CyodaEntity>(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> EntityResult<T> {
    match state.repo::<T>().get_by_business_id(&business_id).await {
        Ok(Some(found)) => Ok(Json(found)),
        Ok(None) => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some(format!("{} {} not found", T::ENTITY_NAME, business_id)),
        )),
        Err(e) => Err(ApiError::entity(e)),
    }
}

pub async fn update<T: CyodaEntity>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TransitionQuery>,
    payload: Result<Json<T>, JsonRejection>,
) -> EntityResult<T> {
    let input = body(payload)?;
    let updated = state
        .repo::<T>()
        .update(id, input, q.transition.as_deref())
        .await
        .map_err(ApiError::entity)?;
    Ok(Json(updated))
}

pub async fn update_by_business_id<T: CyodaEntity>(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Query(q): Query<TransitionQuery>,
    payload: Result<Json<T>, JsonRejection>,
) -> EntityResult<T> {
    let input = body(payload)?;
    let updated = state
        .repo::<T>()
        .update_by_business_id(&business_id, input, q.transition.as_deref())
        .await
        .map_err(ApiError::entity)?;
    Ok(Json(updated))
}

pub async fn list<T: CyodaEntity>(State(state): State<AppState>) -> Result<Json<Vec<EntityWithMetadata<T>>>, ApiError> {
    let all = state.repo::<T>().list().await.map_err(ApiError::entity)?;
    info!(entity = T::ENTITY_NAME, count = all.len(), "entity_list");
    Ok(Json(all))
}

pub async fn search<T: CyodaEntity>(
    State(state): State<AppState>,
    payload: Result<Json<SearchCondition>, JsonRejection>,
) -> Result<Json<Vec<EntityWithMetadata<T>>>, ApiError> {
    let condition = body(payload)?;
    let hits = state.repo::<T>().search(&condition).await.map_err(ApiError::entity)?;
    Ok(Json(hits))
}

pub async fn delete<T: CyodaEntity>(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    match state.repo::<T>().delete(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!(entity = T::ENTITY_NAME, %id, err = %e, "entity delete failed");
            Err(ApiError::bad_request(e.message()))
        }
    }
}

/// All CRUD routes for `T`, mounted under `/{T::ENTITY_NAME}`.
pub fn entity_routes<T: CyodaEntity>() -> Router<AppState> {
    let base = format!("/{}", T::ENTITY_NAME);
    Router::new()
        .route(&base, get(list::<T>).post(create::<T>))
        .route(&format!("{base}/search"), post(search::<T>))
        .route(&format!("{base}/:id"), get(get_by_id::<T>).put(update::<T>).delete(delete::<T>))
        .route(
            &format!("{base}/business/:business_id"),
            get(get_by_business_id::<T>).put(update_by_business_id::<T>),
        )
}
