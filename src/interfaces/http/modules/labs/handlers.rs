//! Lab catalog handlers (Admin manages, anyone authenticated lists)

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::authorization::Actor;
use crate::domain::{Lab, RepositoryProvider};
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, EmptyData, ValidatedJson,
};

use super::dto::{LabDto, SaveLabRequest};

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// Application state for catalog handlers.
#[derive(Clone)]
pub struct CatalogAppState {
    pub repos: Arc<dyn RepositoryProvider>,
}

fn require_admin(actor: &Actor) -> Result<(), HandlerError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin role required")),
        ))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/labs",
    tag = "Labs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All labs ordered by name", body = ApiResponse<Vec<LabDto>>)
    )
)]
pub async fn list_labs(
    State(state): State<CatalogAppState>,
) -> Result<Json<ApiResponse<Vec<LabDto>>>, HandlerError> {
    let labs = state
        .repos
        .labs()
        .list()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        labs.into_iter().map(LabDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/labs",
    tag = "Labs",
    security(("bearer_auth" = [])),
    request_body = SaveLabRequest,
    responses(
        (status = 201, description = "Lab created", body = ApiResponse<LabDto>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_lab(
    State(state): State<CatalogAppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(request): ValidatedJson<SaveLabRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LabDto>>), HandlerError> {
    require_admin(&actor)?;

    let mut lab = Lab::new(request.name);
    lab.code = request.code;
    lab.location = request.location;
    lab.capacity = request.capacity;
    lab.is_active = request.is_active;

    let lab = state
        .repos
        .labs()
        .save(lab)
        .await
        .map_err(domain_error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(lab.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/labs/{id}",
    tag = "Labs",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Lab ID")),
    request_body = SaveLabRequest,
    responses(
        (status = 200, description = "Lab updated", body = ApiResponse<LabDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Unknown lab")
    )
)]
pub async fn update_lab(
    State(state): State<CatalogAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<SaveLabRequest>,
) -> Result<Json<ApiResponse<LabDto>>, HandlerError> {
    require_admin(&actor)?;

    let mut lab = state
        .repos
        .labs()
        .find_by_id(id)
        .await
        .map_err(domain_error_response)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Lab not found")),
            )
        })?;

    lab.code = request.code;
    lab.name = request.name;
    lab.location = request.location;
    lab.capacity = request.capacity;
    lab.is_active = request.is_active;

    state
        .repos
        .labs()
        .update(lab.clone())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(lab.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/labs/{id}",
    tag = "Labs",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Lab ID")),
    responses(
        (status = 200, description = "Lab deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Unknown lab")
    )
)]
pub async fn delete_lab(
    State(state): State<CatalogAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    require_admin(&actor)?;

    state
        .repos
        .labs()
        .delete(id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
