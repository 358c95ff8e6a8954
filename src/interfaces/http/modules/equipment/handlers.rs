//! Equipment catalog handlers (Admin/LabStaff manage, anyone lists)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::authorization::Actor;
use crate::domain::Equipment;
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::modules::labs::CatalogAppState;

use super::dto::{EquipmentDto, ReorderEquipmentRequest, SaveEquipmentRequest};

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn require_manager(actor: &Actor) -> Result<(), HandlerError> {
    if actor.can_manage_equipment() {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin or LabStaff role required")),
        ))
    }
}

async fn require_lab_exists(state: &CatalogAppState, lab_id: i64) -> Result<(), HandlerError> {
    let lab = state
        .repos
        .labs()
        .find_by_id(lab_id)
        .await
        .map_err(domain_error_response)?;
    if lab.is_none() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format!("unknown lab id {lab_id}"))),
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/equipment",
    tag = "Equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All equipment in display order", body = ApiResponse<Vec<EquipmentDto>>)
    )
)]
pub async fn list_equipment(
    State(state): State<CatalogAppState>,
) -> Result<Json<ApiResponse<Vec<EquipmentDto>>>, HandlerError> {
    let items = state
        .repos
        .equipment()
        .list()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        items.into_iter().map(EquipmentDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/equipment",
    tag = "Equipment",
    security(("bearer_auth" = [])),
    request_body = SaveEquipmentRequest,
    responses(
        (status = 201, description = "Equipment added at the end of the display order", body = ApiResponse<EquipmentDto>),
        (status = 403, description = "Admin or LabStaff role required")
    )
)]
pub async fn create_equipment(
    State(state): State<CatalogAppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(request): ValidatedJson<SaveEquipmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EquipmentDto>>), HandlerError> {
    require_manager(&actor)?;
    require_lab_exists(&state, request.lab_id).await?;

    let mut equipment = Equipment::new(request.lab_id, request.name);
    equipment.category = request.category;
    equipment.serial_number = request.serial_number;
    equipment.is_active = request.is_active;
    equipment.sort_order = state
        .repos
        .equipment()
        .next_sort_order()
        .await
        .map_err(domain_error_response)?;

    let equipment = state
        .repos
        .equipment()
        .save(equipment)
        .await
        .map_err(domain_error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(equipment.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/equipment/{id}",
    tag = "Equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = SaveEquipmentRequest,
    responses(
        (status = 200, description = "Equipment updated", body = ApiResponse<EquipmentDto>),
        (status = 403, description = "Admin or LabStaff role required"),
        (status = 404, description = "Unknown equipment")
    )
)]
pub async fn update_equipment(
    State(state): State<CatalogAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<SaveEquipmentRequest>,
) -> Result<Json<ApiResponse<EquipmentDto>>, HandlerError> {
    require_manager(&actor)?;
    require_lab_exists(&state, request.lab_id).await?;

    let mut equipment = state
        .repos
        .equipment()
        .find_by_id(id)
        .await
        .map_err(domain_error_response)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Equipment not found")),
            )
        })?;

    equipment.lab_id = request.lab_id;
    equipment.name = request.name;
    equipment.category = request.category;
    equipment.serial_number = request.serial_number;
    equipment.is_active = request.is_active;

    state
        .repos
        .equipment()
        .update(equipment.clone())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(equipment.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/equipment/{id}",
    tag = "Equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Admin or LabStaff role required"),
        (status = 404, description = "Unknown equipment")
    )
)]
pub async fn delete_equipment(
    State(state): State<CatalogAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    require_manager(&actor)?;

    state
        .repos
        .equipment()
        .delete(id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/equipment/reorder",
    tag = "Equipment",
    security(("bearer_auth" = [])),
    request_body = ReorderEquipmentRequest,
    responses(
        (status = 200, description = "Display order rewritten", body = ApiResponse<EmptyData>),
        (status = 403, description = "Admin or LabStaff role required")
    )
)]
pub async fn reorder_equipment(
    State(state): State<CatalogAppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(request): ValidatedJson<ReorderEquipmentRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    require_manager(&actor)?;

    state
        .repos
        .equipment()
        .reorder(&request.ids)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
