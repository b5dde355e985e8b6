use super::*;

use tessera_domain::RoleId;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .role_service
        .list_roles(TenantId::from_uuid(tenant_id))
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .role_service
        .create_role(TenantId::from_uuid(tenant_id), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path((tenant_id, role_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .update_role(
            TenantId::from_uuid(tenant_id),
            RoleId::from_uuid(role_id),
            payload.into(),
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path((tenant_id, role_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .role_service
        .delete_role(TenantId::from_uuid(tenant_id), RoleId::from_uuid(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
