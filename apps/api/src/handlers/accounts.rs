use super::*;

use chrono::Utc;
use tessera_application::{DirectoryStats, InviteAccountInput, UpdateAccountInput};
use tessera_domain::AccountId;

pub async fn list_accounts_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let accounts = state
        .account_service
        .list_accounts(TenantId::from_uuid(tenant_id))
        .await?
        .into_iter()
        .map(AccountResponse::from)
        .collect();

    Ok(Json(accounts))
}

pub async fn invite_account_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<InviteAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let input = InviteAccountInput::try_from(payload)?;

    let account = state
        .account_service
        .invite_account(TenantId::from_uuid(tenant_id), input)
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

pub async fn update_account_handler(
    State(state): State<AppState>,
    Path((tenant_id, account_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let input = UpdateAccountInput::try_from(payload)?;

    let account = state
        .account_service
        .update_account(
            TenantId::from_uuid(tenant_id),
            AccountId::from_uuid(account_id),
            input,
        )
        .await?;

    Ok(Json(AccountResponse::from(account)))
}

pub async fn delete_account_handler(
    State(state): State<AppState>,
    Path((tenant_id, account_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .account_service
        .remove_account(
            TenantId::from_uuid(tenant_id),
            AccountId::from_uuid(account_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_status_handler(
    State(state): State<AppState>,
    Path((tenant_id, account_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<AccountResponse>> {
    let account = state
        .account_service
        .toggle_status(
            TenantId::from_uuid(tenant_id),
            AccountId::from_uuid(account_id),
        )
        .await?;

    Ok(Json(AccountResponse::from(account)))
}

pub async fn toggle_two_factor_handler(
    State(state): State<AppState>,
    Path((tenant_id, account_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<AccountResponse>> {
    let account = state
        .account_service
        .toggle_two_factor(
            TenantId::from_uuid(tenant_id),
            AccountId::from_uuid(account_id),
        )
        .await?;

    Ok(Json(AccountResponse::from(account)))
}

pub async fn reset_password_handler(
    State(state): State<AppState>,
    Path((tenant_id, account_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .account_service
        .reset_password(
            TenantId::from_uuid(tenant_id),
            AccountId::from_uuid(account_id),
            &payload.new_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn expiring_accounts_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ExpiringQuery>,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let accounts = state
        .account_service
        .accounts_needing_password_reset(
            TenantId::from_uuid(tenant_id),
            Utc::now(),
            query.days.unwrap_or(7),
        )
        .await?
        .into_iter()
        .map(AccountResponse::from)
        .collect();

    Ok(Json(accounts))
}

pub async fn directory_stats_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<DirectoryStats>> {
    let stats = state
        .account_service
        .directory_stats(TenantId::from_uuid(tenant_id))
        .await?;

    Ok(Json(stats))
}
