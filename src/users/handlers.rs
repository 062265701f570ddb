use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::ApiError, gate::Granted};

use super::{management::UserManagement, Staff};

/// Name of the identity provider role whose holders can not be renamed.
const ADMINISTRATOR_ROLE: &str = "Administrator";

#[derive(Debug, Deserialize)]
pub struct RolePayload {
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsernamePayload {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum RoleChange {
    Add,
    Remove,
}

type Created = (StatusCode, Json<Value>);

pub async fn add_barista<U>(
    _: Granted,
    State(staff): State<Staff<U>>,
    payload: Result<Json<RolePayload>, JsonRejection>,
) -> Result<Created, ApiError>
where
    U: UserManagement + Send + Sync,
{
    let role = staff.roles().barista.clone();

    change_role(&staff, role, RoleChange::Add, payload, "User added to barista role").await
}

pub async fn remove_barista<U>(
    _: Granted,
    State(staff): State<Staff<U>>,
    payload: Result<Json<RolePayload>, JsonRejection>,
) -> Result<Created, ApiError>
where
    U: UserManagement + Send + Sync,
{
    let role = staff.roles().barista.clone();

    change_role(&staff, role, RoleChange::Remove, payload, "Barista role has been removed").await
}

pub async fn add_manager<U>(
    _: Granted,
    State(staff): State<Staff<U>>,
    payload: Result<Json<RolePayload>, JsonRejection>,
) -> Result<Created, ApiError>
where
    U: UserManagement + Send + Sync,
{
    let role = staff.roles().manager.clone();

    change_role(&staff, role, RoleChange::Add, payload, "User added to manager role").await
}

pub async fn remove_manager<U>(
    _: Granted,
    State(staff): State<Staff<U>>,
    payload: Result<Json<RolePayload>, JsonRejection>,
) -> Result<Created, ApiError>
where
    U: UserManagement + Send + Sync,
{
    let role = staff.roles().manager.clone();

    change_role(&staff, role, RoleChange::Remove, payload, "Manager role has been removed").await
}

#[tracing::instrument(skip(staff, payload, message))]
async fn change_role<U>(
    staff: &Staff<U>,
    role: String,
    change: RoleChange,
    payload: Result<Json<RolePayload>, JsonRejection>,
    message: &'static str,
) -> Result<Created, ApiError>
where
    U: UserManagement + Send + Sync,
{
    let Json(payload) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let user_id = payload
        .user_id
        .filter(|user_id| !user_id.is_empty())
        .ok_or_else(|| ApiError::Unprocessable(String::from("user_id required")))?;

    let roles = [role];

    let result = match change {
        RoleChange::Add => staff.management().add_roles(&user_id, &roles).await,
        RoleChange::Remove => staff.management().remove_roles(&user_id, &roles).await,
    };

    result.map_err(|err| {
        tracing::error!(%err, %user_id, "Role change failed");

        match change {
            RoleChange::Add => ApiError::Internal(String::from("error adding role")),
            RoleChange::Remove => ApiError::Internal(String::from("error removing role")),
        }
    })?;

    tracing::info!(%user_id, "Role changed");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": message,
        })),
    ))
}

/// Renames a barista. The body's `user_id` wins over the path id.
#[tracing::instrument(skip_all)]
pub async fn update_barista<U>(
    _: Granted,
    State(staff): State<Staff<U>>,
    Path(barista_id): Path<String>,
    payload: Result<Json<UsernamePayload>, JsonRejection>,
) -> Result<Created, ApiError>
where
    U: UserManagement + Send + Sync,
{
    let Json(payload) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let user_id = payload.user_id.unwrap_or(barista_id);

    let (false, Some(username)) = (user_id.is_empty(), payload.username) else {
        return Err(ApiError::BadRequest(String::from("Error in body data")));
    };

    let roles = staff
        .management()
        .list_roles(&user_id)
        .await
        .map_err(|err| {
            tracing::error!(%err, %user_id, "Listing roles failed");

            ApiError::Internal(String::from("Error updating username"))
        })?;

    if roles.iter().any(|role| role.name == ADMINISTRATOR_ROLE) {
        return Err(ApiError::Forbidden(String::from(
            "User is an admin, cant update",
        )));
    }

    staff
        .management()
        .update_username(&user_id, &username)
        .await
        .map_err(|err| {
            tracing::error!(%err, %user_id, "Username update failed");

            ApiError::Internal(String::from("Error updating username"))
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Username updated",
        })),
    ))
}
