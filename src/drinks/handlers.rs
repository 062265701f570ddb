use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use http::StatusCode;
use serde_json::{json, Value};

use crate::{error::ApiError, gate::Granted};

use super::{
    model::{Drink, DrinkPayload, TITLE_MAX_LEN},
    store::DrinkStore,
};

pub async fn list_drinks(State(store): State<DrinkStore>) -> Json<Value> {
    let drinks = store.all().await;

    Json(json!({
        "success": true,
        "drinks": drinks.iter().map(Drink::short).collect::<Vec<_>>(),
    }))
}

pub async fn drinks_detail(_: Granted, State(store): State<DrinkStore>) -> Json<Value> {
    let drinks = store.all().await;

    Json(json!({
        "success": true,
        "drinks": drinks,
    }))
}

#[tracing::instrument(skip_all)]
pub async fn create_drink(
    _: Granted,
    State(store): State<DrinkStore>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;

    let (Some(title), Some(recipe)) = (payload.title, payload.recipe) else {
        return Err(ApiError::BadRequest(String::from(
            "title and recipe required",
        )));
    };

    let drink = store.insert(checked_title(title)?, recipe.into()).await?;

    tracing::info!(id = drink.id, "Drink created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "drinks": [drink],
        })),
    ))
}

#[tracing::instrument(skip_all)]
pub async fn update_drink(
    _: Granted,
    State(store): State<DrinkStore>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id.map_err(unknown_drink)?;
    let Json(payload) = payload.map_err(bad_body)?;

    if payload.title.is_none() && payload.recipe.is_none() {
        return Err(ApiError::BadRequest(String::from(
            "title or recipe required",
        )));
    }

    let title = payload.title.map(checked_title).transpose()?;
    let recipe = payload.recipe.map(Into::into);

    let drink = store.update(id, title, recipe).await?;

    Ok(Json(json!({
        "success": true,
        "drinks": [drink],
    })))
}

#[tracing::instrument(skip_all)]
pub async fn delete_drink(
    _: Granted,
    State(store): State<DrinkStore>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id.map_err(unknown_drink)?;

    store.delete(id).await?;

    Ok(Json(json!({
        "success": true,
        "delete": id,
    })))
}

fn checked_title(title: String) -> Result<String, ApiError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ApiError::BadRequest(String::from("title must not be empty")));
    }

    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ApiError::Unprocessable(format!(
            "title must be at most {TITLE_MAX_LEN} characters"
        )));
    }

    Ok(title.to_string())
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Drink ids are numeric, anything else names no drink.
fn unknown_drink(rejection: PathRejection) -> ApiError {
    tracing::debug!(%rejection, "Invalid drink id");

    ApiError::NotFound(String::from("drink not found"))
}
