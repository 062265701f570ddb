//! Route table: which operation sits behind which gate.

use axum::{
    extract::FromRef,
    routing::{delete, get, patch, post},
    Router,
};

use crate::{
    authorize::{jwt::TokenVerifier, permission::PermissionRequirement},
    drinks::{self, DrinkStore},
    error::ApiError,
    gate::RequestGate,
    users::{self, Staff, UserManagement},
};

#[derive(Debug)]
pub struct AppState<U> {
    pub drinks: DrinkStore,
    pub staff: Staff<U>,
}

impl<U> Clone for AppState<U> {
    fn clone(&self) -> Self {
        Self {
            drinks: self.drinks.clone(),
            staff: self.staff.clone(),
        }
    }
}

impl<U> FromRef<AppState<U>> for DrinkStore {
    fn from_ref(state: &AppState<U>) -> Self {
        state.drinks.clone()
    }
}

impl<U> FromRef<AppState<U>> for Staff<U> {
    fn from_ref(state: &AppState<U>) -> Self {
        state.staff.clone()
    }
}

pub fn router<V, U>(verifier: V, state: AppState<U>) -> Router
where
    V: TokenVerifier + Clone + Send + Sync + 'static,
    U: UserManagement + Send + Sync + 'static,
{
    let gate = |requirement: PermissionRequirement| {
        RequestGate::authorized(verifier.clone(), requirement).layer()
    };

    Router::new()
        .route(
            "/drinks",
            get(drinks::list_drinks)
                .merge(post(drinks::create_drink).route_layer(gate("post:drinks".into()))),
        )
        .route(
            "/drinks-detail",
            get(drinks::drinks_detail).route_layer(gate("get:drinks-detail".into())),
        )
        .route(
            "/drinks/:id",
            patch(drinks::update_drink)
                .route_layer(gate("patch:drinks".into()))
                .merge(delete(drinks::delete_drink).route_layer(gate("delete:drinks".into()))),
        )
        .route(
            "/baristas/edit",
            post(users::add_barista::<U>)
                .delete(users::remove_barista::<U>)
                .route_layer(gate(PermissionRequirement::any_of([
                    "post:baristas",
                    "post:managers",
                ]))),
        )
        .route(
            "/managers/edit",
            post(users::add_manager::<U>)
                .delete(users::remove_manager::<U>)
                .route_layer(gate("post:managers".into())),
        )
        .route(
            "/baristas/:barista_id",
            patch(users::update_barista::<U>).route_layer(gate(PermissionRequirement::any_of([
                "update:baristas",
                "update:managers",
            ]))),
        )
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound(String::from("resource not found"))
}
