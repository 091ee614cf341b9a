//! Drink menu routes.
//!
//! `GET /drinks` is public and shows the short view. Everything else is
//! wrapped with [`requires_auth`] and answers with the long view.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::{
    Claims, DELETE_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS, requires_auth,
};
use crate::error::ApiResult;
use crate::models::{Drink, DrinkInput};
use crate::models::drink::{LongDrink, ShortDrink};
use crate::state::AppState;

/// Listing or mutation response.
#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

/// Deletion response.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i32,
}

impl<T> DrinksResponse<T> {
    fn ok(drinks: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            drinks,
        })
    }
}

/// GET /drinks: all drinks, short view.
async fn list_drinks(State(state): State<AppState>) -> ApiResult<Json<DrinksResponse<ShortDrink>>> {
    let drinks = state.store().list_all().await?;

    Ok(DrinksResponse::ok(drinks.iter().map(Drink::short).collect()))
}

/// GET /drinks-detail: all drinks, long view.
async fn list_drinks_detail(
    claims: Claims,
    State(state): State<AppState>,
) -> ApiResult<Json<DrinksResponse<LongDrink>>> {
    let drinks = state.store().list_all().await?;
    debug!(sub = %claims.sub, count = drinks.len(), "detail listing");

    Ok(DrinksResponse::ok(drinks.iter().map(Drink::long).collect()))
}

/// POST /drinks: create a drink from the supplied fields.
async fn create_drink(
    claims: Claims,
    State(state): State<AppState>,
    body: Result<Json<DrinkInput>, JsonRejection>,
) -> ApiResult<Json<DrinksResponse<LongDrink>>> {
    let Json(input) = body?;

    let drink = state.store().insert(input).await?;
    info!(id = drink.id, title = %drink.title, sub = %claims.sub, "drink created");

    Ok(DrinksResponse::ok(vec![drink.long()]))
}

/// PATCH /drinks/{id}: replace the supplied fields of a drink.
async fn update_drink(
    claims: Claims,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<DrinkInput>, JsonRejection>,
) -> ApiResult<Json<DrinksResponse<LongDrink>>> {
    let Path(id) = id?;

    // An unknown id is 404 whatever the body holds
    let mut drink = state.store().get_by_id(id).await?;
    let Json(input) = body?;
    drink.apply(input);
    let drink = state.store().update(&drink).await?;
    info!(id = drink.id, sub = %claims.sub, "drink updated");

    Ok(DrinksResponse::ok(vec![drink.long()]))
}

/// DELETE /drinks/{id}: remove a drink.
async fn delete_drink(
    claims: Claims,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(id) = id?;

    let drink = state.store().get_by_id(id).await?;
    state.store().delete(&drink).await?;
    info!(id = drink.id, sub = %claims.sub, "drink deleted");

    Ok(Json(DeleteResponse {
        success: true,
        delete: drink.id,
    }))
}

/// Create the drinks router.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/drinks",
            get(list_drinks).merge(requires_auth(state, POST_DRINKS, post(create_drink))),
        )
        .route(
            "/drinks-detail",
            requires_auth(state, GET_DRINKS_DETAIL, get(list_drinks_detail)),
        )
        .route(
            "/drinks/{id}",
            requires_auth(state, PATCH_DRINKS, patch(update_drink))
                .merge(requires_auth(state, DELETE_DRINKS, delete(delete_drink))),
        )
}
