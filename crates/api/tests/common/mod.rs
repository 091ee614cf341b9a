#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Each [`TestApp`] runs the real router against an in-memory drink store
//! seeded with the water drink, and verifies tokens with the fixed test key
//! set from `coffee-shop-test-utils`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use jsonwebtoken::Algorithm;
use serde_json::Value;
use tower::ServiceExt;

use coffee_shop_api::auth::{StaticKeySource, TokenVerifier};
use coffee_shop_api::models::seed_drinks;
use coffee_shop_api::store::{DrinkStore, MemoryDrinkStore};
use coffee_shop_api::{AppState, routes};
use coffee_shop_test_utils::{TEST_AUDIENCE, jwks_json, test_issuer};

/// Test application wrapper using the real routes and state.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryDrinkStore>,
    pub state: AppState,
}

impl TestApp {
    /// Create an application whose store holds only the seed drink.
    pub async fn new() -> Self {
        let app = Self::empty();
        app.store
            .reset(seed_drinks())
            .await
            .expect("Failed to seed drinks");
        app
    }

    /// Create an application with no drinks at all.
    pub fn empty() -> Self {
        let store = Arc::new(MemoryDrinkStore::new());
        let keys = StaticKeySource::from_json(jwks_json()).expect("Failed to load test JWKS");
        let verifier = TokenVerifier::new(
            Arc::new(keys),
            TEST_AUDIENCE,
            test_issuer(),
            vec![Algorithm::RS256],
        );

        let state = AppState::from_parts(store.clone(), verifier);
        let router = routes::router(&state).with_state(state.clone());

        Self {
            router,
            store,
            state,
        }
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request and decode its JSON body.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(bearer) = bearer {
            builder = builder.header(header::AUTHORIZATION, bearer);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.request(request).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, bearer, None).await
    }

    pub async fn post(&self, uri: &str, bearer: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(bearer), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, bearer: &str, body: Value) -> (StatusCode, Value) {
        self.send("PATCH", uri, Some(bearer), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, bearer: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, Some(bearer), None).await
    }
}

/// Collect a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
