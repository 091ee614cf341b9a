#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Coffee shop test utilities.
//!
//! Helpers for integration testing: drink fixtures, a fixed RSA signing key
//! with its published JWK set, and a builder for signed bearer tokens.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

/// Audience the test tokens are minted for.
pub const TEST_AUDIENCE: &str = "coffee";

/// Identity provider domain used by the test configuration.
pub const TEST_DOMAIN: &str = "coffee-shop.test.auth0.com";

/// Key identifier of the published test key.
pub const TEST_KID: &str = "coffee-shop-test-key";

const SIGNING_KEY_PEM: &str = include_str!("../fixtures/signing_key.pem");
const ROGUE_KEY_PEM: &str = include_str!("../fixtures/rogue_key.pem");
const JWKS_JSON: &str = include_str!("../fixtures/jwks.json");

/// Issuer the test tokens claim.
pub fn test_issuer() -> String {
    format!("https://{TEST_DOMAIN}/")
}

/// The published key set (public half of the signing key) as JSON text.
pub fn jwks_json() -> &'static str {
    JWKS_JSON
}

/// Every permission the coffee shop API checks.
pub const ALL_PERMISSIONS: [&str; 4] = [
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

/// Create a test drink with a single ingredient.
pub fn test_drink(title: &str) -> TestDrink {
    TestDrink {
        title: title.to_string(),
        recipe: vec![json!({"color": "blue", "name": "water", "parts": 1})],
    }
}

/// A test drink builder for request bodies.
#[derive(Debug, Clone)]
pub struct TestDrink {
    pub title: String,
    pub recipe: Vec<JsonValue>,
}

impl TestDrink {
    /// Replace the recipe with no ingredients.
    pub fn without_ingredients(mut self) -> Self {
        self.recipe.clear();
        self
    }

    /// Add an ingredient.
    pub fn with_ingredient(mut self, color: &str, name: &str, parts: i64) -> Self {
        self.recipe
            .push(json!({"color": color, "name": name, "parts": parts}));
        self
    }

    /// JSON body for `POST /drinks` with the recipe as an array.
    pub fn body(&self) -> JsonValue {
        json!({
            "title": self.title,
            "recipe": self.recipe,
        })
    }
}

/// Claims carried by test tokens.
#[derive(Debug, Clone, Serialize)]
struct TestClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<String>,
    sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<String>,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<Vec<String>>,
}

/// Create a token builder carrying the given permissions.
pub fn test_token(permissions: &[&str]) -> TestToken {
    let now = chrono::Utc::now().timestamp();
    TestToken {
        issuer: Some(test_issuer()),
        audience: Some(TEST_AUDIENCE.to_string()),
        subject: "auth0|barista".to_string(),
        kid: Some(TEST_KID.to_string()),
        issued_at: now,
        expires_at: now + 3600,
        permissions: Some(permissions.iter().map(|p| p.to_string()).collect()),
        rogue_signature: false,
    }
}

/// A signed bearer token builder.
#[derive(Debug, Clone)]
pub struct TestToken {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub subject: String,
    pub kid: Option<String>,
    pub issued_at: i64,
    pub expires_at: i64,
    pub permissions: Option<Vec<String>>,
    rogue_signature: bool,
}

impl TestToken {
    /// Drop the `permissions` claim entirely.
    pub fn without_permissions_claim(mut self) -> Self {
        self.permissions = None;
        self
    }

    /// Set an expiry in the past.
    pub fn expired(mut self) -> Self {
        let now = chrono::Utc::now().timestamp();
        self.issued_at = now - 7200;
        self.expires_at = now - 3600;
        self
    }

    /// Set the audience.
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.audience = Some(audience.to_string());
        self
    }

    /// Drop the `aud` claim entirely.
    pub fn without_audience(mut self) -> Self {
        self.audience = None;
        self
    }

    /// Set the issuer.
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    /// Drop the `iss` claim entirely.
    pub fn without_issuer(mut self) -> Self {
        self.issuer = None;
        self
    }

    /// Set the key identifier in the token header.
    pub fn with_kid(mut self, kid: &str) -> Self {
        self.kid = Some(kid.to_string());
        self
    }

    /// Omit the key identifier from the token header.
    pub fn without_kid(mut self) -> Self {
        self.kid = None;
        self
    }

    /// Sign with a key that is not in the published set, keeping the published kid.
    pub fn signed_by_rogue_key(mut self) -> Self {
        self.rogue_signature = true;
        self
    }

    /// Encode and sign the token.
    pub fn sign(&self) -> String {
        let pem = if self.rogue_signature {
            ROGUE_KEY_PEM
        } else {
            SIGNING_KEY_PEM
        };
        let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("fixture key is valid PEM");

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.kid.clone();

        let claims = TestClaims {
            iss: self.issuer.clone(),
            sub: self.subject.clone(),
            aud: self.audience.clone(),
            iat: self.issued_at,
            exp: self.expires_at,
            permissions: self.permissions.clone(),
        };

        jsonwebtoken::encode(&header, &claims, &key).expect("signing test token failed")
    }

    /// `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.sign())
    }
}

/// Assertion helpers for JSON responses.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value lacks a specific key.
    pub fn lacks_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_none(),
            "Expected JSON to NOT have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value equals expected.
    pub fn json_eq(actual: &Value, expected: &Value) {
        assert_eq!(
            actual,
            expected,
            "JSON mismatch:\nactual: {}\nexpected: {}",
            serde_json::to_string_pretty(actual).unwrap(),
            serde_json::to_string_pretty(expected).unwrap()
        );
    }

    /// Assert that a response body is the standard error envelope.
    pub fn error_envelope(body: &Value, status: u16, message: &str) {
        json_eq(
            body,
            &serde_json::json!({
                "success": false,
                "error": status,
                "message": message,
            }),
        );
    }
}
