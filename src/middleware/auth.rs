use std::collections::HashSet;

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::Claims;
use crate::config;

/// Caller identity extracted from the request credential. An unauthenticated
/// request resolves to an anonymous identity with an empty role set; the
/// authorization guard turns that into a 401, not this layer.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub name: String,
    pub roles: HashSet<String>,
}

impl AuthUser {
    pub fn anonymous() -> Self {
        Self {
            name: String::new(),
            roles: HashSet::new(),
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            name: claims.name,
            roles: claims.roles.into_iter().collect(),
        }
    }
}

/// JWT identity middleware: resolves the caller's display name and role
/// claims and injects them into the request. Pure extraction, no admission
/// decision here.
pub async fn jwt_auth_middleware(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let auth_user = match extract_jwt_from_headers(&headers) {
        Ok(token) => match validate_jwt(&token) {
            Ok(claims) => AuthUser::from(claims),
            Err(msg) => {
                tracing::debug!("Rejecting credential: {}", msg);
                AuthUser::anonymous()
            }
        },
        Err(_) => AuthUser::anonymous(),
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}
