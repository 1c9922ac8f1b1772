/// Token exchange - `POST /api-token-auth/`
use crate::error::Result;
use crate::services::AuthService;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Exchange username and password for a bearer token
pub async fn obtain_token(
    state: web::Data<AppState>,
    req: web::Json<TokenRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new(state.store.clone());
    let token = service
        .obtain_token(&req.username, &req.password, state.settings.token_ttl)
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
