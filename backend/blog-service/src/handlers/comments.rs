/// Comment handlers - `/posts/{post_id}/comments/...`
///
/// The parent post always comes from the path. `author` and `post` in a
/// payload are ignored.
use crate::error::Result;
use crate::handlers::not_blank;
use crate::middleware::UserId;
use crate::services::CommentService;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchCommentRequest {
    #[validate(custom(function = "not_blank"))]
    pub text: Option<String>,
}

fn service(state: &AppState) -> CommentService {
    CommentService::new(state.store.clone())
}

pub async fn list_comments(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let comments = service(&state).list_comments(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn create_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<i64>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comment = service(&state)
        .create_comment(user_id, post_id.into_inner(), &req.text)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn get_comment(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = service(&state).get_comment(post_id, comment_id).await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn replace_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<(i64, i64)>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let (post_id, comment_id) = path.into_inner();
    let comment = service(&state)
        .update_comment(user_id, post_id, comment_id, Some(&req.text))
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn patch_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<(i64, i64)>,
    req: web::Json<PatchCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let (post_id, comment_id) = path.into_inner();
    let comment = service(&state)
        .update_comment(user_id, post_id, comment_id, req.text.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    service(&state)
        .delete_comment(user_id, post_id, comment_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
