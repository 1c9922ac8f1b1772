/// HTTP handlers for the blog API
///
/// - Auth: credential exchange for access tokens
/// - Posts: list, create, read, update and delete posts
/// - Comments: the same operations nested under a post
/// - Groups: read-only listing and lookup
/// - Health: liveness and readiness checks
///
/// Everything except the token exchange sits behind `JwtAuthMiddleware`.
use crate::error::AppError;
use crate::middleware::JwtAuthMiddleware;
use actix_web::web;

pub mod auth;
pub mod comments;
pub mod groups;
pub mod health;
pub mod posts;

/// Malformed JSON bodies become validation errors
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

/// An identifier that does not parse cannot name an existing row
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::NotFound(err.to_string()).into())
}

/// Register the API routes; mounted under `/api/v1` by the server.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/api-token-auth/", web::post().to(auth::obtain_token))
        .service(
            web::scope("/posts")
                .wrap(JwtAuthMiddleware)
                .service(
                    web::resource("/")
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post)),
                )
                .service(
                    web::resource("/{post_id}/")
                        .route(web::get().to(posts::get_post))
                        .route(web::put().to(posts::replace_post))
                        .route(web::patch().to(posts::patch_post))
                        .route(web::delete().to(posts::delete_post)),
                )
                .service(
                    web::resource("/{post_id}/comments/")
                        .route(web::get().to(comments::list_comments))
                        .route(web::post().to(comments::create_comment)),
                )
                .service(
                    web::resource("/{post_id}/comments/{comment_id}/")
                        .route(web::get().to(comments::get_comment))
                        .route(web::put().to(comments::replace_comment))
                        .route(web::patch().to(comments::patch_comment))
                        .route(web::delete().to(comments::delete_comment)),
                ),
        )
        .service(
            web::scope("/groups")
                .wrap(JwtAuthMiddleware)
                .service(web::resource("/").route(web::get().to(groups::list_groups)))
                .service(web::resource("/{group_id}/").route(web::get().to(groups::get_group))),
        );
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub(crate) fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("This field may not be blank.".into());
        return Err(err);
    }
    Ok(())
}
