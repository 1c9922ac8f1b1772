/// Post handlers - HTTP endpoints for post operations
///
/// Request bodies carry no author; the author is always the caller.
use crate::error::{AppError, Result};
use crate::handlers::not_blank;
use crate::middleware::UserId;
use crate::models::{Page, Post, PostChanges, PostFields};
use crate::services::PostService;
use crate::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Body for `POST /posts/` and `PUT /posts/{id}/`
#[derive(Debug, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub group: Option<i64>,
}

impl From<PostRequest> for PostFields {
    fn from(req: PostRequest) -> Self {
        PostFields {
            text: req.text,
            image: req.image,
            group: req.group,
        }
    }
}

/// Body for `PATCH /posts/{id}/`
///
/// An absent key leaves the field alone; an explicit `null` clears `image`
/// or `group`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PatchPostRequest {
    #[validate(custom(function = "not_blank"))]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub group: Option<Option<i64>>,
}

/// Marks a key that appeared in the payload, even with a `null` value.
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<PatchPostRequest> for PostChanges {
    fn from(req: PatchPostRequest) -> Self {
        PostChanges {
            text: req.text,
            image: req.image,
            group: req.group,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Limit/offset envelope returned when `limit` is given
#[derive(Debug, Serialize)]
pub struct PaginatedPosts {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Post>,
}

fn service(state: &AppState) -> PostService {
    PostService::new(state.store.clone())
}

/// Current request URL with `limit`/`offset` replaced.
fn page_url(req: &HttpRequest, limit: i64, offset: i64) -> String {
    let mut url = req.full_url();
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| *key != "limit" && *key != "offset")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("limit", &limit.to_string());
        if offset > 0 {
            pairs.append_pair("offset", &offset.to_string());
        }
    }

    url.to_string()
}

/// Validate `limit`/`offset`, capping `limit` at the configured page size.
fn resolve_page(query: &ListPostsQuery, max_page_size: i64) -> Result<Option<Page>> {
    let Some(limit) = query.limit else {
        return Ok(None);
    };

    if limit <= 0 {
        return Err(AppError::ValidationError(
            "limit must be a positive integer".to_string(),
        ));
    }

    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(AppError::ValidationError(
            "offset must not be negative".to_string(),
        ));
    }

    let limit = limit.min(max_page_size);
    if offset > i64::MAX - limit {
        return Err(AppError::ValidationError("offset is too large".to_string()));
    }

    Ok(Some(Page { limit, offset }))
}

/// List posts, paginated when `limit` is present
pub async fn list_posts(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse> {
    let service = service(&state);

    let Some(page) = resolve_page(&query, state.settings.max_page_size)? else {
        let posts = service.list_posts(None).await?;
        return Ok(HttpResponse::Ok().json(posts));
    };

    let count = service.count_posts().await?;
    let results = service.list_posts(Some(page)).await?;

    let next_offset = page.offset.saturating_add(page.limit);
    let next = (next_offset < count).then(|| page_url(&req, page.limit, next_offset));
    let previous = (page.offset > 0)
        .then(|| page_url(&req, page.limit, (page.offset - page.limit).max(0)));

    Ok(HttpResponse::Ok().json(PaginatedPosts {
        count,
        next,
        previous,
        results,
    }))
}

pub async fn create_post(
    state: web::Data<AppState>,
    user_id: UserId,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = service(&state)
        .create_post(user_id, req.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(post))
}

pub async fn get_post(state: web::Data<AppState>, post_id: web::Path<i64>) -> Result<HttpResponse> {
    let post = service(&state).get_post(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Full update: fields missing from the body are reset
pub async fn replace_post(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<i64>,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let changes = PostChanges::replace_all(req.into_inner().into());
    let post = service(&state)
        .update_post(user_id, post_id.into_inner(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn patch_post(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<i64>,
    req: web::Json<PatchPostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = service(&state)
        .update_post(user_id, post_id.into_inner(), req.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn delete_post(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    service(&state)
        .delete_post(user_id, post_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
