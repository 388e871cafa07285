//! Comment API handlers.
//!
//! ```text
//! GET  /api/v1/comments         list, optional ?author= filter
//! GET  /api/v1/comments/{id}
//! POST /api/v1/me/comments      (protected) {"body":"hello"}
//! ```
//!
//! Listing endpoints are public; posting requires a resolved identity, which
//! becomes the comment's opaque author reference. Author display data is not
//! joined in; clients combine with the user endpoints when they need it.

use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthorRef, Comment, CommentId, Error};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;
use crate::middleware::CurrentIdentity;

/// Comment creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub body: String,
}

/// Optional listing filter.
#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    #[serde(default)]
    pub author: Option<String>,
}

/// Public view of a comment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id().to_string(),
            author: comment.author().to_string(),
            body: comment.body().as_str().to_owned(),
            created_at: comment.created_at(),
        }
    }
}

/// List comments in creation order, optionally for one author reference.
#[get("/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    query: web::Query<CommentListQuery>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let comments = match &query.author {
        Some(author) => {
            let author = AuthorRef::new(author.clone())
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            state.comments.all_by_author(&author).await?
        }
        None => state.comments.all().await?,
    };
    Ok(web::Json(
        comments.iter().map(CommentResponse::from).collect(),
    ))
}

/// Fetch a single comment.
#[get("/comments/{id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CommentResponse>> {
    let id =
        CommentId::new(path.as_str()).map_err(|err| Error::invalid_request(err.to_string()))?;
    let comment = state.comments.get(&id).await?;
    Ok(web::Json(CommentResponse::from(&comment)))
}

/// Post a comment as the authenticated caller, mounted under the protected
/// `/me` scope.
#[post("/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    // The caller's user id is a valid author reference by construction;
    // surface a failure as an internal error so regressions are caught.
    let author = AuthorRef::new(identity.user().id().to_string())
        .map_err(|err| Error::internal(format!("invalid author reference: {err}")))?;
    let comment = state.comments.create(author, &payload.body).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(&comment)))
}
