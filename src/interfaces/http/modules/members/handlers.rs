//! Member management API handlers
//!
//! Requires a verified bearer token. Role checks happen in `MemberService`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateMemberRequest, UpdateMemberRequest};
use crate::application::MemberService;
use crate::domain::Member;
use crate::interfaces::http::common::{ApiError, ErrorBody, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedMember;

#[derive(Clone)]
pub struct MemberAppState {
    pub service: Arc<MemberService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/members",
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All members", body = Vec<Member>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Admin only", body = ErrorBody)
    )
)]
pub async fn list_members(
    State(state): State<MemberAppState>,
    Extension(caller): Extension<AuthenticatedMember>,
) -> Result<Json<Vec<Member>>, ApiError> {
    Ok(Json(state.service.list(&caller.actor()).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/members/{id}",
    tag = "Members",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member details", body = Member),
        (status = 403, description = "Not this member and not admin", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_member(
    State(state): State<MemberAppState>,
    Extension(caller): Extension<AuthenticatedMember>,
    Path(id): Path<String>,
) -> Result<Json<Member>, ApiError> {
    Ok(Json(state.service.get(&caller.actor(), &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/members",
    tag = "Members",
    security(("bearer_auth" = [])),
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Admin only", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn create_member(
    State(state): State<MemberAppState>,
    Extension(caller): Extension<AuthenticatedMember>,
    ValidatedJson(request): ValidatedJson<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let draft = request.into_draft()?;
    let member = state.service.register(&caller.actor(), draft).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    put,
    path = "/api/v1/members/{id}",
    tag = "Members",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Member ID")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = Member),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Admin only", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn update_member(
    State(state): State<MemberAppState>,
    Extension(caller): Extension<AuthenticatedMember>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateMemberRequest>,
) -> Result<Json<Member>, ApiError> {
    let patch = request.into_patch()?;
    Ok(Json(state.service.update(&caller.actor(), &id, patch).await?))
}
