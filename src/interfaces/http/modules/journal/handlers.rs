//! Journal HTTP handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::CreateJournalEntryRequest;
use crate::application::JournalService;
use crate::domain::reservation::parse_date;
use crate::domain::{JournalEntry, NewJournalEntry};
use crate::interfaces::http::common::{ApiError, ErrorBody, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedMember;

#[derive(Clone)]
pub struct JournalAppState {
    pub service: Arc<JournalService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/members/{id}/journal",
    tag = "Journal",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Member the entry is about")),
    request_body = CreateJournalEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = JournalEntry),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Coach or admin only", body = ErrorBody),
        (status = 404, description = "Member not found", body = ErrorBody)
    )
)]
pub async fn add_journal_entry(
    State(state): State<JournalAppState>,
    Extension(caller): Extension<AuthenticatedMember>,
    Path(member_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateJournalEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    let draft = NewJournalEntry {
        member_id,
        author_id: caller.member_id.clone(),
        date: parse_date(request.date.trim())?,
        title: request.title.trim().to_string(),
        content: request.content,
        tags: request.tags,
    };
    let entry = state.service.add_entry(&caller.actor(), draft).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/v1/members/{id}/journal",
    tag = "Journal",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Entries, newest first", body = Vec<JournalEntry>),
        (status = 403, description = "Not this member, a coach or admin", body = ErrorBody)
    )
)]
pub async fn list_journal_entries(
    State(state): State<JournalAppState>,
    Extension(caller): Extension<AuthenticatedMember>,
    Path(member_id): Path<String>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    Ok(Json(state.service.entries_for(&caller.actor(), &member_id).await?))
}
