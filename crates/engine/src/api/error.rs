//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use eragenetica_shared::{CharacterSheetView, ErrorCode, ErrorInfo, RosterView};

use crate::use_cases::{AdminRoster, CharacterSheet, CharacterSheetError, RosterError};

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    Forbidden(ErrorInfo),
    NotFound(ErrorInfo),
    BadRequest(ErrorInfo),
    /// A store read or write failed; the sheet carries the error.
    Sheet(Box<CharacterSheetView>),
    /// A store read or write failed; the roster carries the error.
    Roster(RosterView),
    Internal(String),
}

impl ApiError {
    /// The caller lacks the admin claim.
    pub fn forbidden() -> Self {
        Self::Forbidden(ErrorInfo::new(ErrorCode::PermissionDenied))
    }

    /// Map a sheet operation failure. Store failures answer with the sheet
    /// itself so the client keeps rendering its content next to the error.
    pub fn from_sheet(sheet: &CharacterSheet, error: CharacterSheetError) -> Self {
        if error.is_store_failure() {
            return Self::Sheet(Box::new(sheet.view()));
        }
        tracing::debug!(error = %error, "Character sheet request rejected");
        let info = error.user_message();
        if error.is_not_found() {
            Self::NotFound(info)
        } else {
            Self::BadRequest(info)
        }
    }

    /// Map a roster operation failure. Store failures answer with the roster
    /// view carrying the error.
    pub fn from_roster(roster: &AdminRoster, error: RosterError) -> Self {
        match error {
            RosterError::NotAdmin(ref uid) => Self::Forbidden(error.user_message(uid)),
            RosterError::Domain(e) => {
                tracing::debug!(error = %e, "Roster request rejected");
                Self::BadRequest(ErrorInfo::new(ErrorCode::InvalidRequest))
            }
            RosterError::Load(_) | RosterError::Save(_) => Self::Roster(roster.view()),
        }
    }
}

/// HTTP status for an error recorded on a view.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorCode::CharacterNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::LoadFailed
        | ErrorCode::SaveFailed
        | ErrorCode::RosterLoadFailed
        | ErrorCode::OrderSaveFailed => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorInfo::new(ErrorCode::Unauthenticated)),
            )
                .into_response(),
            ApiError::Forbidden(info) => (StatusCode::FORBIDDEN, Json(info)).into_response(),
            ApiError::NotFound(info) => (StatusCode::NOT_FOUND, Json(info)).into_response(),
            ApiError::BadRequest(info) => (StatusCode::BAD_REQUEST, Json(info)).into_response(),
            ApiError::Sheet(view) => {
                let status = view
                    .error
                    .as_ref()
                    .map(|e| status_for(e.code))
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, Json(*view)).into_response()
            }
            ApiError::Roster(view) => {
                let status = view
                    .error
                    .as_ref()
                    .map(|e| status_for(e.code))
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, Json(view)).into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}
