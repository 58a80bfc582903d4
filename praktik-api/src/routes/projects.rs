use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{app_state::AppState, auth::AuthUser, routes::ApiError};

pub fn router() -> Router<AppState> {
    Router::new().route("/assignment", get(assignment))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentResponse {
    project_id: Option<i32>,
    project_name: Option<String>,
    mentor_id: Option<i32>,
}

impl AssignmentResponse {
    fn unassigned() -> Self {
        Self {
            project_id: None,
            project_name: None,
            mentor_id: None,
        }
    }
}

/// The caller's current project and mentor. Lookup failures degrade to
/// "unassigned" instead of erroring — the dashboard can always render.
#[instrument(name = "assignment", skip(app_state))]
async fn assignment(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let service = &app_state.logbook_service;

    let assignment = match service.assignment(user.id).await {
        Ok(assignment) => assignment,
        Err(e) => {
            tracing::warn!("Failed to resolve assignment for {}: {}", user.id, e);
            None
        }
    };

    let Some(assignment) = assignment else {
        return Ok(Json(AssignmentResponse::unassigned()));
    };

    let project_name = match service.project_name(assignment.project_id.as_i32()).await {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Failed to load project {}: {}", assignment.project_id, e);
            None
        }
    };

    Ok(Json(AssignmentResponse {
        project_id: Some(assignment.project_id.as_i32()),
        project_name,
        mentor_id: assignment.mentor_id.map(|id| id.as_i32()),
    }))
}
