use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::Role,
    repositories::AuditRecord,
    routes::ApiError,
};

const AUDIT_PAGE_SIZE: i64 = 100;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(recent))
}

#[instrument(name = "recent_audit", skip(app_state))]
async fn recent(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<AuditRecord>>, ApiError> {
    if !user.role.grants(Role::Superuser) {
        return Err(ApiError::forbidden("insufficient role"));
    }

    let records = app_state
        .logbook_service
        .recent_audit(AUDIT_PAGE_SIZE)
        .await?;

    Ok(Json(records))
}
