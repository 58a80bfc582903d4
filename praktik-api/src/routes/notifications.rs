use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::repositories::PushSubscriptionRepository;
use crate::{app_state::AppState, auth::AuthUser, repositories::NewPushSubscription};

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}

#[instrument(name = "subscribe", skip(user, app_state, body))]
async fn subscribe(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(body): Json<web_push::SubscriptionInfo>,
) -> Result<StatusCode, (StatusCode, String)> {
    let push_subscription_repo = app_state.push_subscriptions_repo.clone();

    let new_push_subscription = NewPushSubscription {
        user_id: user.id.as_i32(),
        device: "NOT IMPLEMENTED".to_string(),
        endpoint: body.endpoint,
        auth: body.keys.auth,
        p256dh: body.keys.p256dh,
    };

    push_subscription_repo
        .upsert_push_subscription(new_push_subscription)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert push subscription: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to upsert push subscription".to_string(),
            )
        })?;

    Ok(StatusCode::OK)
}
