use futures::future;
use serde::Serialize;
use sqlx::PgPool;
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessage, WebPushMessageBuilder, URL_SAFE,
};

use crate::repositories::{PushSubscriptionRepository, PushSubscriptionRepositoryImpl};

use super::models::UserId;

#[derive(Debug, Serialize)]
pub struct PushNotification {
    title: String,
    body: String,
    icon: Option<String>,
}

impl From<&PushNotification> for Vec<u8> {
    fn from(notification: &PushNotification) -> Self {
        serde_json::to_vec(notification).expect("Could not serialize notification")
    }
}

impl PushNotification {
    pub fn new(title: &str, body: &str, icon: Option<&str>) -> Self {
        PushNotification {
            title: title.to_string(),
            body: body.to_string(),
            icon: icon.map(|s| s.to_string()),
        }
    }

    pub fn to_web_push_message(
        &self,
        sub_info: &SubscriptionInfo,
        vapid_private_key: &str,
    ) -> Result<WebPushMessage, WebPushError> {
        let sig_builder =
            VapidSignatureBuilder::from_base64(vapid_private_key, URL_SAFE, sub_info)?.build()?;

        let content_as_bytes: Vec<u8> = self.into();

        let mut builder = WebPushMessageBuilder::new(sub_info);
        builder.set_payload(ContentEncoding::Aes128Gcm, &content_as_bytes);
        builder.set_vapid_signature(sig_builder);

        builder.build()
    }
}

/// Web Push fan-out for lifecycle events. Fire-and-forget: a failed send
/// is logged and swallowed, it never rolls back the transition that
/// triggered it.
pub struct Notifier {
    push_subscriptions_repo: PushSubscriptionRepositoryImpl,
    web_push_client: IsahcWebPushClient,
    vapid_private_key: String,
}

impl Notifier {
    pub fn new(db_pool: PgPool, vapid_private_key: String) -> Result<Self, WebPushError> {
        Ok(Self {
            push_subscriptions_repo: PushSubscriptionRepositoryImpl::new(db_pool),
            web_push_client: IsahcWebPushClient::new()?,
            vapid_private_key,
        })
    }

    pub async fn notify_user(&self, user_id: UserId, notification: PushNotification) {
        let subscriptions = match self
            .push_subscriptions_repo
            .get_user_push_subscriptions(user_id.as_i32())
            .await
        {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                tracing::warn!("Failed to load push subscriptions for {}: {:?}", user_id, e);
                return;
            }
        };

        let sends = subscriptions.iter().map(|subscriber| {
            let endpoint = subscriber.endpoint.clone();
            let message =
                notification.to_web_push_message(&subscriber.as_subscription_info(), &self.vapid_private_key);

            async move {
                match message {
                    Ok(message) => match self.web_push_client.send(message).await {
                        Ok(_) => {
                            tracing::info!("Sent notification to {}", endpoint);
                        }
                        Err(e) => {
                            tracing::error!("Failed to send notification to {}: {}", endpoint, e);
                        }
                    },
                    Err(e) => {
                        tracing::error!("Failed to build push message for {}: {}", endpoint, e);
                    }
                }
            }
        });

        future::join_all(sends).await;
    }
}
