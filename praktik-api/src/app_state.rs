use std::sync::Arc;

use sqlx::PgPool;
use url::Url;

use crate::config::Settings;
use crate::domain::services::LogbookService;
use crate::domain::Notifier;
use crate::repositories::PushSubscriptionRepositoryImpl;

#[derive(Clone)]
pub struct AppState {
    pub app_url: Url,
    pub logbook_service: Arc<LogbookService>,
    pub push_subscriptions_repo: Arc<PushSubscriptionRepositoryImpl>,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: &Settings) -> Self {
        let app_url = Url::parse(&config.application.app_url).expect("Invalid app URL");

        let notifier = Arc::new(
            Notifier::new(
                db_pool.clone(),
                config.notifications.vapid_private_key.clone(),
            )
            .expect("Failed to create web push client"),
        );
        let logbook_service = Arc::new(LogbookService::new(db_pool.clone(), notifier));
        let push_subscriptions_repo = Arc::new(PushSubscriptionRepositoryImpl::new(db_pool));

        Self {
            app_url,
            logbook_service,
            push_subscriptions_repo,
        }
    }
}
