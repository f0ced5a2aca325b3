use std::sync::Arc;
use teamdesk_api::Application;
use teamdesk_infra::{Config, InMemoryDispatcher, TeamdeskContext};
use teamdesk_sdk::TeamdeskSDK;

pub struct TestApp {
    pub config: Config,
    /// Shares the repositories with the running application
    pub ctx: TeamdeskContext,
    pub dispatcher: Arc<InMemoryDispatcher>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, TeamdeskSDK, String) {
    spawn_app_with_secret(None).await
}

pub async fn spawn_app_with_secret(secret: Option<&str>) -> (TestApp, TeamdeskSDK, String) {
    let mut ctx = TeamdeskContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.task_reminder_secret = secret.map(String::from);
    // Reminders are due right after the assignment
    ctx.config.reminder_policy.first_reminder_delay_minutes = 0;
    let dispatcher = Arc::new(InMemoryDispatcher::new());
    ctx.dispatcher = dispatcher.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = TeamdeskSDK::new(address.clone(), config.internal_api_key.clone());
    let app = TestApp {
        config,
        ctx,
        dispatcher,
    };
    (app, sdk, address)
}
