mod telemetry;

use std::io::{Error, ErrorKind};
use teamdesk_api::Application;
use teamdesk_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("teamdesk".into(), "info".into());
    init_subscriber(subscriber);

    run_migration()
        .await
        .map_err(|e| Error::new(ErrorKind::Other, e))?;

    let context = setup_context()
        .await
        .map_err(|e| Error::new(ErrorKind::Other, e))?;

    let app = Application::new(context).await?;
    app.start().await
}
