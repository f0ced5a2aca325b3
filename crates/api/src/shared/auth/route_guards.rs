use crate::error::TeamdeskError;
use actix_web::HttpRequest;
use teamdesk_infra::TeamdeskContext;
use teamdesk_utils::secrets_match;
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const TASK_REMINDER_SECRET_HEADER: &str = "x-task-reminder-secret";

fn header_value<'a>(http_req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    http_req
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}

/// Only callers knowing the internal api key may drive the task workflow
pub fn protect_internal_route(
    http_req: &HttpRequest,
    ctx: &TeamdeskContext,
) -> Result<(), TeamdeskError> {
    match header_value(http_req, API_KEY_HEADER) {
        Some(api_key) if secrets_match(api_key, &ctx.config.internal_api_key) => Ok(()),
        Some(_) => Err(TeamdeskError::Unauthorized(
            "The provided api key is not valid".into(),
        )),
        None => Err(TeamdeskError::Unauthorized(format!(
            "Expected the api key in the `{}` header",
            API_KEY_HEADER
        ))),
    }
}

/// Guards the reminder processing endpoint with the shared secret. The secret is
/// accepted from the `x-task-reminder-secret` header or the `secret` query parameter.
///
/// Without a configured secret every request is let through.
pub fn protect_reminder_processing_route(
    http_req: &HttpRequest,
    query_secret: Option<&str>,
    ctx: &TeamdeskContext,
) -> Result<(), TeamdeskError> {
    let expected = match &ctx.config.task_reminder_secret {
        Some(secret) => secret,
        None => {
            debug!("No task reminder secret configured, accepting the processing request");
            return Ok(());
        }
    };

    let authorized = [header_value(http_req, TASK_REMINDER_SECRET_HEADER), query_secret]
        .iter()
        .flatten()
        .any(|provided| secrets_match(provided, expected));

    if authorized {
        Ok(())
    } else {
        warn!("Rejected reminder processing request with a missing or invalid secret");
        Err(TeamdeskError::Forbidden(
            "Missing or invalid task reminder secret".into(),
        ))
    }
}
