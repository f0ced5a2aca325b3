mod assign_task;
mod complete_task;
mod get_task_reminders;
mod process_task_reminders;
mod schedule_task_reminders;
mod subscribers;

use actix_web::web;
use assign_task::assign_task_controller;
use complete_task::complete_task_controller;
use get_task_reminders::get_task_reminders_controller;
use process_task_reminders::process_task_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tasks/reminders/process",
        web::post().to(process_task_reminders_controller),
    );

    cfg.route(
        "/tasks/{task_id}/assign",
        web::post().to(assign_task_controller),
    );
    cfg.route(
        "/tasks/{task_id}/complete",
        web::post().to(complete_task_controller),
    );
    cfg.route(
        "/tasks/{task_id}/reminders",
        web::get().to(get_task_reminders_controller),
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::auth::API_KEY_HEADER;
    use actix_web::{http::StatusCode, test, App};
    use teamdesk_domain::{Task, User};
    use teamdesk_infra::TeamdeskContext;

    async fn setup() -> (TeamdeskContext, Task, User) {
        let ctx = TeamdeskContext::create_inmemory();
        let task = Task::new("Print the handbooks".into(), 0);
        ctx.repos.tasks.insert(&task).await.unwrap();
        let user = User::new();
        ctx.repos.users.insert(&user).await.unwrap();
        (ctx, task, user)
    }

    #[actix_web::test]
    async fn task_id_routes_reach_their_controllers() {
        let (ctx, task, user) = setup().await;
        let api_key = ctx.config.internal_api_key.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/tasks/{}/assign", task.id))
            .insert_header((API_KEY_HEADER, api_key.as_str()))
            .set_json(serde_json::json!({ "userIds": [user.id.to_string()] }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            ctx.repos.reminders.find_by_task(&task.id).await.unwrap().len(),
            1
        );

        let req = test::TestRequest::get()
            .uri(&format!("/tasks/{}/reminders", task.id))
            .insert_header((API_KEY_HEADER, api_key.as_str()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri(&format!("/tasks/{}/complete", task.id))
            .insert_header((API_KEY_HEADER, api_key.as_str()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let stored = ctx.repos.tasks.find(&task.id).await.unwrap().unwrap();
        assert!(stored.is_completed());
    }
}
