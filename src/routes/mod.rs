pub mod auth;
pub mod forums;
pub mod health;
pub mod logs;
pub mod sprites;
pub mod tasks;
pub mod users;

use crate::auth::AuthMiddleware;
use actix_web::web;

/// Wires the `/api/v1` surface. Public routes are registered first; every
/// other route sits inside an unnamed scope wrapped by `AuthMiddleware`,
/// which runs the credential renewal protocol before the handler.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        // account lifecycle, reachable without a session
        .service(auth::login)
        .service(auth::register)
        .service(auth::forgot_password)
        .service(auth::recover_password)
        .service(auth::confirm_email)
        .service(auth::disable_user)
        // admin-console listings and removals
        .service(users::get_users)
        .service(logs::get_logs)
        .service(forums::delete_forum)
        .service(forums::delete_comment)
        // public profile pages
        .service(forums::get_user_forums)
        .service(forums::get_user_comments)
        // everything below requires a live session
        .service(
            web::scope("")
                .wrap(AuthMiddleware)
                .service(users::get_user)
                .service(users::change_password)
                .service(users::toggle_push)
                .service(users::change_avatar)
                .service(users::get_points)
                .service(tasks::create_task)
                .service(tasks::get_tasks)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::complete_task)
                .service(tasks::delete_task)
                .service(tasks::complete_session)
                .service(sprites::get_sprites)
                .service(sprites::single_pull)
                .service(sprites::ten_pull)
                .service(forums::create_forum)
                .service(forums::get_forums)
                .service(forums::get_forum)
                .service(forums::create_comment),
        );
}
