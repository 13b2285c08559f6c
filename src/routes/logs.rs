use crate::{error::AppError, models::UserLog};
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Appends one activity line for a user.
pub(crate) async fn record_activity(
    pool: &PgPool,
    details: &str,
    user_uuid: Uuid,
) -> Result<(), AppError> {
    let log = UserLog::new(details, user_uuid);
    sqlx::query(
        "INSERT INTO user_logs (user_log_uuid, user_log_details, created_at, user_uuid) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(log.user_log_uuid)
    .bind(&log.user_log_details)
    .bind(log.created_at)
    .bind(log.user_uuid)
    .execute(pool)
    .await?;
    Ok(())
}

/// Activity log listing, newest first. Serves the admin console.
#[get("/logs")]
pub async fn get_logs(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let logs = sqlx::query_as::<_, UserLog>(
        "SELECT user_log_uuid, user_log_details, created_at, user_uuid \
         FROM user_logs ORDER BY created_at DESC",
    )
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "data": logs })))
}
