use crate::{
    auth::Session,
    error::AppError,
    models::{Task, TaskInput, TaskPriority, TaskUpdate},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Points awarded for a completed focus session, independent of any task.
const SESSION_REWARD: i32 = 5;

/// Creates a new study task owned by the caller.
#[post("/task")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    session: Session,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), session.claims.user_uuid);
    sqlx::query(
        "INSERT INTO tasks (task_uuid, task_details, task_priority, task_category, \
         task_deadline, task_time, is_done, user_uuid) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(task.task_uuid)
    .bind(&task.task_details)
    .bind(task.task_priority)
    .bind(&task.task_category)
    .bind(task.task_deadline)
    .bind(task.task_time)
    .bind(task.is_done)
    .bind(task.user_uuid)
    .execute(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "detail": "Task has been created",
        "access_token": session.renewed,
    })))
}

/// Lists the caller's tasks, soonest deadline first.
#[get("/tasks")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT task_uuid, task_details, task_priority, task_category, task_deadline, \
         task_time, is_done, user_uuid \
         FROM tasks WHERE user_uuid = $1 ORDER BY task_deadline, task_time",
    )
    .bind(session.claims.user_uuid)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "data": tasks,
        "access_token": session.renewed,
    })))
}

/// Fetches one of the caller's tasks by id.
#[get("/task/{task_uuid}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    session: Session,
    task_uuid: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT task_uuid, task_details, task_priority, task_category, task_deadline, \
         task_time, is_done, user_uuid \
         FROM tasks WHERE task_uuid = $1 AND user_uuid = $2",
    )
    .bind(task_uuid.into_inner())
    .bind(session.claims.user_uuid)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "data": task,
        "access_token": session.renewed,
    })))
}

/// Updates a task the caller owns. The task id travels in the body, as the
/// client sends the whole edited task back.
#[patch("/task")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    session: Session,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let result = sqlx::query(
        "UPDATE tasks SET task_details = $1, task_priority = $2, task_category = $3, \
         task_deadline = $4, task_time = $5 \
         WHERE task_uuid = $6 AND user_uuid = $7",
    )
    .bind(&task_data.task_details)
    .bind(task_data.task_priority)
    .bind(&task_data.task_category)
    .bind(task_data.task_deadline)
    .bind(task_data.task_time)
    .bind(task_data.task_uuid)
    .bind(session.claims.user_uuid)
    .execute(&**pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Accepted().json(json!({
        "detail": "Task has been updated",
        "access_token": session.renewed,
    })))
}

/// Marks a task done and awards points for its priority tier.
#[patch("/task/{task_uuid}")]
pub async fn complete_task(
    pool: web::Data<PgPool>,
    session: Session,
    task_uuid: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_uuid.into_inner();

    let (priority, is_done): (TaskPriority, bool) = sqlx::query_as(
        "SELECT task_priority, is_done FROM tasks WHERE task_uuid = $1 AND user_uuid = $2",
    )
    .bind(task_uuid)
    .bind(session.claims.user_uuid)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if is_done {
        return Err(AppError::BadRequest("Task is already completed".into()));
    }

    sqlx::query("UPDATE tasks SET is_done = TRUE WHERE task_uuid = $1")
        .bind(task_uuid)
        .execute(&**pool)
        .await?;

    sqlx::query("UPDATE users SET user_points = user_points + $1 WHERE user_uuid = $2")
        .bind(priority.point_reward())
        .bind(session.claims.user_uuid)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "detail": "Task has been completed",
        "access_token": session.renewed,
    })))
}

/// Deletes a task the caller owns.
///
/// Replies 204 unless the session was silently renewed mid-request; a
/// renewed credential must reach the client, so that case answers 200 with
/// a body.
#[delete("/task/{task_uuid}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    session: Session,
    task_uuid: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE task_uuid = $1 AND user_uuid = $2")
        .bind(task_uuid.into_inner())
        .bind(session.claims.user_uuid)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    match session.renewed {
        Some(access_token) => Ok(HttpResponse::Ok().json(json!({
            "detail": "Task has been deleted",
            "access_token": access_token,
        }))),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

/// Records a completed focus session and awards its fixed point bonus.
#[patch("/session")]
pub async fn complete_session(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("UPDATE users SET user_points = user_points + $1 WHERE user_uuid = $2")
        .bind(SESSION_REWARD)
        .bind(session.claims.user_uuid)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "detail": "Session has been completed",
        "access_token": session.renewed,
    })))
}
