use crate::{
    auth::{hash_password, verify_password, Session},
    error::AppError,
    models::{AvatarChange, PasswordChange, PointsRow, PushToggle, User},
};
use actix_web::{get, patch, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Returns the session claims plus the avatar currently on record.
///
/// Claims are served from the credential, not the store, so a renewed
/// session can carry a stale display name until the next full login; the
/// avatar is re-read here to keep the profile picture current.
#[get("/user")]
pub async fn get_user(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let (user_avatar,): (String,) =
        sqlx::query_as("SELECT user_avatar FROM users WHERE user_uuid = $1")
            .bind(session.claims.user_uuid)
            .fetch_optional(&**pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "data": session.claims,
        "user_avatar": user_avatar,
        "access_token": session.renewed,
    })))
}

/// Directory listing for the admin console. Password digests are skipped at
/// serialization.
#[get("/users")]
pub async fn get_users(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT user_uuid, user_fname, user_lname, user_email, user_password, is_premium, \
         is_confirmed, user_points, push_notif, user_avatar, created_at, last_login \
         FROM users ORDER BY created_at DESC",
    )
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "data": users })))
}

/// Changes the caller's password after verifying the old one.
#[patch("/password")]
pub async fn change_password(
    pool: web::Data<PgPool>,
    session: Session,
    change: web::Json<PasswordChange>,
) -> Result<impl Responder, AppError> {
    change.validate()?;

    let (current_digest,): (String,) =
        sqlx::query_as("SELECT user_password FROM users WHERE user_uuid = $1")
            .bind(session.claims.user_uuid)
            .fetch_optional(&**pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password(&change.old_password, &current_digest)? {
        return Err(AppError::Unauthorized("Incorrect password".into()));
    }

    let digest = hash_password(&change.new_password)?;
    sqlx::query("UPDATE users SET user_password = $1 WHERE user_uuid = $2")
        .bind(&digest)
        .bind(session.claims.user_uuid)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "detail": "Password has been changed",
        "access_token": session.renewed,
    })))
}

/// Toggles push notifications for the caller.
#[patch("/push")]
pub async fn toggle_push(
    pool: web::Data<PgPool>,
    session: Session,
    toggle: web::Json<PushToggle>,
) -> Result<impl Responder, AppError> {
    sqlx::query("UPDATE users SET push_notif = $1 WHERE user_uuid = $2")
        .bind(toggle.push_notif)
        .bind(session.claims.user_uuid)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "detail": "Push notification toggled",
        "access_token": session.renewed,
    })))
}

/// Changes the caller's avatar.
#[patch("/avatar")]
pub async fn change_avatar(
    pool: web::Data<PgPool>,
    session: Session,
    change: web::Json<AvatarChange>,
) -> Result<impl Responder, AppError> {
    change.validate()?;

    sqlx::query("UPDATE users SET user_avatar = $1 WHERE user_uuid = $2")
        .bind(&change.user_avatar)
        .bind(session.claims.user_uuid)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "detail": "Avatar changed",
        "access_token": session.renewed,
    })))
}

/// Points leaderboard, highest first.
#[get("/points")]
pub async fn get_points(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let standings = sqlx::query_as::<_, PointsRow>(
        "SELECT user_fname, user_lname, user_points, user_avatar \
         FROM users ORDER BY user_points DESC",
    )
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "data": standings,
        "access_token": session.renewed,
    })))
}
