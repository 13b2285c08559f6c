use crate::{
    auth::Session,
    error::AppError,
    models::{CommentInput, Forum, ForumComment, ForumInput, ForumMember},
    routes::logs::record_activity,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

async fn insert_member(pool: &PgPool, member: &ForumMember) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO forum_members (forum_member_uuid, user_name, is_owner, created_at, \
         forum_uuid, user_uuid) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(member.forum_member_uuid)
    .bind(&member.user_name)
    .bind(member.is_owner)
    .bind(member.created_at)
    .bind(member.forum_uuid)
    .bind(member.user_uuid)
    .execute(pool)
    .await?;
    Ok(())
}

/// Creates a forum with the caller as its owning member and logs the post.
#[post("/forum")]
pub async fn create_forum(
    pool: web::Data<PgPool>,
    session: Session,
    forum_data: web::Json<ForumInput>,
) -> Result<impl Responder, AppError> {
    forum_data.validate()?;

    let forum = Forum::new(forum_data.into_inner());
    sqlx::query(
        "INSERT INTO forums (forum_uuid, forum_title, forum_category, forum_details, \
         forum_status, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(forum.forum_uuid)
    .bind(&forum.forum_title)
    .bind(&forum.forum_category)
    .bind(&forum.forum_details)
    .bind(&forum.forum_status)
    .bind(forum.created_at)
    .execute(&**pool)
    .await?;

    let owner = ForumMember::new(
        forum.forum_uuid,
        session.claims.user_uuid,
        &session.claims.user_name,
        true,
    );
    insert_member(&pool, &owner).await?;
    record_activity(&pool, "FORUM POSTED", session.claims.user_uuid).await?;

    Ok(HttpResponse::Created().json(json!({
        "detail": "Forum has been created",
        "access_token": session.renewed,
    })))
}

/// Lists all forums, newest first.
#[get("/forums")]
pub async fn get_forums(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let forums = sqlx::query_as::<_, Forum>(
        "SELECT forum_uuid, forum_title, forum_category, forum_details, forum_status, \
         created_at FROM forums ORDER BY created_at DESC",
    )
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "data": forums,
        "access_token": session.renewed,
    })))
}

/// Fetches one forum with its members and comments.
#[get("/forum/{forum_uuid}")]
pub async fn get_forum(
    pool: web::Data<PgPool>,
    session: Session,
    forum_uuid: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let forum_uuid = forum_uuid.into_inner();

    let forum = sqlx::query_as::<_, Forum>(
        "SELECT forum_uuid, forum_title, forum_category, forum_details, forum_status, \
         created_at FROM forums WHERE forum_uuid = $1",
    )
    .bind(forum_uuid)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Forum not found".into()))?;

    let members = sqlx::query_as::<_, ForumMember>(
        "SELECT forum_member_uuid, user_name, is_owner, created_at, forum_uuid, user_uuid \
         FROM forum_members WHERE forum_uuid = $1",
    )
    .bind(forum_uuid)
    .fetch_all(&**pool)
    .await?;

    let comments = sqlx::query_as::<_, ForumComment>(
        "SELECT forum_comment_uuid, forum_comment, created_at, forum_uuid, user_uuid \
         FROM forum_comments WHERE forum_uuid = $1 ORDER BY created_at",
    )
    .bind(forum_uuid)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "data": {
            "forum": forum,
            "forum_members": members,
            "forum_comments": comments,
        },
        "access_token": session.renewed,
    })))
}

/// Adds a comment to a forum, enrolling the caller as a member on first
/// contact, and logs the post.
#[post("/comment")]
pub async fn create_comment(
    pool: web::Data<PgPool>,
    session: Session,
    comment_data: web::Json<CommentInput>,
) -> Result<impl Responder, AppError> {
    comment_data.validate()?;

    let forum_exists =
        sqlx::query_as::<_, (Uuid,)>("SELECT forum_uuid FROM forums WHERE forum_uuid = $1")
            .bind(comment_data.forum_uuid)
            .fetch_optional(&**pool)
            .await?;
    if forum_exists.is_none() {
        return Err(AppError::NotFound("Forum not found".into()));
    }

    let comment = ForumComment::new(comment_data.into_inner(), session.claims.user_uuid);
    sqlx::query(
        "INSERT INTO forum_comments (forum_comment_uuid, forum_comment, created_at, \
         forum_uuid, user_uuid) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(comment.forum_comment_uuid)
    .bind(&comment.forum_comment)
    .bind(comment.created_at)
    .bind(comment.forum_uuid)
    .bind(comment.user_uuid)
    .execute(&**pool)
    .await?;

    let already_member = sqlx::query_as::<_, (Uuid,)>(
        "SELECT forum_member_uuid FROM forum_members WHERE forum_uuid = $1 AND user_uuid = $2",
    )
    .bind(comment.forum_uuid)
    .bind(session.claims.user_uuid)
    .fetch_optional(&**pool)
    .await?;

    if already_member.is_none() {
        let member = ForumMember::new(
            comment.forum_uuid,
            session.claims.user_uuid,
            &session.claims.user_name,
            false,
        );
        insert_member(&pool, &member).await?;
    }

    record_activity(&pool, "COMMENT POSTED", session.claims.user_uuid).await?;

    Ok(HttpResponse::Created().json(json!({
        "detail": "Comment has been submitted",
        "access_token": session.renewed,
    })))
}

/// Lists the forums a user belongs to. Serves the public profile page.
#[get("/{user_uuid}/forums")]
pub async fn get_user_forums(
    pool: web::Data<PgPool>,
    user_uuid: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let forums = sqlx::query_as::<_, Forum>(
        "SELECT f.forum_uuid, f.forum_title, f.forum_category, f.forum_details, \
         f.forum_status, f.created_at \
         FROM forums f JOIN forum_members m ON m.forum_uuid = f.forum_uuid \
         WHERE m.user_uuid = $1 ORDER BY f.created_at DESC",
    )
    .bind(user_uuid.into_inner())
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "data": forums })))
}

/// Lists a user's comments. Serves the public profile page.
#[get("/{user_uuid}/comments")]
pub async fn get_user_comments(
    pool: web::Data<PgPool>,
    user_uuid: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let comments = sqlx::query_as::<_, ForumComment>(
        "SELECT forum_comment_uuid, forum_comment, created_at, forum_uuid, user_uuid \
         FROM forum_comments WHERE user_uuid = $1 ORDER BY created_at DESC",
    )
    .bind(user_uuid.into_inner())
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "data": comments })))
}

/// Removes a forum with its memberships and comments. Called from the admin
/// console.
#[delete("/forums/{forum_uuid}")]
pub async fn delete_forum(
    pool: web::Data<PgPool>,
    forum_uuid: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let forum_uuid = forum_uuid.into_inner();

    sqlx::query("DELETE FROM forum_comments WHERE forum_uuid = $1")
        .bind(forum_uuid)
        .execute(&**pool)
        .await?;
    sqlx::query("DELETE FROM forum_members WHERE forum_uuid = $1")
        .bind(forum_uuid)
        .execute(&**pool)
        .await?;
    let result = sqlx::query("DELETE FROM forums WHERE forum_uuid = $1")
        .bind(forum_uuid)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Forum not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "detail": "Forum has been deleted" })))
}

/// Removes one comment. Called from the admin console.
#[delete("/comment/{comment_uuid}")]
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    comment_uuid: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM forum_comments WHERE forum_comment_uuid = $1")
        .bind(comment_uuid.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Comment not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "detail": "Comment has been deleted" })))
}
