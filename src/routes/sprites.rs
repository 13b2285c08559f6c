use crate::{
    auth::Session,
    error::AppError,
    models::{
        sprite::{draw_sprite, total_weight},
        OwnedSprite, Sprite, SpriteInstance,
    },
};
use actix_web::{get, post, web, HttpResponse, Responder};
use rand::Rng;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Cost of one gacha pull, in points.
const PULL_COST: i32 = 50;

/// Lists the caller's sprites joined with their catalog entries.
#[get("/sprites")]
pub async fn get_sprites(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let sprites = sqlx::query_as::<_, OwnedSprite>(
        "SELECT i.sprite_instance_uuid, i.acquisition_date, s.sprite_uuid, s.sprite_source, \
         s.sprite_summon_chance \
         FROM sprite_instances i JOIN sprites s ON s.sprite_uuid = i.sprite_uuid \
         WHERE i.user_uuid = $1 ORDER BY i.acquisition_date DESC",
    )
    .bind(session.claims.user_uuid)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "data": sprites,
        "access_token": session.renewed,
    })))
}

/// Debits the pull cost and runs `count` weighted draws over the catalog,
/// recording one owned instance per draw. The balance check and debit cover
/// the whole batch up front; a ten-pull never partially succeeds for want
/// of points.
async fn pull(pool: &PgPool, user_uuid: Uuid, count: i32) -> Result<Vec<Uuid>, AppError> {
    let cost = PULL_COST * count;

    let (points,): (i32,) = sqlx::query_as("SELECT user_points FROM users WHERE user_uuid = $1")
        .bind(user_uuid)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if points < cost {
        return Err(AppError::BadRequest("Not enough points".into()));
    }

    let catalog = sqlx::query_as::<_, Sprite>(
        "SELECT sprite_uuid, sprite_source, sprite_summon_chance FROM sprites",
    )
    .fetch_all(pool)
    .await?;

    if catalog.is_empty() {
        return Err(AppError::InternalServerError("Sprite catalog is empty".into()));
    }

    sqlx::query("UPDATE users SET user_points = user_points - $1 WHERE user_uuid = $2")
        .bind(cost)
        .bind(user_uuid)
        .execute(pool)
        .await?;

    // Roll everything before touching the database again so the rng handle
    // never lives across an await point.
    let total = total_weight(&catalog);
    let rolls: Vec<f64> = {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| rng.gen::<f64>() * total).collect()
    };

    let mut summoned = Vec::with_capacity(rolls.len());
    for roll in rolls {
        let sprite = draw_sprite(&catalog, roll)
            .ok_or_else(|| AppError::InternalServerError("Sprite catalog is empty".into()))?;
        let instance = SpriteInstance::new(sprite.sprite_uuid, user_uuid);
        sqlx::query(
            "INSERT INTO sprite_instances (sprite_instance_uuid, acquisition_date, \
             sprite_uuid, user_uuid) VALUES ($1, $2, $3, $4)",
        )
        .bind(instance.sprite_instance_uuid)
        .bind(instance.acquisition_date)
        .bind(instance.sprite_uuid)
        .bind(instance.user_uuid)
        .execute(pool)
        .await?;
        summoned.push(sprite.sprite_uuid);
    }

    Ok(summoned)
}

/// One pull for 50 points.
#[post("/sprites/single")]
pub async fn single_pull(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let summoned = pull(&pool, session.claims.user_uuid, 1).await?;

    Ok(HttpResponse::Ok().json(json!({
        "detail": "Single pull successful",
        "data": summoned,
        "access_token": session.renewed,
    })))
}

/// Ten pulls for 500 points.
#[post("/sprites/ten")]
pub async fn ten_pull(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let summoned = pull(&pool, session.claims.user_uuid, 10).await?;

    Ok(HttpResponse::Ok().json(json!({
        "detail": "Ten pull successful",
        "data": summoned,
        "access_token": session.renewed,
    })))
}
