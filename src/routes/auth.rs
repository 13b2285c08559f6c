use crate::{
    auth::{
        hash_password, verify_password, AuthResponse, ForgotRequest, LoginRequest, RecoverRequest,
        RegisterRequest, SessionClaims, TokenAuthority, REFRESH_COOKIE,
    },
    config::Config,
    error::AppError,
    mail::Mailer,
    models::{User, DEFAULT_AVATAR},
    routes::logs::record_activity,
};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{patch, post, web, HttpResponse, Responder};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Authenticates a user and opens a session.
///
/// Speaks the OAuth2 password-grant form shape (`username` carries the
/// account email). On success the refresh credential is set as an HTTP-only
/// cross-site cookie and the access credential is returned in the body for
/// bearer use; the login is recorded in the activity log.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    authority: web::Data<TokenAuthority>,
    form: web::Form<LoginRequest>,
) -> Result<impl Responder, AppError> {
    form.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT user_uuid, user_fname, user_lname, user_email, user_password, is_premium, \
         is_confirmed, user_points, push_notif, user_avatar, created_at, last_login \
         FROM users WHERE user_email = $1",
    )
    .bind(&form.username)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Incorrect username or password".into()))?;

    if !verify_password(&form.password, &user.user_password)? {
        return Err(AppError::Unauthorized("Incorrect username or password".into()));
    }
    if !user.is_confirmed {
        return Err(AppError::Unauthorized("Email is not confirmed".into()));
    }

    let claims = SessionClaims::new(
        user.user_uuid,
        &user.user_email,
        user.full_name(),
        user.push_notif,
        &user.user_avatar,
    );
    let refresh_token = authority.issue_refresh()?;
    let access_token = authority.issue_access(&claims)?;

    sqlx::query("UPDATE users SET last_login = $1 WHERE user_uuid = $2")
        .bind(Utc::now().date_naive())
        .bind(user.user_uuid)
        .execute(&**pool)
        .await?;
    record_activity(&pool, "LOGGED IN", user.user_uuid).await?;

    let cookie = Cookie::build(REFRESH_COOKIE, refresh_token)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(AuthResponse {
        access_token,
        access_type: "Bearer".into(),
    }))
}

/// Registers a new account.
///
/// The account starts unconfirmed; a confirmation-pending email is sent and
/// login is refused until an admin confirms the address.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    mailer: web::Data<Mailer>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let existing_user =
        sqlx::query_as::<_, (Uuid,)>("SELECT user_uuid FROM users WHERE user_email = $1")
            .bind(&register_data.user_email)
            .fetch_optional(&**pool)
            .await?;

    if existing_user.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let digest = hash_password(&register_data.user_password)?;

    sqlx::query(
        "INSERT INTO users (user_uuid, user_fname, user_lname, user_email, user_password, user_avatar) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(&register_data.user_fname)
    .bind(&register_data.user_lname)
    .bind(&register_data.user_email)
    .bind(&digest)
    .bind(DEFAULT_AVATAR)
    .execute(&**pool)
    .await?;

    mailer
        .send(
            &register_data.user_email,
            "Email Confirmation",
            "Your email is awaiting confirmation by the admin.",
        )
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "detail": "Please check your email for a confirmation link"
    })))
}

/// Sends a password-recovery link to the given address.
///
/// Always answers 201: whether the address has an account is not disclosed.
#[post("/forgot")]
pub async fn forgot_password(
    config: web::Data<Config>,
    mailer: web::Data<Mailer>,
    forgot_data: web::Json<ForgotRequest>,
) -> Result<impl Responder, AppError> {
    forgot_data.validate()?;

    let body = format!(
        "Recover your password with the link below.\n\n{}/recover/{}",
        config.frontend_url, forgot_data.user_email
    );
    mailer
        .send(&forgot_data.user_email, "Password Recovery", &body)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "detail": "Please check your email for a recovery link"
    })))
}

/// Resets a password through a recovery link.
#[patch("/recover")]
pub async fn recover_password(
    pool: web::Data<PgPool>,
    recover_data: web::Json<RecoverRequest>,
) -> Result<impl Responder, AppError> {
    recover_data.validate()?;

    let digest = hash_password(&recover_data.new_password)?;
    let result = sqlx::query("UPDATE users SET user_password = $1 WHERE user_email = $2")
        .bind(&digest)
        .bind(&recover_data.user_email)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("No account with that email".into()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "detail": "Password has been changed"
    })))
}

/// Marks an address as confirmed and notifies the owner. Called from the
/// admin console.
#[post("/confirm/{user_email}")]
pub async fn confirm_email(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<Mailer>,
    user_email: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user_email = user_email.into_inner();

    let result = sqlx::query("UPDATE users SET is_confirmed = TRUE WHERE user_email = $1")
        .bind(&user_email)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("No account with that email".into()));
    }

    let body = format!(
        "Your email has been confirmed. Please proceed to login.\n\n{}/",
        config.frontend_url
    );
    mailer.send(&user_email, "Email Confirmation", &body).await?;

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "detail": "Email has been confirmed"
    })))
}

/// Clears the confirmed flag, locking the account out until re-confirmed.
/// Called from the admin console.
#[post("/disable/{user_email}")]
pub async fn disable_user(
    pool: web::Data<PgPool>,
    mailer: web::Data<Mailer>,
    user_email: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user_email = user_email.into_inner();

    let result = sqlx::query("UPDATE users SET is_confirmed = FALSE WHERE user_email = $1")
        .bind(&user_email)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("No account with that email".into()));
    }

    mailer
        .send(
            &user_email,
            "Account Disabled",
            "Your account has been disabled by the admin.",
        )
        .await?;

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "detail": "Account has been disabled"
    })))
}
