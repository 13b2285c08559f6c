use std::env;

/// Process configuration, loaded once at startup. Required variables panic
/// early with a clear message; everything else has a sensible default.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_days: i64,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub mail_from: String,
    pub frontend_url: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let smtp_username = env::var("SMTP_USERNAME").expect("SMTP_USERNAME must be set");
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl_hours: env::var("ACCESS_TOKEN_EXPIRE_HOURS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .expect("ACCESS_TOKEN_EXPIRE_HOURS must be a number"),
            refresh_token_ttl_days: env::var("REFRESH_TOKEN_EXPIRE_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("REFRESH_TOKEN_EXPIRE_DAYS must be a number"),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| smtp_username.clone()),
            smtp_password: env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD must be set"),
            smtp_username,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("SMTP_USERNAME", "mailer@example.com");
        env::set_var("SMTP_PASSWORD", "hunter2");

        let config = Config::from_env();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.access_token_ttl_hours, 1);
        assert_eq!(config.refresh_token_ttl_days, 7);
        assert_eq!(config.mail_from, "mailer@example.com");

        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("ALLOWED_ORIGINS", "https://one.example, https://two.example");

        let config = Config::from_env();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_url(), "http://0.0.0.0:3000");
        assert_eq!(
            config.allowed_origins,
            vec!["https://one.example", "https://two.example"]
        );

        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("ALLOWED_ORIGINS");
    }
}
