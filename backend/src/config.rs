use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub cors_origin: String,
    pub app_env: String,
    pub backup_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("cors_origin", "http://localhost:5173")?
            .set_default("app_env", "development")?
            .set_default("backup_dir", "backups")?
            .add_source(config::Environment::default())
            .build()?;

        config.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
