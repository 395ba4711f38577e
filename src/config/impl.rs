use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::{AppConfig, ScheduleConfig};

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 部署环境常用的无前缀变量，映射到对应的配置键
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("TZ_OFFSET_MINUTES", "schedule.utc_offset_minutes"),
];

// 时区偏移的合法范围：UTC-12:00 到 UTC+14:00
const MIN_OFFSET_MINUTES: i32 = -12 * 60;
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

impl ScheduleConfig {
    fn check(&self) -> Result<(), ConfigError> {
        if !(MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::Message(format!(
                "schedule.utc_offset_minutes must be between {MIN_OFFSET_MINUTES} and {MAX_OFFSET_MINUTES}, got {}",
                self.utc_offset_minutes
            )));
        }
        if self.max_generation_days <= 0 {
            return Err(ConfigError::Message(
                "schedule.max_generation_days must be positive".to_string(),
            ));
        }
        if self.bulk_max_items == 0 {
            return Err(ConfigError::Message(
                "schedule.bulk_max_items must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// 依次读取 config.toml、config.{APP_ENV}.toml、ACADEMY_* 变量和无前缀变量，后者覆盖前者
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("ACADEMY")
                    .separator("_")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;
        app_config.finalize()?;
        Ok(app_config)
    }

    /// 补全派生值并校验排课参数
    fn finalize(&mut self) -> Result<(), ConfigError> {
        // 0 表示按 CPU 核数决定
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers);
        }
        self.schedule.check()
    }

    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时调用，失败由调用方决定如何退出
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(utc_offset_minutes: i32, max_generation_days: i64, bulk_max_items: usize) -> ScheduleConfig {
        ScheduleConfig {
            utc_offset_minutes,
            max_generation_days,
            bulk_max_items,
        }
    }

    #[test]
    fn test_schedule_defaults_are_valid() {
        let config = AppConfig::get();
        assert!(config.schedule.check().is_ok());
        assert!(config.server.workers > 0);
    }

    #[test]
    fn test_schedule_check_rejects_bad_values() {
        assert!(schedule(-180, 366, 200).check().is_ok());
        assert!(schedule(MAX_OFFSET_MINUTES, 1, 1).check().is_ok());

        assert!(schedule(MAX_OFFSET_MINUTES + 1, 366, 200).check().is_err());
        assert!(schedule(MIN_OFFSET_MINUTES - 1, 366, 200).check().is_err());
        assert!(schedule(-180, 0, 200).check().is_err());
        assert!(schedule(-180, 366, 0).check().is_err());
    }

    #[test]
    fn test_utc_offset() {
        let offset = schedule(-180, 366, 200).utc_offset();
        assert_eq!(offset.local_minus_utc(), -3 * 3600);
        assert_eq!(schedule(0, 366, 200).utc_offset().local_minus_utc(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_socket_path_empty_is_none() {
        let mut config = AppConfig::get().clone();
        config.server.unix_socket_path = String::new();
        assert_eq!(config.unix_socket_path(), None);
        config.server.unix_socket_path = "/tmp/academy.sock".to_string();
        assert_eq!(config.unix_socket_path(), Some("/tmp/academy.sock"));
    }
}
