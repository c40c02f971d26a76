use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Fixed UTC offset (hours) used when bucketing reports by local date.
    pub report_tz_offset_hours: i32,
    /// How long to wait for in-flight requests after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let report_tz_offset_hours = env::var("REPORT_TZ_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(7);
        let shutdown_grace_secs = env::var("SHUTDOWN_GRACE_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);
        Ok(Self {
            port,
            database_url,
            host,
            report_tz_offset_hours,
            shutdown_grace_secs,
        })
    }
}
