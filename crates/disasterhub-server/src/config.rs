use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::warn;

use disasterhub_client::auth::AdminCredentials;
use disasterhub_client::normalize::StatusMapping;
use disasterhub_client::store::MergePolicy;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub reports_url: String,
    pub emergency_url: String,
    pub routing_url: String,
    pub poll_interval: Duration,
    pub submit_timeout: Duration,
    pub merge_policy: MergePolicy,
    pub status_mapping: StatusMapping,
    pub admin: Option<AdminCredentials>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = var_or("DISASTERHUB_HOST", "127.0.0.1");
        let port: u16 = var_or("DISASTERHUB_PORT", "3100")
            .parse()
            .context("DISASTERHUB_PORT")?;
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

        let jwt_secret = var_or("DISASTERHUB_JWT_SECRET", DEV_JWT_SECRET);
        if jwt_secret == DEV_JWT_SECRET {
            warn!("DISASTERHUB_JWT_SECRET not set, using the development secret");
        }

        let poll_ms: u64 = var_or("DISASTERHUB_POLL_INTERVAL_MS", "300000")
            .parse()
            .context("DISASTERHUB_POLL_INTERVAL_MS")?;
        let timeout_ms: u64 = var_or("DISASTERHUB_SUBMIT_TIMEOUT_MS", "8000")
            .parse()
            .context("DISASTERHUB_SUBMIT_TIMEOUT_MS")?;
        if poll_ms == 0 {
            return Err(anyhow!("DISASTERHUB_POLL_INTERVAL_MS must be positive"));
        }

        let merge_policy = var_or("DISASTERHUB_MERGE_POLICY", "replace")
            .parse::<MergePolicy>()
            .map_err(|e| anyhow!(e))?;
        let status_mapping = var_or("DISASTERHUB_STATUS_MAPPING", "two-way")
            .parse::<StatusMapping>()
            .map_err(|e| anyhow!(e))?;

        let admin = match (
            std::env::var("DISASTERHUB_ADMIN_EMAIL"),
            std::env::var("DISASTERHUB_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminCredentials { email, password })
            }
            _ => None,
        };

        Ok(Self {
            addr,
            db_path: PathBuf::from(var_or("DISASTERHUB_DB_PATH", "disasterhub.db")),
            jwt_secret,
            reports_url: var_or(
                "DISASTERHUB_REPORTS_URL",
                "https://fact-checker-e7lx.onrender.com/getus",
            ),
            emergency_url: var_or(
                "DISASTERHUB_EMERGENCY_URL",
                "https://disasterpulse.divinedevelopers.tech/api",
            ),
            routing_url: var_or("DISASTERHUB_ROUTING_URL", "https://router.project-osrm.org"),
            poll_interval: Duration::from_millis(poll_ms),
            submit_timeout: Duration::from_millis(timeout_ms),
            merge_policy,
            status_mapping,
            admin,
            latitude: optional_f64("DISASTERHUB_LATITUDE")?,
            longitude: optional_f64("DISASTERHUB_LONGITUDE")?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn optional_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            let parsed = v.trim().parse::<f64>().with_context(|| key.to_string())?;
            Ok(Some(parsed))
        }
        _ => Ok(None),
    }
}
