use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_connect_timeout: Duration,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
    /// Addresses that receive a copy of every contact submission.
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from_name: String,
    pub tls: TlsMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TlsMode {
    /// Implicit TLS, usually port 465.
    Tls,
    StartTls,
    None,
}

impl TlsMode {
    fn parse(value: &str) -> Result<Self, String> {
        match value.to_ascii_lowercase().as_str() {
            "tls" => Ok(TlsMode::Tls),
            "starttls" => Ok(TlsMode::StartTls),
            "none" => Ok(TlsMode::None),
            other => Err(format!("Invalid SMTP_TLS: {other} (expected tls, starttls or none)")),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let database_connect_timeout = env_or("DATABASE_CONNECT_TIMEOUT_SECS", "10")
            .parse()
            .map(Duration::from_secs)
            .map_err(|e| format!("Invalid DATABASE_CONNECT_TIMEOUT_SECS: {e}"))?;

        let host: IpAddr = env_or("HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid HOST: {e}"))?;

        let port: u16 = env_or("PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid PORT: {e}"))?;

        let max_body_size: usize = env_or("MAX_BODY_SIZE", "102400")
            .parse()
            .map_err(|e| format!("Invalid MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("LOG_LEVEL", "info");

        let email_user = env_optional("EMAIL_USER");
        let email_to = env_optional("EMAIL_TO");

        let smtp = match (email_user.clone(), env_optional("EMAIL_PASS")) {
            (Some(user), Some(pass)) => Some(SmtpConfig {
                host: env_or("SMTP_HOST", "smtp.gmail.com"),
                port: env_or("SMTP_PORT", "465")
                    .parse()
                    .map_err(|e| format!("Invalid SMTP_PORT: {e}"))?,
                user,
                pass,
                from_name: env_or("EMAIL_FROM_NAME", "Portfolio Contact"),
                tls: TlsMode::parse(&env_or("SMTP_TLS", "tls"))?,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            database_connect_timeout,
            host,
            port,
            max_body_size,
            log_level,
            smtp,
            recipients: recipients(email_to, email_user),
        })
    }
}

/// Primary notification address first, then the sending account itself.
pub fn recipients(email_to: Option<String>, email_user: Option<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for addr in [email_to, email_user].into_iter().flatten() {
        let addr = addr.trim().to_string();
        if !addr.is_empty() && !out.iter().any(|a| a.eq_ignore_ascii_case(&addr)) {
            out.push(addr);
        }
    }
    out
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
