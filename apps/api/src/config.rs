use anyhow::{bail, Context, Result};

const DEFAULT_PREPARE_API_URL: &str = "https://anchor-ap1c.onrender.com";
const DEFAULT_RESET_REDIRECT_URL: &str = "http://localhost:5173/reset-password";

/// Which backend produces preparation guides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareBackend {
    /// The hosted `/prepare` text-generation endpoint.
    Remote,
    /// Direct LLM call with the built-in preparation prompts.
    Llm,
}

impl std::str::FromStr for PrepareBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(PrepareBackend::Remote),
            "llm" => Ok(PrepareBackend::Llm),
            other => bail!("unknown preparation backend '{other}' (expected 'remote' or 'llm')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: Option<String>,
    pub prepare_backend: PrepareBackend,
    pub prepare_api_url: String,
    pub session_ttl_hours: i64,
    pub password_reset_ttl_minutes: i64,
    pub password_reset_redirect_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let prepare_backend: PrepareBackend = optional_env("PREPARE_BACKEND", "remote")
            .parse()
            .context("PREPARE_BACKEND is invalid")?;

        if prepare_backend == PrepareBackend::Llm && anthropic_api_key.is_none() {
            bail!("PREPARE_BACKEND=llm requires ANTHROPIC_API_KEY to be set");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key,
            prepare_backend,
            prepare_api_url: optional_env("PREPARE_API_URL", DEFAULT_PREPARE_API_URL)
                .trim_end_matches('/')
                .to_string(),
            session_ttl_hours: optional_env("SESSION_TTL_HOURS", "720")
                .parse()
                .context("SESSION_TTL_HOURS must be a whole number of hours")?,
            password_reset_ttl_minutes: optional_env("PASSWORD_RESET_TTL_MINUTES", "60")
                .parse()
                .context("PASSWORD_RESET_TTL_MINUTES must be a whole number of minutes")?,
            password_reset_redirect_url: optional_env(
                "PASSWORD_RESET_REDIRECT_URL",
                DEFAULT_RESET_REDIRECT_URL,
            ),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_backend_parses_case_insensitively() {
        assert_eq!("Remote".parse::<PrepareBackend>().unwrap(), PrepareBackend::Remote);
        assert_eq!(" llm ".parse::<PrepareBackend>().unwrap(), PrepareBackend::Llm);
    }

    #[test]
    fn test_prepare_backend_rejects_unknown() {
        assert!("openai".parse::<PrepareBackend>().is_err());
    }
}
