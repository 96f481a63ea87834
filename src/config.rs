use std::net::IpAddr;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_EMAILJS_API_BASE: &str = "https://api.emailjs.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub http_timeout_secs: u64,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub sheets: Option<SheetsConfig>,
    pub emailjs: Option<EmailJsConfig>,
}

/// Service-account credentials and target for the waitlist spreadsheet.
#[derive(Clone)]
pub struct SheetsConfig {
    pub client_email: String,
    /// PEM, already normalized by [`normalize_private_key`].
    pub private_key: String,
    pub spreadsheet_id: String,
    pub range: String,
    pub token_uri: String,
    pub api_base: String,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("token_uri", &self.token_uri)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub access_token: Option<String>,
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. `from_env` passes the process
    /// environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let env_nonempty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let host: IpAddr = env_or("WAITLIST_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid WAITLIST_HOST: {e}"))?;

        let port: u16 = env_or("WAITLIST_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid WAITLIST_PORT: {e}"))?;

        let max_body_size: usize = env_or("WAITLIST_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid WAITLIST_MAX_BODY_SIZE: {e}"))?;

        let http_timeout_secs: u64 = env_or("WAITLIST_HTTP_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid WAITLIST_HTTP_TIMEOUT_SECS: {e}"))?;

        let cors_origins: Vec<String> = env_or("WAITLIST_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        let log_level = env_or("WAITLIST_LOG_LEVEL", "info");

        let sheets = match (
            env_nonempty("GOOGLE_CLIENT_EMAIL"),
            env_nonempty("GOOGLE_PRIVATE_KEY"),
            env_nonempty("SHEET_ID"),
        ) {
            (Some(client_email), Some(private_key), Some(spreadsheet_id)) => Some(SheetsConfig {
                client_email,
                private_key: normalize_private_key(&private_key),
                spreadsheet_id,
                range: env_or("SHEET_RANGE", "A:B"),
                token_uri: env_or("GOOGLE_TOKEN_URI", DEFAULT_TOKEN_URI),
                api_base: env_or("GOOGLE_SHEETS_API_BASE", DEFAULT_SHEETS_API_BASE),
            }),
            _ => None,
        };

        let emailjs = match (
            env_nonempty("EMAILJS_SERVICE_ID"),
            env_nonempty("EMAILJS_TEMPLATE_ID"),
            env_nonempty("EMAILJS_USER_ID"),
        ) {
            (Some(service_id), Some(template_id), Some(user_id)) => Some(EmailJsConfig {
                service_id,
                template_id,
                user_id,
                access_token: env_nonempty("EMAILJS_ACCESS_TOKEN"),
                api_base: env_or("EMAILJS_API_BASE", DEFAULT_EMAILJS_API_BASE),
            }),
            _ => None,
        };

        Ok(Config {
            host,
            port,
            max_body_size,
            http_timeout_secs,
            cors_origins,
            log_level,
            sheets,
            emailjs,
        })
    }
}

/// Private keys usually arrive through env files with escaped newlines and
/// sometimes wrapped in quotes. Undo both so the PEM parses.
pub fn normalize_private_key(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);

    unquoted.replace("\\n", "\n")
}
