use std::env;

/// Configuration for the outbound email deliverability API.
#[derive(Clone, Debug)]
pub struct EmailCheckConfig {
    pub base_url: String,
    pub api_key: String,
}

impl EmailCheckConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("EMAIL_VERIFICATION_URL")
                .unwrap_or_else(|_| "https://api.email-validator.net/api/verify".to_string()),
            api_key: env::var("EMAIL_VERIFICATION_KEY").unwrap_or_else(|_| "".to_string()),
        }
    }
}
