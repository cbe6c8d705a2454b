use std::env;

pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite:revvere.db";
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_FALLBACK_ORIGIN: &str = "http://localhost:8080";

/// Runtime configuration, read from the environment. The Stripe key and the
/// auth backing service are optional: their absence only fails the requests
/// that need them.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    /// Used for redirect URLs when the request carries no Origin header.
    pub fallback_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),
            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE.to_string()),
            supabase_url: env::var("SUPABASE_URL").ok(),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY").ok(),
            fallback_origin: env::var("FALLBACK_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_ORIGIN.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            stripe_secret_key: None,
            stripe_api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            supabase_url: None,
            supabase_anon_key: None,
            fallback_origin: DEFAULT_FALLBACK_ORIGIN.to_string(),
        }
    }
}
