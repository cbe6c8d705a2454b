use serde::Deserialize;

use crate::config::Config;

pub const DEMO_USER_ID: &str = "demo-user";
pub const DEMO_EMAIL: &str = "demo@example.com";

/// Resolved caller identity for one request. There is no process-wide
/// session; callers get one of these per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
}

impl Session {
    pub fn demo() -> Self {
        Session {
            user_id: DEMO_USER_ID.to_string(),
            email: DEMO_EMAIL.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct AuthUser {
    id: String,
    email: Option<String>,
}

/// Verifies a bearer token against the backing auth service. Anything short
/// of a verified user (absent token, missing configuration, rejected token)
/// falls back to the demo identity; auth failures never abort the request.
///
/// Unauthenticated callers therefore still reach a live checkout session
/// under the demo identity, matching the deployed behavior.
pub async fn resolve_session(
    http: &reqwest::Client,
    config: &Config,
    bearer: Option<&str>,
) -> Session {
    let token = match bearer {
        Some(t) if !t.is_empty() && t != "null" => t,
        _ => return Session::demo(),
    };

    let (Some(base_url), Some(anon_key)) = (&config.supabase_url, &config.supabase_anon_key)
    else {
        tracing::warn!("auth service not configured, using demo identity");
        return Session::demo();
    };

    match fetch_user(http, base_url, anon_key, token).await {
        Ok(user) => Session {
            user_id: user.id,
            email: user.email.unwrap_or_else(|| DEMO_EMAIL.to_string()),
        },
        Err(err) => {
            tracing::warn!(error = %err, "token verification failed, using demo identity");
            Session::demo()
        }
    }
}

async fn fetch_user(
    http: &reqwest::Client,
    base_url: &str,
    anon_key: &str,
    token: &str,
) -> Result<AuthUser, reqwest::Error> {
    http.get(format!("{base_url}/auth/v1/user"))
        .bearer_auth(token)
        .header("apikey", anon_key)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

/// Pulls the token out of an `Authorization: Bearer ...` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header.and_then(|h| h.strip_prefix("Bearer "))
}
