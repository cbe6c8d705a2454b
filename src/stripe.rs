use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Minimal Stripe API client covering what the checkout flow needs:
/// customer lookup/creation and checkout-session creation. Requests are
/// form-encoded per the Stripe wire format; responses are parsed into
/// explicit per-call types.
pub struct StripeClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

#[derive(Deserialize, Debug)]
pub struct Customer {
    pub id: String,
}

#[derive(Deserialize, Debug)]
struct CustomerList {
    data: Vec<Customer>,
}

#[derive(Deserialize, Debug)]
pub struct CheckoutSession {
    pub id: String,
    /// Stripe leaves this null for some session states; callers must treat
    /// its absence as a recoverable error.
    pub url: Option<String>,
}

#[derive(Deserialize, Debug)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize, Debug)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// Everything needed to build one subscription checkout session.
pub struct SessionParams<'a> {
    pub customer_id: &'a str,
    pub plan_id: &'a str,
    pub plan_name: &'a str,
    /// Whole dollars per month.
    pub price: i64,
    pub payment_id: &'a str,
    pub user_id: &'a str,
    pub origin: &'a str,
}

impl StripeClient {
    pub fn new(http: reqwest::Client, api_base: String, secret_key: String) -> Self {
        StripeClient {
            http,
            api_base,
            secret_key,
        }
    }

    /// Looks up an existing customer by email, taking the first match.
    pub async fn find_customer(&self, email: &str) -> Result<Option<Customer>, ApiError> {
        let response = self
            .http
            .get(format!("{}/v1/customers", self.api_base))
            .bearer_auth(&self.secret_key)
            .query(&[("email", email), ("limit", "1")])
            .send()
            .await?;
        let list: CustomerList = parse_response(response).await?;
        Ok(list.data.into_iter().next())
    }

    /// Creates a customer tagged with the internal user id.
    pub async fn create_customer(
        &self,
        email: &str,
        user_id: &str,
    ) -> Result<Customer, ApiError> {
        let response = self
            .http
            .post(format!("{}/v1/customers", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&[("email", email), ("metadata[app_user_id]", user_id)])
            .send()
            .await?;
        parse_response(response).await
    }

    /// Creates a monthly subscription session with a single line item.
    pub async fn create_checkout_session(
        &self,
        params: &SessionParams<'_>,
    ) -> Result<CheckoutSession, ApiError> {
        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&session_form(params))
            .send()
            .await?;
        parse_response(response).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = response
        .json::<StripeErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error.message)
        .unwrap_or_else(|| format!("stripe returned {status}"));
    Err(ApiError::Stripe(message))
}

/// Form body for a checkout session. The success URL keeps Stripe's literal
/// `{CHECKOUT_SESSION_ID}` placeholder; both redirect URLs embed the payment
/// record id so the callback pages can settle it.
fn session_form(p: &SessionParams<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("customer", p.customer_id.to_string()),
        ("mode", "subscription".to_string()),
        ("payment_method_types[0]", "card".to_string()),
        ("line_items[0][quantity]", "1".to_string()),
        ("line_items[0][price_data][currency]", "usd".to_string()),
        (
            "line_items[0][price_data][unit_amount]",
            (p.price * 100).to_string(),
        ),
        (
            "line_items[0][price_data][recurring][interval]",
            "month".to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]",
            format!("{} Plan", p.plan_name),
        ),
        (
            "line_items[0][price_data][product_data][description]",
            format!("Monthly subscription to the {} wellness plan", p.plan_name),
        ),
        (
            "success_url",
            format!(
                "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}&payment_id={}",
                p.origin, p.payment_id
            ),
        ),
        (
            "cancel_url",
            format!("{}/payment-cancel?payment_id={}", p.origin, p.payment_id),
        ),
        ("metadata[payment_id]", p.payment_id.to_string()),
        ("metadata[plan_id]", p.plan_id.to_string()),
        ("metadata[user_id]", p.user_id.to_string()),
    ]
}
