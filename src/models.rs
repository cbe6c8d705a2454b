use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Mood symbols offered by the journal editor. Serialized as the symbol
/// itself; anything outside this set is a deserialization error.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    #[default]
    #[serde(rename = "😊")]
    Happy,
    #[serde(rename = "😌")]
    Calm,
    #[serde(rename = "😢")]
    Sad,
    #[serde(rename = "😤")]
    Frustrated,
    #[serde(rename = "🥰")]
    Loved,
    #[serde(rename = "😴")]
    Tired,
    #[serde(rename = "💪")]
    Strong,
    #[serde(rename = "🌸")]
    Blooming,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub mood: Mood,
}

#[derive(Deserialize, Debug)]
pub struct CreateEntryPayload {
    pub title: String,
    pub content: String,
    pub tags: Option<Vec<String>>,
    pub mood: Option<Mood>,
}

/// Fields not present in the payload keep their current value.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateEntryPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub mood: Option<Mood>,
}

/// Query parameters for the entry listing. `tags` is comma-separated,
/// `date` is YYYY-MM-DD.
#[derive(Deserialize, Debug, Default)]
pub struct EntryFilterParams {
    pub search: Option<String>,
    pub tags: Option<String>,
    pub date: Option<chrono::NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub video_id: String,
    pub user_name: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    pub user_name: String,
    pub text: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Monthly price in whole dollars.
    pub price: i64,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub popular: bool,
}

#[derive(Serialize, Deserialize, sqlx::Type, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone)]
pub struct PaymentRecord {
    pub id: String,
    pub user_id: String,
    /// Minor units (cents).
    pub amount: i64,
    pub currency: String,
    pub plan_name: String,
    pub status: PaymentStatus,
    pub stripe_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct CreatePaymentPayload {
    pub plan_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub plan_id: String,
    pub plan_name: String,
    /// Whole dollars, converted to minor units for the line item.
    pub price: i64,
    pub payment_id: String,
}

#[derive(Serialize, Debug)]
pub struct CheckoutResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_serializes_as_its_symbol() {
        assert_eq!(serde_json::to_string(&Mood::Loved).unwrap(), "\"🥰\"");
        let parsed: Mood = serde_json::from_str("\"😊\"").unwrap();
        assert_eq!(parsed, Mood::Happy);
    }

    #[test]
    fn unknown_mood_symbol_is_rejected() {
        assert!(serde_json::from_str::<Mood>("\"🤖\"").is_err());
    }

    #[test]
    fn checkout_request_uses_camel_case() {
        let req: CheckoutRequest = serde_json::from_value(serde_json::json!({
            "planId": "premium",
            "planName": "Premium",
            "price": 19,
            "paymentId": "p1",
        }))
        .unwrap();
        assert_eq!(req.plan_id, "premium");
        assert_eq!(req.payment_id, "p1");
    }
}
