//! Typed client for the expense backend. Every network call in the app goes
//! through here so auth headers and error mapping stay in one place.

use gloo_net::http::{Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const API_BASE_URL: &str = "http://localhost:5000";

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Expense {
    pub id: Option<i64>,
    pub category: String,
    pub amount: f64,
    pub date: String,
}

/// Payload for a new expense; the backend assigns the id.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("you are not signed in")]
    AuthenticationMissing,
    #[error("could not reach the server")]
    Network,
    #[error("{0}")]
    Rejected(String),
    #[error("unexpected response from the server")]
    MalformedResponse,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct AdviceResponse {
    advice: String,
}

#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(API_BASE_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticated endpoints must never be called anonymously; the UI gates
    /// on token presence, this is the backstop.
    fn bearer(token: Option<&str>) -> Result<String, ApiError> {
        match token {
            Some(t) if !t.is_empty() => Ok(format!("Bearer {}", t)),
            _ => Err(ApiError::AuthenticationMissing),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let resp = Request::post(&self.url("/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .map_err(|_| ApiError::Network)?
            .send()
            .await
            .map_err(|_| ApiError::Network)?;

        if !resp.ok() {
            return Err(ApiError::Rejected(
                rejection_message(resp, "Login failed").await,
            ));
        }

        let body: LoginResponse = resp.json().await.map_err(|_| ApiError::MalformedResponse)?;
        if body.access_token.is_empty() {
            return Err(ApiError::MalformedResponse);
        }
        Ok(body.access_token)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let resp = Request::post(&self.url("/register"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .map_err(|_| ApiError::Network)?
            .send()
            .await
            .map_err(|_| ApiError::Network)?;

        if !resp.ok() {
            return Err(ApiError::Rejected(
                rejection_message(resp, "Registration failed").await,
            ));
        }
        Ok(())
    }

    /// Fetches the full expense collection. A success body that is not an
    /// array normalizes to an empty collection rather than an error.
    pub async fn fetch_expenses(&self, token: Option<&str>) -> Result<Vec<Expense>, ApiError> {
        let auth = Self::bearer(token)?;
        let resp = Request::get(&self.url("/expenses"))
            .header("Authorization", &auth)
            .send()
            .await
            .map_err(|_| ApiError::Network)?;

        if !resp.ok() {
            return Err(ApiError::Rejected(
                rejection_message(resp, "Could not load expenses").await,
            ));
        }

        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        Ok(expenses_from_value(body))
    }

    pub async fn add_expense(
        &self,
        token: Option<&str>,
        expense: &NewExpense,
    ) -> Result<(), ApiError> {
        let auth = Self::bearer(token)?;
        let resp = Request::post(&self.url("/expense"))
            .header("Authorization", &auth)
            .json(expense)
            .map_err(|_| ApiError::Network)?
            .send()
            .await
            .map_err(|_| ApiError::Network)?;

        if !resp.ok() {
            return Err(ApiError::Rejected(
                rejection_message(resp, "Could not save the expense").await,
            ));
        }
        Ok(())
    }

    /// Requests the backend-rendered pie chart and wraps the image bytes in a
    /// blob object URL for display.
    pub async fn pie_chart(&self, token: Option<&str>) -> Result<String, ApiError> {
        let auth = Self::bearer(token)?;
        let resp = Request::post(&self.url("/pie_chart"))
            .header("Authorization", &auth)
            .send()
            .await
            .map_err(|_| ApiError::Network)?;

        if !resp.ok() {
            return Err(ApiError::Rejected(
                rejection_message(resp, "Could not render the chart").await,
            ));
        }

        let bytes = resp
            .binary()
            .await
            .map_err(|_| ApiError::MalformedResponse)?;
        object_url_for_image(&bytes).ok_or(ApiError::MalformedResponse)
    }

    /// Sends the current collection and returns the savings suggestion text.
    pub async fn advice(
        &self,
        token: Option<&str>,
        expenses: &[Expense],
    ) -> Result<String, ApiError> {
        let auth = Self::bearer(token)?;
        let resp = Request::post(&self.url("/gemini_advice"))
            .header("Authorization", &auth)
            .json(&serde_json::json!({ "expenses": expenses }))
            .map_err(|_| ApiError::Network)?
            .send()
            .await
            .map_err(|_| ApiError::Network)?;

        if !resp.ok() {
            return Err(ApiError::Rejected(
                rejection_message(resp, "Could not fetch advice").await,
            ));
        }

        let body: AdviceResponse = resp.json().await.map_err(|_| ApiError::MalformedResponse)?;
        Ok(body.advice)
    }
}

/// Normalizes a fetch payload: anything but an array is an empty collection,
/// and entries that do not parse are skipped.
pub fn expenses_from_value(body: Value) -> Vec<Expense> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

async fn rejection_message(resp: Response, fallback: &str) -> String {
    match resp.json::<Value>().await {
        Ok(body) => message_from_body(&body, fallback),
        Err(_) => fallback.to_string(),
    }
}

/// The backend reports failures as either `{"message": ...}` or `{"error": ...}`.
fn message_from_body(body: &Value, fallback: &str) -> String {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .unwrap_or(fallback)
        .to_string()
}

fn object_url_for_image(bytes: &[u8]) -> Option<String> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array.into());
    let props = web_sys::BlobPropertyBag::new();
    props.set_type("image/png");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &props).ok()?;
    web_sys::Url::create_object_url_with_blob(&blob).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bearer_requires_a_token() {
        assert_eq!(
            ApiClient::bearer(None),
            Err(ApiError::AuthenticationMissing)
        );
        assert_eq!(
            ApiClient::bearer(Some("")),
            Err(ApiError::AuthenticationMissing)
        );
        assert_eq!(
            ApiClient::bearer(Some("abc")),
            Ok("Bearer abc".to_string())
        );
    }

    #[test]
    fn non_array_payload_normalizes_to_empty() {
        assert!(expenses_from_value(json!({})).is_empty());
        assert!(expenses_from_value(json!("nope")).is_empty());
        assert!(expenses_from_value(Value::Null).is_empty());
    }

    #[test]
    fn array_payload_parses_expenses() {
        let body = json!([
            { "id": 1, "category": "Food", "amount": 12.5, "date": "2024-01-01" },
            { "category": "Rent", "amount": 800.0, "date": "2024-01-02" }
        ]);
        let expenses = expenses_from_value(body);
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].id, Some(1));
        assert_eq!(expenses[0].category, "Food");
        assert_eq!(expenses[1].id, None);
        assert_eq!(expenses[1].amount, 800.0);
    }

    #[test]
    fn unparseable_entries_are_skipped() {
        let body = json!([
            { "id": 1, "category": "Food", "amount": 12.5, "date": "2024-01-01" },
            { "category": "broken" }
        ]);
        assert_eq!(expenses_from_value(body).len(), 1);
    }

    #[test]
    fn rejection_prefers_backend_message() {
        assert_eq!(
            message_from_body(&json!({ "message": "Invalid credentials" }), "fallback"),
            "Invalid credentials"
        );
        assert_eq!(
            message_from_body(&json!({ "error": "bad date" }), "fallback"),
            "bad date"
        );
        assert_eq!(message_from_body(&json!({}), "fallback"), "fallback");
    }
}
