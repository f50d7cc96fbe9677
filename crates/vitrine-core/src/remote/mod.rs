//! HTTP client for the promotions resource of the admin API.
//!
//! The API is the single authority for filtering, pagination, and business
//! rules; this module only speaks its wire contract. The [`PromotionApi`]
//! trait is the seam the synchronizer is generic over, so tests can script
//! responses without a network.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{Page, Promotion, PromotionId};
use crate::query::SearchParams;

/// Remote operations on the promotions collection.
#[allow(async_fn_in_trait)]
pub trait PromotionApi {
    /// Fetch one page under the given filter/sort/pagination parameters.
    async fn fetch_page(&self, params: &SearchParams) -> Result<Page<Promotion>>;

    /// Set a promotion's active flag. The record's other fields are untouched.
    async fn set_active(&self, id: PromotionId, is_active: bool) -> Result<()>;
}

/// Production [`PromotionApi`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpPromotionApi {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpPromotionApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs()))
            .build()?;
        Ok(Self { config, client })
    }

    fn promotions_url(&self) -> String {
        format!(
            "{}/v1/tenants/{}/promotions",
            self.config.api_base_url, self.config.tenant_id
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl PromotionApi for HttpPromotionApi {
    async fn fetch_page(&self, params: &SearchParams) -> Result<Page<Promotion>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(active) = params.is_active {
            query.push(("active", active.to_string()));
        }
        if let Some(name) = &params.name {
            query.push(("name", name.clone()));
        }
        query.push(("sort", params.sort_key.as_str().to_string()));
        query.push(("dir", params.sort_dir.as_str().to_string()));
        query.push(("page", params.page.to_string()));
        query.push(("pageSize", params.page_size.to_string()));

        debug!(token = %params.cache_token(), "fetch promotions page");

        let response = self
            .authorize(self.client.get(self.promotions_url()).query(&query))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(parse_api_error(status, &body)));
        }

        let payload = response.json::<FetchPageResponse>().await?;
        payload.try_into()
    }

    async fn set_active(&self, id: PromotionId, is_active: bool) -> Result<()> {
        let url = format!("{}/{id}", self.promotions_url());
        debug!(%id, is_active, "patch promotion");

        let response = self
            .authorize(self.client.patch(url))
            .json(&json!({ "isActive": is_active }))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Error::Api(parse_api_error(status, &body)));
        }

        // 2xx bodies may still carry the error envelope.
        if let Ok(envelope) = serde_json::from_str::<MutationResponse>(&body) {
            if envelope.error {
                let message = envelope
                    .message
                    .map(|message| compact_message(&message))
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| "mutation rejected by server".to_string());
                return Err(Error::Api(message));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FetchPageResponse {
    data: Option<Vec<Promotion>>,
    total_count: Option<u64>,
    page: Option<u32>,
    page_size: Option<u32>,
    #[serde(default)]
    error: bool,
    message: Option<String>,
}

impl TryFrom<FetchPageResponse> for Page<Promotion> {
    type Error = Error;

    fn try_from(value: FetchPageResponse) -> Result<Self> {
        if value.error {
            let message = value
                .message
                .map(|message| compact_message(&message))
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| "fetch rejected by server".to_string());
            return Err(Error::Api(message));
        }

        let items = value
            .data
            .ok_or_else(|| Error::InvalidPayload("response did not include data".to_string()))?;
        let total_count = value.total_count.ok_or_else(|| {
            Error::InvalidPayload("response did not include totalCount".to_string())
        })?;
        let page = value.page.unwrap_or(1);
        let page_size = value
            .page_size
            .ok_or_else(|| Error::InvalidPayload("response did not include pageSize".to_string()))?;

        Self::new(items, total_count, page, page_size)
    }
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    #[serde(default)]
    error: bool,
    message: Option<String>,
}

/// A server message from the error envelope is surfaced verbatim (it becomes
/// the user-facing failure notice); anything else carries the status code for
/// debugging.
fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<MutationResponse>(body) {
        if let Some(message) = payload.message {
            let message = compact_message(&message);
            if !message.is_empty() {
                return message;
            }
        }
    }

    let trimmed = compact_message(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

/// Server text can be an arbitrarily large error page; cap what reaches a
/// notice at 180 characters.
fn compact_message(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_api_error_surfaces_envelope_message_verbatim() {
        let body = r#"{"error":true,"message":"Not authorized"}"#;
        assert_eq!(
            parse_api_error(StatusCode::FORBIDDEN, body),
            "Not authorized"
        );
    }

    #[test]
    fn parse_api_error_falls_back_to_body_then_status() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down (502)"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
    }

    #[test]
    fn parse_api_error_caps_oversized_bodies() {
        let body = "x".repeat(4_000);
        let message = parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert_eq!(message, format!("{} (500)", "x".repeat(180)));
    }

    #[test]
    fn fetch_response_requires_data_and_counts() {
        let missing_data = FetchPageResponse {
            data: None,
            total_count: Some(0),
            page: Some(1),
            page_size: Some(25),
            error: false,
            message: None,
        };
        assert!(matches!(
            Page::try_from(missing_data),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn fetch_response_surfaces_error_envelope() {
        let envelope = FetchPageResponse {
            data: None,
            total_count: None,
            page: None,
            page_size: None,
            error: true,
            message: Some("tenant suspended".to_string()),
        };
        match Page::try_from(envelope) {
            Err(Error::Api(message)) => assert_eq!(message, "tenant suspended"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn fetch_response_converts_into_page() {
        let promo = Promotion::new("Summer sale");
        let payload = FetchPageResponse {
            data: Some(vec![promo.clone()]),
            total_count: Some(12),
            page: Some(2),
            page_size: Some(25),
            error: false,
            message: None,
        };
        let page = Page::try_from(payload).unwrap();
        assert_eq!(page.items, vec![promo]);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.page, 2);
    }
}
