use std::env;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use serde::Serialize;
use vitrine_core::config::ClientConfig;
use vitrine_core::remote::HttpPromotionApi;
use vitrine_core::sync::{CollectionSynchronizer, Notice, Notifier};
use vitrine_core::Promotion;

use crate::error::CliError;

const API_URL_VAR: &str = "VITRINE_API_URL";
const TENANT_VAR: &str = "VITRINE_TENANT";
const TOKEN_VAR: &str = "VITRINE_API_TOKEN";

/// Notifier that records notices for the command to report once.
#[derive(Default, Clone)]
pub struct CollectedNotices {
    inner: Arc<Mutex<Vec<Notice>>>,
}

impl CollectedNotices {
    pub fn take(&self) -> Vec<Notice> {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }
}

impl Notifier for CollectedNotices {
    fn notify(&self, notice: Notice) {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.push(notice);
    }
}

/// Resolve the client config from flags first, environment second.
pub fn resolve_config(
    api_url: Option<&str>,
    tenant: Option<&str>,
) -> Result<ClientConfig, CliError> {
    let api_url = match api_url {
        Some(url) => url.to_string(),
        None => env::var(API_URL_VAR).map_err(|_| CliError::EndpointNotConfigured)?,
    };
    let tenant = match tenant {
        Some(tenant) => tenant.to_string(),
        None => env::var(TENANT_VAR).map_err(|_| CliError::EndpointNotConfigured)?,
    };

    let mut config = ClientConfig::new(api_url, tenant)?;
    if let Ok(token) = env::var(TOKEN_VAR) {
        config = config.with_token(token);
    }
    tracing::debug!(?config, "resolved client config");
    Ok(config)
}

pub fn build_synchronizer(
    api_url: Option<&str>,
    tenant: Option<&str>,
) -> Result<
    (
        CollectionSynchronizer<HttpPromotionApi, CollectedNotices>,
        CollectedNotices,
    ),
    CliError,
> {
    let config = resolve_config(api_url, tenant)?;
    let tenant = config.tenant_id.clone();
    let api = HttpPromotionApi::new(config)?;
    let notices = CollectedNotices::default();
    let sync = CollectionSynchronizer::with_notifier(api, tenant, notices.clone());
    Ok((sync, notices))
}

#[derive(Debug, Serialize)]
pub struct PromotionListItem {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub usage_count: u64,
    pub ends_at: Option<String>,
}

pub fn promotion_to_list_item(promotion: &Promotion) -> PromotionListItem {
    PromotionListItem {
        id: promotion.id.as_str(),
        name: promotion.name.clone(),
        is_active: promotion.is_active,
        usage_count: promotion.usage_count,
        ends_at: promotion.ends_at.map(format_timestamp_ms),
    }
}

pub fn format_promotion_lines(promotions: &[Promotion]) -> Vec<String> {
    promotions
        .iter()
        .map(|promotion| {
            let state = if promotion.is_active { "on " } else { "off" };
            let ends = promotion
                .ends_at
                .map_or_else(|| "open-ended".to_string(), format_timestamp_ms);
            format!(
                "{}  [{}]  used {:>5}  ends {}  {}",
                promotion.id, state, promotion.usage_count, ends, promotion.name
            )
        })
        .collect()
}

fn format_timestamp_ms(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map_or_else(|| ms.to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collected_notices_take_drains() {
        let notices = CollectedNotices::default();
        notices.notify(Notice::Success("ok".to_string()));

        assert_eq!(notices.take(), vec![Notice::Success("ok".to_string())]);
        assert!(notices.take().is_empty());
    }

    #[test]
    fn list_lines_show_state_and_usage() {
        let mut promotion = Promotion::new("Summer sale");
        promotion.usage_count = 12;
        let lines = format_promotion_lines(std::slice::from_ref(&promotion));

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[on ]"));
        assert!(lines[0].contains("used    12"));
        assert!(lines[0].contains("Summer sale"));
    }

    #[test]
    fn timestamps_render_as_utc_dates() {
        assert_eq!(format_timestamp_ms(0), "1970-01-01 00:00");
    }
}
