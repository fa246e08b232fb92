//! Blizzard Game Data API client.
//!
//! Authenticates with the OAuth2 client-credentials grant, caches the bearer
//! token until shortly before expiry, and issues namespace/locale-scoped GETs
//! against the region's data API. A 404 from the data API is a sentinel
//! (`Ok(None)`), not an error; anything else non-2xx is an `Upstream` error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::config::BlizzardConfig;
use crate::services::rate_limit::RateLimiter;

const TOKEN_URL: &str = "https://oauth.battle.net/token";

/// Safety margin subtracted from the server-reported token lifetime.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// OAuth2 client credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Read `BLIZZARD_CLIENT_ID` / `BLIZZARD_CLIENT_SECRET`; `None` when
    /// either is missing or empty.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("BLIZZARD_CLIENT_ID").ok()?;
        let client_secret = std::env::var("BLIZZARD_CLIENT_SECRET").ok()?;
        if client_id.is_empty() || client_secret.is_empty() {
            return None;
        }
        Some(Self {
            client_id,
            client_secret,
        })
    }
}

/// A cached bearer token.
#[derive(Debug, Clone)]
struct Token {
    bearer: String,
    expires_at: Instant,
}

impl Token {
    fn from_response(bearer: String, expires_in_secs: u64, now: Instant) -> Self {
        let lifetime = Duration::from_secs(expires_in_secs).saturating_sub(EXPIRY_MARGIN);
        Self {
            bearer,
            expires_at: now + lifetime,
        }
    }

    fn is_valid(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

// ---- wire payloads ----

/// One entry in the item-set index.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SetIndexEntry {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
struct SetIndexResponse {
    #[serde(default)]
    item_sets: Vec<SetIndexEntry>,
}

/// A name-bearing reference, the API's `{id, name}` building block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

/// One member slot of a set; the item reference can be absent for malformed
/// entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetMember {
    #[serde(default)]
    pub item: Option<NamedRef>,
}

/// Raw payload for a single item set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetDetail {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<SetMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRequirements {
    #[serde(default)]
    pub playable_classes: Option<Vec<NamedRef>>,
}

/// Raw payload for a single item, trimmed to the fields classification needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemDetail {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quality: Option<NamedRef>,
    #[serde(default)]
    pub item_class: Option<NamedRef>,
    #[serde(default)]
    pub item_subclass: Option<NamedRef>,
    #[serde(default)]
    pub requirements: Option<ItemRequirements>,
}

impl ItemDetail {
    /// Display names from the explicit allowed-class requirement, if any.
    pub fn allowed_class_names(&self) -> Vec<String> {
        self.requirements
            .as_ref()
            .and_then(|r| r.playable_classes.as_ref())
            .map(|list| list.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Armor subclass name, only for items whose class is Armor.
    pub fn armor_subclass(&self) -> Option<&str> {
        let class = self.item_class.as_ref()?;
        if class.name != "Armor" {
            return None;
        }
        self.item_subclass.as_ref().map(|s| s.name.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
struct MediaAsset {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct MediaResponse {
    #[serde(default)]
    assets: Vec<MediaAsset>,
}

/// Upstream source of set/item data. The hydration pipeline runs against
/// this seam so tests can drive it with a stub.
#[async_trait]
pub trait SetProvider: Send + Sync {
    /// Full index of `{id, name}` set entries.
    async fn get_index(&self) -> Result<Vec<SetIndexEntry>>;

    /// Raw set payload; `None` on upstream 404.
    async fn get_set_detail(&self, id: u32) -> Result<Option<SetDetail>>;

    /// Raw item payload; `None` on upstream 404.
    async fn get_item_detail(&self, id: u32) -> Result<Option<ItemDetail>>;
}

/// HTTP client for the Blizzard Game Data API.
pub struct BlizzardClient {
    http: Client,
    config: BlizzardConfig,
    credentials: Option<Credentials>,
    token: RwLock<Option<Token>>,
    limiter: RateLimiter,
}

impl BlizzardClient {
    pub fn new(config: BlizzardConfig, credentials: Option<Credentials>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        let limiter = RateLimiter::new(config.requests_per_second, config.burst);

        Self {
            http,
            config,
            credentials,
            token: RwLock::new(None),
            limiter,
        }
    }

    fn api_base(&self) -> String {
        format!("https://{}.api.blizzard.com", self.config.region)
    }

    fn namespace(&self) -> String {
        format!("static-{}", self.config.region)
    }

    /// Return a valid bearer token, refreshing through the client-credentials
    /// grant when the cached one is absent or expired.
    ///
    /// Double-checked read, not a refresh lock: two near-simultaneous callers
    /// may both refresh. The token endpoint is idempotent and cheap, so the
    /// duplicate request is accepted rather than serialized.
    pub async fn get_token(&self) -> Result<String> {
        let now = Instant::now();
        if let Some(token) = self.token.read().await.as_ref()
            && token.is_valid(now)
        {
            return Ok(token.bearer.clone());
        }

        let creds = self.credentials.as_ref().ok_or_else(|| {
            AppError::auth("BLIZZARD_CLIENT_ID / BLIZZARD_CLIENT_SECRET not configured")
        })?;

        self.limiter.acquire().await;
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::auth(format!(
                "token endpoint rejected credentials: HTTP {}",
                response.status()
            )));
        }

        let body: TokenResponse = response.json().await?;
        let token = Token::from_response(body.access_token, body.expires_in, Instant::now());
        let bearer = token.bearer.clone();
        *self.token.write().await = Some(token);

        log::debug!("Obtained new Blizzard API token");
        Ok(bearer)
    }

    /// Rate-limited, bearer-authenticated GET; `Ok(None)` on 404.
    async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>> {
        let token = self.get_token().await?;
        self.limiter.acquire().await;

        let url = format!("{}{}", self.api_base(), path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("namespace", self.namespace()),
                ("locale", self.config.locale.clone()),
            ])
            .send()
            .await
            .map_err(|e| AppError::upstream(path.to_string(), e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response
                    .json()
                    .await
                    .map_err(|e| AppError::upstream(path.to_string(), e))?;
                Ok(Some(body))
            }
            status => Err(AppError::upstream(
                path.to_string(),
                format!("HTTP {}", status),
            )),
        }
    }

    /// Resolve an item's icon URL from its media assets; `None` when the
    /// item or its icon asset is missing.
    pub async fn get_item_media(&self, item_id: u32) -> Result<Option<String>> {
        let media: Option<MediaResponse> = self
            .get_optional(&format!("/data/wow/media/item/{}", item_id))
            .await?;
        Ok(media.and_then(|m| {
            m.assets
                .into_iter()
                .find(|a| a.key == "icon")
                .map(|a| a.value)
        }))
    }
}

#[async_trait]
impl SetProvider for BlizzardClient {
    async fn get_index(&self) -> Result<Vec<SetIndexEntry>> {
        let index: Option<SetIndexResponse> =
            self.get_optional("/data/wow/item-set/index").await?;
        index
            .map(|i| i.item_sets)
            .ok_or_else(|| AppError::upstream("/data/wow/item-set/index", "HTTP 404"))
    }

    async fn get_set_detail(&self, id: u32) -> Result<Option<SetDetail>> {
        self.get_optional(&format!("/data/wow/item-set/{}", id)).await
    }

    async fn get_item_detail(&self, id: u32) -> Result<Option<ItemDetail>> {
        self.get_optional(&format!("/data/wow/item/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_expiry_applies_safety_margin() {
        let now = Instant::now();
        let token = Token::from_response("abc".into(), 3600, now);

        assert!(token.is_valid(now));
        assert!(token.is_valid(now + Duration::from_secs(3600 - 61)));
        assert!(!token.is_valid(now + Duration::from_secs(3600 - 60)));
    }

    #[test]
    fn short_lived_token_is_immediately_stale() {
        let now = Instant::now();
        let token = Token::from_response("abc".into(), 30, now);
        assert!(!token.is_valid(now));
    }

    #[tokio::test]
    async fn missing_credentials_is_auth_error() {
        let client = BlizzardClient::new(BlizzardConfig::default(), None);
        let err = client.get_token().await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[test]
    fn item_detail_allowed_classes_and_armor() {
        let item: ItemDetail = serde_json::from_str(
            r#"{
                "id": 16853,
                "name": "Lawbringer Chestguard",
                "quality": {"id": 0, "name": "Epic"},
                "item_class": {"id": 4, "name": "Armor"},
                "item_subclass": {"id": 4, "name": "Plate"},
                "requirements": {
                    "playable_classes": [{"id": 2, "name": "Paladin"}]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(item.allowed_class_names(), vec!["Paladin"]);
        assert_eq!(item.armor_subclass(), Some("Plate"));
    }

    #[test]
    fn non_armor_item_has_no_armor_subclass() {
        let item: ItemDetail = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Some Trinket",
                "item_class": {"id": 0, "name": "Miscellaneous"},
                "item_subclass": {"id": 0, "name": "Junk"}
            }"#,
        )
        .unwrap();

        assert!(item.allowed_class_names().is_empty());
        assert_eq!(item.armor_subclass(), None);
    }

    #[test]
    fn sparse_set_detail_deserializes() {
        let detail: SetDetail = serde_json::from_str(r#"{"id": 1060}"#).unwrap();
        assert_eq!(detail.id, 1060);
        assert!(detail.items.is_empty());
    }
}
