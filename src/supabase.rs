//! [`AuthProvider`] backed by the Supabase auth (GoTrue) HTTP API.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use crate::auth::{AuthError, AuthProvider, OAuthRedirect};
use crate::config::AuthConfig;

pub const UNSUPPORTED_PROVIDER: &str = "Unsupported provider: provider is not enabled";

#[derive(Debug, Deserialize)]
struct Settings {
    #[serde(default)]
    external: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: Url,
    key: String,
}

impl SupabaseClient {
    /// Returns `None` when the project URL or key is missing or unusable,
    /// which callers treat as "no auth client on this page".
    pub fn from_config(auth: &AuthConfig, user_agent: &str) -> Option<Self> {
        let url = auth.supabase_url.trim();
        let key = auth.supabase_key.trim();
        if url.is_empty() || key.is_empty() {
            tracing::warn!("supabase url or key not configured");
            return None;
        }

        let mut base_url = match Url::parse(url) {
            Ok(u) => u,
            Err(err) => {
                tracing::warn!(url, error = %err, "invalid supabase url");
                return None;
            }
        };
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = match reqwest::Client::builder().user_agent(user_agent).build() {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(error = %err, "build reqwest client");
                return None;
            }
        };

        Some(Self {
            client,
            base_url,
            key: key.to_string(),
        })
    }

    fn endpoint(&self, name: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(&format!("auth/v1/{name}"))
            .map_err(|e| AuthError::Unexpected(format!("build auth url: {e}")))
    }

    async fn external_providers(&self) -> Result<BTreeMap<String, serde_json::Value>, AuthError> {
        let url = self.endpoint("settings")?;
        let resp = self
            .client
            .get(url.clone())
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Unexpected(format!(
                "GET {url} failed with status {status}"
            )));
        }

        let body = resp.bytes().await?;
        let settings: Settings = serde_json::from_slice(&body)
            .map_err(|e| AuthError::Unexpected(format!("parse auth settings: {e}")))?;
        Ok(settings.external)
    }
}

impl AuthProvider for SupabaseClient {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn sign_in_with_oauth(
        &self,
        provider: &str,
        redirect_to: &Url,
    ) -> Result<OAuthRedirect, AuthError> {
        let provider = provider.trim();
        if provider.is_empty() {
            return Err(AuthError::Provider("No provider specified".to_string()));
        }

        let external = self.external_providers().await?;
        if external.get(provider) != Some(&serde_json::Value::Bool(true)) {
            return Err(AuthError::Provider(UNSUPPORTED_PROVIDER.to_string()));
        }

        let mut url = self.endpoint("authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to.as_str());

        Ok(OAuthRedirect {
            provider: provider.to_string(),
            url,
        })
    }
}
