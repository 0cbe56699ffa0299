//! Login trigger delegating OAuth sign-in to an injected provider.

use std::future::Future;

use thiserror::Error;
use url::Url;

use crate::config::AuthConfig;

pub const NOT_AVAILABLE_NOTICE: &str =
    "Authentication is not enabled or Supabase is not initialized.";
pub const UNEXPECTED_NOTICE: &str = "An unexpected error occurred.";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Error reported by the auth provider itself; its message is shown to the user.
    #[error("{0}")]
    Provider(String),
    #[error("auth request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Unexpected(String),
}

/// Where the browser is sent to start the OAuth flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRedirect {
    pub provider: String,
    pub url: Url,
}

/// An OAuth-capable auth client.
pub trait AuthProvider {
    fn is_enabled(&self) -> bool;

    fn sign_in_with_oauth(
        &self,
        provider: &str,
        redirect_to: &Url,
    ) -> impl Future<Output = Result<OAuthRedirect, AuthError>> + Send;
}

/// Surface for user-visible notices (alerts).
pub trait Notifier {
    fn notify(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Authentication is off or no client is available; nothing was sent.
    Unavailable,
    Redirect(OAuthRedirect),
    Failed,
}

pub struct LoginTrigger<P, N> {
    client: Option<P>,
    notifier: N,
    page_url: Url,
}

impl<P: AuthProvider, N: Notifier> LoginTrigger<P, N> {
    /// Keeps `client` only when `auth` enables authentication.
    pub fn new(auth: &AuthConfig, client: Option<P>, notifier: N, page_url: Url) -> Self {
        let client = if auth.enabled {
            match client {
                Some(client) => {
                    tracing::info!("auth client initialized");
                    Some(client)
                }
                None => {
                    tracing::error!("auth client not available");
                    None
                }
            }
        } else {
            None
        };
        Self {
            client,
            notifier,
            page_url,
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn begin_login(&self, provider_id: &str) -> LoginOutcome {
        let Some(client) = self.client.as_ref().filter(|c| c.is_enabled()) else {
            self.notifier.notify(NOT_AVAILABLE_NOTICE);
            return LoginOutcome::Unavailable;
        };

        let redirect_to = redirect_target(&self.page_url);
        match client.sign_in_with_oauth(provider_id, &redirect_to).await {
            Ok(redirect) => {
                tracing::info!(provider = provider_id, url = %redirect.url, "login initiated");
                LoginOutcome::Redirect(redirect)
            }
            Err(AuthError::Provider(message)) => {
                tracing::error!(provider = provider_id, %message, "error logging in");
                self.notifier.notify(&format!("Login failed: {message}"));
                LoginOutcome::Failed
            }
            Err(err) => {
                tracing::error!(provider = provider_id, error = %err, "unexpected login error");
                self.notifier.notify(UNEXPECTED_NOTICE);
                LoginOutcome::Failed
            }
        }
    }
}

/// The page's origin and path, without query, fragment or credentials.
pub fn redirect_target(page_url: &Url) -> Url {
    let mut url = page_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url
}
