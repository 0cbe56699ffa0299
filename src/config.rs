//! Site configuration loaded from `config.yaml`, and the page configuration
//! object the bootstrapper resolves bindings against.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Company field used to derive the document title.
pub const SHORT_NAME_KEY: &str = "companyShortName";

/// Company field copied into `#year`.
pub const YEAR_KEY: &str = "companyYear";

/// The configuration object handed to the page (`window.CONFIG`).
///
/// Absent sections deserialize as empty, so a page without any configuration
/// behaves exactly like one with `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "truthy_scalars")]
    pub company: BTreeMap<String, String>,
    /// Any other top-level fields; scalar ones are visible to bindings.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl PageConfig {
    /// Resolves a binding key: the `company` mapping first, then the top level.
    /// Empty values count as missing.
    pub fn lookup(&self, key: &str) -> Option<String> {
        if let Some(v) = self.company_field(key) {
            return Some(v.to_string());
        }
        if key == "title" {
            return self.title().map(str::to_string);
        }
        self.fields.get(key).and_then(truthy_text)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    pub fn company_field(&self, key: &str) -> Option<&str> {
        self.company
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn company_short_name(&self) -> Option<&str> {
        self.company_field(SHORT_NAME_KEY)
    }

    pub fn company_year(&self) -> Option<&str> {
        self.company_field(YEAR_KEY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    pub enabled: bool,
    pub supabase_url: String,
    pub supabase_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub title: Option<String>,
    pub providers: Vec<LoginProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginProvider {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
}

/// The whole `config.yaml` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub login: LoginConfig,
    #[serde(flatten)]
    pub page: PageConfig,
}

impl SiteConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parse {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Display heading for the login section.
    pub fn login_title(&self) -> &str {
        self.login
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Sign in")
    }
}

fn truthy_scalars<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| truthy_text(&v).map(|s| (k, s)))
        .collect())
}

/// Accepts any scalar, so `title: 2024` reads as `"2024"`.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar title, found {other}"
        ))),
    }
}

/// Text of a scalar value that would be truthy in the page runtime.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
