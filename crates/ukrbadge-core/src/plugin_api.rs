//! Method surface exposed to the overlay frontend.
//!
//! Requests and responses are JSON objects, one per line on the socket:
//!
//! ```text
//! {"method":"resolve","title":"Hades"}          -> {"ok":true,"result":{"status":"OFFICIAL","url":"..."}}
//! {"method":"get_settings"}                     -> {"ok":true,"result":{"badgeType":"full",...}}
//! {"method":"set_settings","key":"offsetX","value":4} -> {"ok":true,"result":true}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::fetch::{CurlFetcher, PageFetcher};
use crate::resolver::Resolver;
use crate::settings::SettingsStore;
use crate::types::LookupResult;

/// Default path for the plugin socket (XDG state dir, next to the log).
pub fn default_socket_path() -> std::io::Result<PathBuf> {
    let dir = xdg::BaseDirectories::with_prefix("ukrbadge")?.get_state_home();
    Ok(dir.join("ukrbadge").join("plugin.sock"))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PluginRequest {
    Resolve { title: String },
    GetSettings,
    SetSettings { key: String, value: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PluginResponse {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

pub struct PluginApi<F = CurlFetcher> {
    resolver: Resolver<F>,
    settings: SettingsStore,
}

impl<F: PageFetcher> PluginApi<F> {
    pub fn new(resolver: Resolver<F>, settings: SettingsStore) -> Self {
        Self { resolver, settings }
    }

    pub async fn resolve_title(&self, title: &str) -> LookupResult {
        self.resolver.resolve(title).await
    }

    pub fn get_settings(&self) -> Map<String, Value> {
        self.settings.load()
    }

    pub fn set_settings(&self, key: &str, value: Value) -> anyhow::Result<bool> {
        self.settings.set(key, value)
    }

    pub async fn handle(&self, request: PluginRequest) -> PluginResponse {
        match request {
            PluginRequest::Resolve { title } => {
                let result = self.resolve_title(&title).await;
                match serde_json::to_value(&result) {
                    Ok(v) => PluginResponse::success(v),
                    Err(e) => PluginResponse::failure(e.to_string()),
                }
            }
            PluginRequest::GetSettings => PluginResponse::success(Value::Object(self.get_settings())),
            PluginRequest::SetSettings { key, value } => match self.set_settings(&key, value) {
                Ok(stored) => PluginResponse::success(Value::Bool(stored)),
                Err(e) => {
                    tracing::warn!(%key, "set_settings failed: {:#}", e);
                    PluginResponse::failure(format!("{:#}", e))
                }
            },
        }
    }

    /// Parses one JSON request line and serializes the response (no trailing newline).
    pub async fn handle_line(&self, line: &str) -> String {
        let response = match serde_json::from_str::<PluginRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => PluginResponse::failure(format!("invalid request: {}", e)),
        };
        serde_json::to_string(&response)
            .unwrap_or_else(|_| r#"{"ok":false,"error":"unserializable response"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::FakeFetcher;
    use crate::resolver::ResolverConfig;
    use serde_json::json;

    fn api(dir: &tempfile::TempDir) -> PluginApi<FakeFetcher> {
        let fetcher = FakeFetcher::new().page(
            "https://kuli.com.ua/hades",
            200,
            r#"<section class="product-essential">"#,
        );
        let resolver = Resolver::new(ResolverConfig::default(), fetcher).unwrap();
        PluginApi::new(resolver, SettingsStore::new(dir.path().join("user_settings.json")))
    }

    #[test]
    fn request_parsing() {
        let req: PluginRequest = serde_json::from_str(r#"{"method":"resolve","title":"Hades"}"#).unwrap();
        assert_eq!(req, PluginRequest::Resolve { title: "Hades".to_string() });
        let req: PluginRequest = serde_json::from_str(r#"{"method":"get_settings"}"#).unwrap();
        assert_eq!(req, PluginRequest::GetSettings);
        let req: PluginRequest =
            serde_json::from_str(r#"{"method":"set_settings","key":"offsetX","value":3}"#).unwrap();
        assert_eq!(
            req,
            PluginRequest::SetSettings {
                key: "offsetX".to_string(),
                value: json!(3)
            }
        );
        assert!(serde_json::from_str::<PluginRequest>(r#"{"method":"reboot"}"#).is_err());
    }

    #[tokio::test]
    async fn resolve_line() {
        let dir = tempfile::tempdir().unwrap();
        let out = api(&dir)
            .handle_line(r#"{"method":"resolve","title":"Hades"}"#)
            .await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            v,
            json!({"ok": true, "result": {"status": "OFFICIAL", "url": "https://kuli.com.ua/hades"}})
        );
    }

    #[tokio::test]
    async fn settings_lines() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);

        let out = api
            .handle_line(r#"{"method":"set_settings","key":"badgeType","value":"mini"}"#)
            .await;
        assert_eq!(out, r#"{"ok":true,"result":true}"#);
        let out = api
            .handle_line(r#"{"method":"set_settings","key":"nope","value":1}"#)
            .await;
        assert_eq!(out, r#"{"ok":true,"result":false}"#);

        let v: Value = serde_json::from_str(&api.handle_line(r#"{"method":"get_settings"}"#).await).unwrap();
        assert_eq!(v["result"]["badgeType"], "mini");
        assert_eq!(v["result"]["offsetY"], 10);
    }

    #[tokio::test]
    async fn malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let v: Value = serde_json::from_str(&api(&dir).handle_line("hello").await).unwrap();
        assert_eq!(v["ok"], false);
        assert!(v["error"].as_str().unwrap().starts_with("invalid request"));
        assert!(v.get("result").is_none());
    }
}
