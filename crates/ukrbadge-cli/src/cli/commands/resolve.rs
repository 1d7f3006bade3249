//! `ukrbadge resolve <title>...` – resolve titles one by one.

use anyhow::Result;
use ukrbadge_core::config::BadgeConfig;
use ukrbadge_core::{LookupResult, Resolver};

pub async fn run_resolve(cfg: &BadgeConfig, titles: &[String], json: bool) -> Result<()> {
    let resolver = Resolver::from_config(cfg)?;
    let delay = cfg.batch.delay();
    for (i, title) in titles.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let result = resolver.resolve(title).await;
        if json {
            println!("{}", json_line(title, &result)?);
        } else {
            println!("{:<10} {}  ({})", result.status(), display_url(&result), title);
        }
    }
    Ok(())
}

fn json_line(title: &str, result: &LookupResult) -> Result<String> {
    let value = serde_json::json!({
        "title": title,
        "status": result.status(),
        "url": result.url(),
    });
    Ok(serde_json::to_string(&value)?)
}

pub(super) fn display_url(result: &LookupResult) -> &str {
    if result.is_found() {
        result.url()
    } else {
        "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ukrbadge_core::StatusTag;

    #[test]
    fn json_line_shape() {
        let result = LookupResult::found(StatusTag::Community, "https://kuli.com.ua/hades");
        assert_eq!(
            json_line("Hades", &result).unwrap(),
            r#"{"status":"COMMUNITY","title":"Hades","url":"https://kuli.com.ua/hades"}"#
        );
        assert_eq!(display_url(&LookupResult::none()), "-");
    }
}
