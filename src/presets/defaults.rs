//! Read-only default configurations shipped next to the app.
//!
//! The server exposes a directory listing; every linked `.json` file is one
//! [`ConfigPreset`]. Files that fail to load are skipped.

use tracing::warn;

use crate::types::ConfigPreset;

/// Directory the browser build fetches defaults from.
pub const DEFAULT_CONFIG_DIR: &str = "/configurations/";

/// `href` targets ending in `.json`, in document order, without duplicates.
pub fn json_links(listing_html: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    let lower = listing_html.to_ascii_lowercase();
    let mut rest = 0;

    while let Some(found) = lower.get(rest..).and_then(|s| s.find("href")) {
        let after_name = rest + found + "href".len();
        rest = after_name;

        let Some(tail) = listing_html.get(after_name..) else {
            break;
        };
        let trimmed = tail.trim_start();
        let Some(value) = trimmed.strip_prefix('=').map(str::trim_start) else {
            continue;
        };
        let target = match value.chars().next() {
            Some(quote @ ('"' | '\'')) => value
                .get(1..)
                .and_then(|v| v.find(quote).and_then(|end| v.get(..end))),
            _ => value
                .find(|c: char| c.is_whitespace() || c == '>')
                .and_then(|end| value.get(..end)),
        };
        if let Some(target) = target {
            if target.to_ascii_lowercase().ends_with(".json") && !links.iter().any(|l| l == target)
            {
                links.push(target.to_string());
            }
        }
    }

    links
}

/// URL of a linked file relative to `base` (absolute hrefs are kept).
pub fn resolve_link(base: &str, href: &str) -> String {
    if href.starts_with('/') || href.contains("://") {
        href.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), href)
    }
}

/// Decode one default configuration, logging and dropping bad files.
pub fn parse_default_config(source: &str, json: &str) -> Option<ConfigPreset> {
    match serde_json::from_str(json) {
        Ok(preset) => Some(preset),
        Err(e) => {
            warn!(source, error = %e, "skipping default configuration");
            None
        }
    }
}

/// Every `*.json` file in `dir`, sorted by file name.
#[cfg(not(target_arch = "wasm32"))]
pub fn read_default_dir(dir: &std::path::Path) -> crate::error::Result<Vec<ConfigPreset>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
        .collect();
    paths.sort();

    Ok(paths
        .iter()
        .filter_map(|path| {
            let source = path.display().to_string();
            match std::fs::read_to_string(path) {
                Ok(text) => parse_default_config(&source, &text),
                Err(e) => {
                    warn!(source, error = %e, "cannot read default configuration");
                    None
                }
            }
        })
        .collect())
}

/// Fetch the listing at `base` and every `.json` file it links.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_default_configs(base: &str) -> Vec<ConfigPreset> {
    let listing = match fetch_text(base).await {
        Ok(text) => text,
        Err(e) => {
            warn!(base, error = %e, "default configurations unavailable");
            return Vec::new();
        }
    };

    let mut presets = Vec::new();
    for href in json_links(&listing) {
        let url = resolve_link(base, &href);
        match fetch_text(&url).await {
            Ok(json) => presets.extend(parse_default_config(&url, &json)),
            Err(e) => warn!(url, error = %e, "failed to load default configuration"),
        }
    }
    presets
}

#[cfg(target_arch = "wasm32")]
async fn fetch_text(url: &str) -> crate::error::Result<String> {
    use crate::error::BarcodeGridError;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let js_err = |e: wasm_bindgen::JsValue| BarcodeGridError::Storage(format!("{e:?}"));
    let window = web_sys::window().ok_or_else(|| BarcodeGridError::Storage("no window".into()))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !response.ok() {
        return Err(BarcodeGridError::Storage(format!(
            "GET {url}: HTTP {}",
            response.status()
        )));
    }
    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    text.as_string()
        .ok_or_else(|| BarcodeGridError::Storage(format!("GET {url}: body is not text")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body><h1>Index of /configurations/</h1>
        <a href="../">../</a>
        <a href="a4-4x10.json">a4-4x10.json</a>
        <A HREF='zebra.JSON'>zebra</A>
        <a href=plain.json>plain</a>
        <a href="notes.txt">notes</a>
        <a href="a4-4x10.json">again</a>
    </body></html>"#;

    #[test]
    fn test_json_links() {
        assert_eq!(
            json_links(LISTING),
            vec!["a4-4x10.json", "zebra.JSON", "plain.json"]
        );
        assert!(json_links("").is_empty());
        assert!(json_links("<a href>broken</a>").is_empty());
    }

    #[test]
    fn test_resolve_link() {
        assert_eq!(resolve_link("/configurations/", "a.json"), "/configurations/a.json");
        assert_eq!(resolve_link("/configurations", "/x/a.json"), "/x/a.json");
    }

    #[test]
    fn test_parse_default_config() {
        let json = r#"{"id":"default-a4","name":"A4","timestamp":0,
            "config":{"columns":4,"rows":10,"pageFormat":"A4","margin":20}}"#;
        let preset = parse_default_config("a.json", json).unwrap();
        assert_eq!(preset.id, "default-a4");
        assert!(parse_default_config("b.json", "{oops").is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_read_default_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"{"id":"b","name":"B","timestamp":0,"config":{"columns":2,"rows":2,"margin":5}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("a.json"), "not json").unwrap();
        std::fs::write(dir.path().join("c.txt"), "{}").unwrap();
        let presets = read_default_dir(dir.path()).unwrap();
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].id, "b");
    }
}
