// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! External metadata fetchers for the auto-add gateway. Each service
//! is reached over a blocking HTTP client — auto-add only ever runs for a
//! handful of misses per pipeline invocation, so there's no need for an
//! async runtime here.

use model::Author;

use crate::error::FetchError;

#[derive(Debug, Clone, Default)]
pub struct FetchedMetadata {
    pub title: String,
    pub authors: Vec<Author>,
    pub year: Option<i32>,
    pub venue: Option<String>,
    pub publisher: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
}

/// Abstracts the three external services the gateway can consult, so its
/// retry/backoff/caching logic can be tested against a fake without
/// touching the network.
pub trait MetadataFetcher: Send + Sync {
    fn fetch_doi(&self, doi: &str) -> Result<FetchedMetadata, FetchError>;
    fn fetch_arxiv(&self, arxiv_id: &str) -> Result<FetchedMetadata, FetchError>;
    fn fetch_webpage(&self, url: &str) -> Result<FetchedMetadata, FetchError>;
}

pub struct ReqwestFetcher {
    client: reqwest::blocking::Client,
}

impl ReqwestFetcher {
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent.to_string())
            .build()
            .expect("reqwest client configuration is static and always valid");
        ReqwestFetcher { client }
    }
}

impl MetadataFetcher for ReqwestFetcher {
    fn fetch_doi(&self, doi: &str) -> Result<FetchedMetadata, FetchError> {
        let url = format!("https://api.crossref.org/works/{doi}");
        let body = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Request { service: "crossref", reason: e.to_string() })?
            .error_for_status()
            .map_err(|e| FetchError::Request { service: "crossref", reason: e.to_string() })?
            .text()
            .map_err(|e| FetchError::Request { service: "crossref", reason: e.to_string() })?;

        parse_crossref_work(&body)
    }

    fn fetch_arxiv(&self, arxiv_id: &str) -> Result<FetchedMetadata, FetchError> {
        let url = format!("https://export.arxiv.org/api/query?id_list={arxiv_id}");
        let body = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Request { service: "arxiv", reason: e.to_string() })?
            .error_for_status()
            .map_err(|e| FetchError::Request { service: "arxiv", reason: e.to_string() })?
            .text()
            .map_err(|e| FetchError::Request { service: "arxiv", reason: e.to_string() })?;

        parse_arxiv_entry(&body)
    }

    fn fetch_webpage(&self, url: &str) -> Result<FetchedMetadata, FetchError> {
        let body = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Request { service: "webpage", reason: e.to_string() })?
            .error_for_status()
            .map_err(|e| FetchError::Request { service: "webpage", reason: e.to_string() })?
            .text()
            .map_err(|e| FetchError::Request { service: "webpage", reason: e.to_string() })?;

        extract_title(&body)
            .map(|title| FetchedMetadata { title, ..Default::default() })
            .ok_or(FetchError::NoMetadata { service: "webpage" })
    }
}

fn parse_crossref_work(body: &str) -> Result<FetchedMetadata, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Request { service: "crossref", reason: e.to_string() })?;
    let message = &value["message"];

    let title = message["title"][0]
        .as_str()
        .ok_or(FetchError::NoMetadata { service: "crossref" })?
        .to_string();

    let authors = message["author"]
        .as_array()
        .map(|people| {
            people
                .iter()
                .filter_map(|p| {
                    let family = p["family"].as_str()?.to_string();
                    let given = p["given"].as_str().map(str::to_string);
                    Some(Author::Person { family, given })
                })
                .collect()
        })
        .unwrap_or_default();

    let year = ["published-print", "published-online", "issued", "created"]
        .iter()
        .find_map(|field| message[field]["date-parts"][0][0].as_i64())
        .map(|y| y as i32);

    let venue = message["container-title"][0].as_str().map(str::to_string);
    let publisher = message["publisher"].as_str().map(str::to_string);
    let volume = message["volume"].as_str().map(str::to_string);
    let issue = message["issue"].as_str().map(str::to_string);
    let pages = message["page"].as_str().map(str::to_string);

    Ok(FetchedMetadata { title, authors, year, venue, publisher, volume, issue, pages })
}

fn parse_arxiv_entry(body: &str) -> Result<FetchedMetadata, FetchError> {
    let doc = roxmltree::Document::parse(body)
        .map_err(|e| FetchError::Request { service: "arxiv", reason: e.to_string() })?;

    let entry = doc
        .descendants()
        .find(|n| n.has_tag_name("entry"))
        .ok_or(FetchError::NoMetadata { service: "arxiv" })?;

    let title = entry
        .children()
        .find(|c| c.has_tag_name("title"))
        .and_then(|c| c.text())
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .ok_or(FetchError::NoMetadata { service: "arxiv" })?;

    let authors = entry
        .children()
        .filter(|c| c.has_tag_name("author"))
        .filter_map(|author_node| {
            let name = author_node
                .children()
                .find(|c| c.has_tag_name("name"))
                .and_then(|c| c.text())?
                .trim();
            Some(split_display_name(name))
        })
        .collect();

    let year = entry
        .children()
        .find(|c| c.has_tag_name("published"))
        .and_then(|c| c.text())
        .and_then(|t| t.get(0..4))
        .and_then(|y| y.parse().ok());

    Ok(FetchedMetadata { title, authors, year, ..Default::default() })
}

fn split_display_name(full: &str) -> Author {
    match full.rsplit_once(' ') {
        Some((given, family)) => Author::Person { family: family.to_string(), given: Some(given.to_string()) },
        None => Author::Person { family: full.to_string(), given: None },
    }
}

/// Title extraction, preferred-source-first per §4.5/§6: `<meta
/// property="og:title">`, then `<meta name="citation_title">`, falling
/// back to the plain `<title>` element only when neither metadata tag is
/// present. The meta tags are what scholarly publishers and preprint
/// servers actually populate accurately; `<title>` often carries a site
/// name suffix a person never authored.
fn extract_title(html: &str) -> Option<String> {
    extract_meta_content(html, "og:title")
        .or_else(|| extract_meta_content(html, "citation_title"))
        .or_else(|| extract_title_element(html))
}

/// Finds a `<meta ... content="...">` tag whose `property` or `name`
/// attribute equals `key`, case-insensitively, regardless of attribute
/// order. Returns the decoded `content` value.
fn extract_meta_content(html: &str, key: &str) -> Option<String> {
    let lower = html.to_lowercase();
    let key_lower = key.to_lowercase();
    let mut search_from = 0usize;

    while let Some(rel_start) = lower[search_from..].find("<meta") {
        let tag_start = search_from + rel_start;
        let tag_end = html[tag_start..].find('>')? + tag_start;
        let tag = &html[tag_start..=tag_end];
        let tag_lower = &lower[tag_start..=tag_end];

        let matches_key = attr_value(tag, tag_lower, "property")
            .or_else(|| attr_value(tag, tag_lower, "name"))
            .map(|v| v.eq_ignore_ascii_case(&key_lower))
            .unwrap_or(false);

        if matches_key {
            if let Some(content) = attr_value(tag, tag_lower, "content") {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    return Some(decode_entities(trimmed));
                }
            }
        }

        search_from = tag_end + 1;
    }
    None
}

/// Reads `attr="value"` or `attr='value'` out of `tag` (original casing
/// preserved for the value), locating the attribute name case-insensitively
/// via `tag_lower`.
fn attr_value(tag: &str, tag_lower: &str, attr: &str) -> Option<String> {
    let needle = format!("{attr}=");
    let idx = tag_lower.find(&needle)?;
    let rest = &tag[idx + needle.len()..];
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let value_start = 1;
    let value_end = rest[value_start..].find(quote)? + value_start;
    Some(rest[value_start..value_end].to_string())
}

fn extract_title_element(html: &str) -> Option<String> {
    let lower = html.to_lowercase();
    let start = lower.find("<title")?;
    let open_end = html[start..].find('>')? + start + 1;
    let close = lower[open_end..].find("</title>")? + open_end;
    let raw = html[open_end..close].trim();
    if raw.is_empty() {
        None
    } else {
        Some(decode_entities(raw))
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_crossref_work_json() {
        let body = r#"{
            "message": {
                "title": ["Attention Is All You Need"],
                "author": [{"family": "Vaswani", "given": "Ashish"}],
                "published-print": {"date-parts": [[2017]]},
                "container-title": ["NeurIPS"]
            }
        }"#;
        let meta = parse_crossref_work(body).unwrap();
        assert_eq!(meta.title, "Attention Is All You Need");
        assert_eq!(meta.year, Some(2017));
        assert_eq!(meta.venue.as_deref(), Some("NeurIPS"));
    }

    #[test]
    fn extracts_html_title() {
        let html = "<html><head><title>Example Domain</title></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Example Domain"));
    }

    #[test]
    fn prefers_og_title_over_plain_title_element() {
        let html = concat!(
            "<html><head>",
            "<title>Example Domain - Site Name</title>",
            "<meta property=\"og:title\" content=\"The Real Paper Title\">",
            "</head></html>",
        );
        assert_eq!(extract_title(html).as_deref(), Some("The Real Paper Title"));
    }

    #[test]
    fn prefers_citation_title_over_plain_title_when_no_og_title() {
        let html = concat!(
            "<html><head>",
            "<title>Example Domain - Site Name</title>",
            "<meta name=\"citation_title\" content=\"A Scholarly Title\">",
            "</head></html>",
        );
        assert_eq!(extract_title(html).as_deref(), Some("A Scholarly Title"));
    }

    #[test]
    fn falls_back_to_title_element_when_no_meta_tags_present() {
        let html = "<html><head><title>Plain Fallback</title></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Plain Fallback"));
    }

    #[test]
    fn missing_title_yields_none() {
        assert_eq!(extract_title("<html><head></head></html>"), None);
    }
}
