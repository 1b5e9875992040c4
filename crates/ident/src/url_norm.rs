// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! URL canonicalization, built on the `url` crate's parser — no hand-rolled
//! string surgery.

use url::Url;

/// Tracking query parameters stripped during normalization. Kept as a
/// small, named, documented deny-list rather than a regex.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "igshid",
    "mc_cid",
    "mc_eid",
    "_hsenc",
    "_hsmid",
    "mkt_tok",
    "ref",
    "ref_src",
];

/// Normalizes a URL: lowercases scheme and host, drops default ports,
/// strips tracking query parameters and the fragment, and removes a
/// trailing slash. Returns `None` for unparseable input.
pub fn normalize_url(input: &str) -> Option<String> {
    let mut url = Url::parse(input.trim()).ok()?;

    url.set_fragment(None);

    if let Some(host) = url.host_str() {
        let lower = host.to_ascii_lowercase();
        let _ = url.set_host(Some(&lower));
    }

    strip_default_port(&mut url);
    strip_tracking_params(&mut url);

    let mut out = url.to_string();
    if out.ends_with('/') && url.path() != "/" {
        out.pop();
    }
    Some(out)
}

fn strip_default_port(url: &mut Url) {
    let is_default = match (url.scheme(), url.port()) {
        ("http", Some(80)) => true,
        ("https", Some(443)) => true,
        _ => false,
    };
    if is_default {
        let _ = url.set_port(None);
    }
}

fn strip_tracking_params(url: &mut Url) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !TRACKING_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &kept {
            serializer.append_pair(k, v);
        }
        url.set_query(Some(&serializer.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lowercases_scheme_and_host() {
        assert_eq!(
            normalize_url("HTTPS://Example.COM/path"),
            Some("https://example.com/path".to_string())
        );
    }

    #[test]
    fn strips_default_port() {
        assert_eq!(
            normalize_url("https://example.com:443/path"),
            Some("https://example.com/path".to_string())
        );
    }

    #[test]
    fn strips_tracking_params_and_fragment() {
        assert_eq!(
            normalize_url("https://example.com/p?utm_source=x&id=7#frag"),
            Some("https://example.com/p?id=7".to_string())
        );
    }

    #[test]
    fn strips_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.com/path/"),
            Some("https://example.com/path".to_string())
        );
    }

    #[test]
    fn idempotent() {
        let once = normalize_url("https://Example.com:443/p/?utm_source=x#f").unwrap();
        let twice = normalize_url(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_unparseable() {
        assert_eq!(normalize_url("not a url"), None);
    }
}
