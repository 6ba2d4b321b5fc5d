//! CDX index query construction.

use url::Url;

/// Query for every captured URL under `domain` and its subdomains, one
/// original URL per line, collapsed by URL key.
pub fn index_url(endpoint: &Url, domain: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("url", &format!("*.{}/*", domain))
        .append_pair("output", "txt")
        .append_pair("fl", "original")
        .append_pair("collapse", "urlkey");
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_wildcard_domain_query() {
        let endpoint = Url::parse("https://web.archive.org/cdx/search/cdx").unwrap();
        let url = index_url(&endpoint, "example.com");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("url".to_string(), "*.example.com/*".to_string()),
                ("output".to_string(), "txt".to_string()),
                ("fl".to_string(), "original".to_string()),
                ("collapse".to_string(), "urlkey".to_string()),
            ]
        );
        assert_eq!(url.path(), "/cdx/search/cdx");
        assert_eq!(url.host_str(), Some("web.archive.org"));
    }

    #[test]
    fn domain_is_encoded() {
        let endpoint = Url::parse("http://127.0.0.1:1/cdx").unwrap();
        let url = index_url(&endpoint, "a b&c");
        assert!(url.as_str().contains("a+b%26c"));
    }
}
