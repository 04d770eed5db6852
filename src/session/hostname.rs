use std::sync::LazyLock;
use regex::Regex;

/// A dot with a word character on both sides, e.g. `example.com` but not
/// `localhost` or `intranet.`.
static QUALIFIED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\.\b").expect("static hostname pattern"));

pub fn is_qualified(hostname: &str) -> bool {
    QUALIFIED.is_match(hostname)
}

/// Extract the lower-cased hostname from a URL or a bare `host[:port]` string.
pub fn hostname_of(location: &str) -> Option<String> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = if trimmed.contains("://") {
        reqwest::Url::parse(trimmed)
    } else {
        reqwest::Url::parse(&format!("http://{}", trimmed))
    };

    let url = parsed.ok()?;
    let host = url.host_str()?.trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// Hostname of `location` if it is one worth tracking and scanning.
pub fn qualified_hostname(location: &str) -> Option<String> {
    hostname_of(location).filter(|h| is_qualified(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_hostnames() {
        assert!(is_qualified("example.com"));
        assert!(is_qualified("a.b.example.co.uk"));
        assert!(is_qualified("10.0.0.1"));
    }

    #[test]
    fn test_bare_hostnames_not_qualified() {
        assert!(!is_qualified("localhost"));
        assert!(!is_qualified("intranet"));
        assert!(!is_qualified(".hidden"));
        assert!(!is_qualified(""));
    }

    #[test]
    fn test_hostname_from_url() {
        assert_eq!(hostname_of("https://Example.COM/path?q=1").as_deref(), Some("example.com"));
        assert_eq!(hostname_of("http://example.com:8443/").as_deref(), Some("example.com"));
        assert_eq!(hostname_of("example.com.").as_deref(), Some("example.com"));
    }

    #[test]
    fn test_hostname_from_bare_host() {
        assert_eq!(hostname_of("cdn.example.net").as_deref(), Some("cdn.example.net"));
        assert_eq!(hostname_of("cdn.example.net:443").as_deref(), Some("cdn.example.net"));
    }

    #[test]
    fn test_hostname_of_unparseable() {
        assert!(hostname_of("").is_none());
        assert!(hostname_of("about:blank").is_none());
        assert!(hostname_of("http://").is_none());
    }

    #[test]
    fn test_qualified_hostname_filters_local() {
        assert!(qualified_hostname("http://localhost:3000/").is_none());
        assert_eq!(qualified_hostname("https://a.com/").as_deref(), Some("a.com"));
    }
}
