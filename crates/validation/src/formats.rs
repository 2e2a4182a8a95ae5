//! String format checks used by the built-in rules.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .ok()
});

// RFC 952 hostnames.
static HOSTNAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]([a-zA-Z0-9\-]+[\.]?)*[a-zA-Z0-9]$").ok());

static HEXADECIMAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(0[xX])?[0-9a-fA-F]+$").ok());

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern
        .as_ref()
        .is_some_and(|regex| regex.is_match(value))
}

pub fn is_email(value: &str) -> bool {
    matches(&EMAIL, value)
}

pub fn is_hostname(value: &str) -> bool {
    matches(&HOSTNAME, value)
}

pub fn is_hexadecimal(value: &str) -> bool {
    matches(&HEXADECIMAL, value)
}

pub fn is_alpha(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_alphabetic())
}

pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_alphanumeric())
}

pub fn is_alphanumeric_unicode(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphanumeric)
}

pub fn is_lowercase(value: &str) -> bool {
    !value.is_empty() && value == value.to_lowercase()
}

pub fn is_uppercase(value: &str) -> bool {
    !value.is_empty() && value == value.to_uppercase()
}

/// Absolute URL with a host (or a `file:` URL).
pub fn is_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|url| url.has_host() || url.scheme() == "file")
}

pub fn is_uri(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// Hyphenated UUID; `version` restricts the accepted version number.
pub fn is_uuid(value: &str, version: Option<usize>) -> bool {
    // Only the 36-character hyphenated form is accepted.
    if value.len() != 36 {
        return false;
    }
    uuid::Uuid::try_parse(value).is_ok_and(|id| version.is_none_or(|version| id.get_version_num() == version))
}

pub fn is_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

pub fn is_ipv4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6(value: &str) -> bool {
    value.parse::<Ipv6Addr>().is_ok()
}

/// Date/time in a chrono `layout`, or RFC 3339 when no layout is given.
///
/// Date-only and time-only layouts are accepted.
pub fn is_datetime(value: &str, layout: Option<&str>) -> bool {
    let Some(layout) = layout else {
        return DateTime::parse_from_rfc3339(value).is_ok();
    };
    DateTime::parse_from_str(value, layout).is_ok()
        || NaiveDateTime::parse_from_str(value, layout).is_ok()
        || NaiveDate::parse_from_str(value, layout).is_ok()
        || NaiveTime::parse_from_str(value, layout).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_email("john@example.com"));
        assert!(is_email("first.last+tag@sub.example.org"));
        assert!(!is_email("invalid-email"));
        assert!(!is_email("a@"));
        assert!(!is_email(""));
    }

    #[test]
    fn hostname_shapes() {
        assert!(is_hostname("api.example.com"));
        assert!(is_hostname("localhost"));
        assert!(!is_hostname("-leading.example"));
        assert!(!is_hostname("9starts-with-digit"));
    }

    #[test]
    fn uuid_shapes() {
        assert!(is_uuid("550e8400-e29b-41d4-a716-446655440000", None));
        assert!(is_uuid("550E8400-E29B-41D4-A716-446655440000", None));
        assert!(is_uuid("550e8400-e29b-41d4-a716-446655440000", Some(4)));
        assert!(!is_uuid("c232ab00-9414-11ec-b909-0242ac120002", Some(4)));
        assert!(!is_uuid("550e8400e29b41d4a716446655440000", None));
        assert!(!is_uuid("550e8400-e29b-41d4-a716", None));
    }

    #[test]
    fn url_and_uri_shapes() {
        assert!(is_url("https://example.com/path?q=1"));
        assert!(is_url("file:///tmp/x"));
        assert!(!is_url("mailto:someone@example.com"));
        assert!(is_uri("mailto:someone@example.com"));
        assert!(!is_uri("not a uri"));
    }

    #[test]
    fn ip_shapes() {
        assert!(is_ip("10.0.0.1"));
        assert!(is_ip("::1"));
        assert!(is_ipv4("192.168.1.1"));
        assert!(!is_ipv4("::1"));
        assert!(is_ipv6("fe80::1"));
        assert!(!is_ipv6("10.0.0.1"));
    }

    #[test]
    fn datetime_layouts() {
        assert!(is_datetime("2024-02-29T10:00:00Z", None));
        assert!(!is_datetime("2024-02-30", None));
        assert!(is_datetime("2024-02-29", Some("%Y-%m-%d")));
        assert!(is_datetime("10:30", Some("%H:%M")));
        assert!(!is_datetime("29/02/2024", Some("%Y-%m-%d")));
    }

    #[test]
    fn character_classes() {
        assert!(is_alpha("abcXYZ"));
        assert!(!is_alpha("abc1"));
        assert!(!is_alpha(""));
        assert!(is_alphanumeric("abc123"));
        assert!(is_alphanumeric_unicode("héllo123"));
        assert!(!is_alphanumeric("héllo"));
        assert!(is_lowercase("slug-1"));
        assert!(!is_lowercase("Slug"));
        assert!(is_uppercase("ABC-1"));
        assert!(is_hexadecimal("0xDEADbeef"));
        assert!(!is_hexadecimal("xyz"));
    }
}
