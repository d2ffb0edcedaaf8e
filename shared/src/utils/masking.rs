//! Helpers for writing untrusted or sensitive values into logs

/// Default number of characters kept by [`snippet`]
pub const LOG_SNIPPET_CHARS: usize = 50;

/// Truncate untrusted input for logging, keeping at most `max_chars` characters
///
/// Control characters are replaced with `?` so a crafted value cannot forge log lines.
pub fn snippet(input: &str, max_chars: usize) -> String {
    let mut out: String = input
        .chars()
        .take(max_chars)
        .map(|c| if c.is_control() { '?' } else { c })
        .collect();
    if input.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

/// Mask an IP address for logging
///
/// IPv4 keeps the first two octets (`192.168.*.*`), IPv6 keeps the first two groups.
/// Anything else is reported as `***`.
pub fn mask_ip(ip: &str) -> String {
    if let Ok(addr) = ip.parse::<std::net::IpAddr>() {
        return match addr {
            std::net::IpAddr::V4(v4) => {
                let o = v4.octets();
                format!("{}.{}.*.*", o[0], o[1])
            }
            std::net::IpAddr::V6(v6) => {
                let s = v6.segments();
                format!("{:x}:{:x}:*", s[0], s[1])
            }
        };
    }
    "***".to_string()
}

/// Mask an opaque identifier (jti, session id) keeping a short prefix
pub fn mask_id(id: &str) -> String {
    let prefix: String = id.chars().take(6).collect();
    if id.chars().count() <= 6 {
        "***".to_string()
    } else {
        format!("{}***", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncates() {
        let long = "a".repeat(80);
        let s = snippet(&long, LOG_SNIPPET_CHARS);
        assert_eq!(s.len(), 53);
        assert!(s.ends_with("..."));
        assert_eq!(snippet("short", 10), "short");
    }

    #[test]
    fn test_snippet_neutralizes_newlines() {
        assert_eq!(snippet("line1\nINFO forged", 50), "line1?INFO forged");
    }

    #[test]
    fn test_mask_ip() {
        assert_eq!(mask_ip("192.168.10.25"), "192.168.*.*");
        assert_eq!(mask_ip("2001:db8::1"), "2001:db8:*");
        assert_eq!(mask_ip("not-an-ip"), "***");
    }

    #[test]
    fn test_mask_id() {
        assert_eq!(mask_id("abcdefghijkl"), "abcdef***");
        assert_eq!(mask_id("abc"), "***");
    }
}
