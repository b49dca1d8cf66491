//! Page-scoped socket address resolution.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use presence_config::ServerConfig;

/// Everything but RFC 3986 unreserved characters is escaped in a page id.
const PAGE_ID: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Base address of the presence server; one URL per page is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub path_prefix: String,
    /// The hosting page was loaded over https, so the socket must be `wss`.
    pub secure: bool,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, path_prefix: impl Into<String>, secure: bool) -> Self {
        Self {
            host: host.into(),
            path_prefix: path_prefix.into(),
            secure,
        }
    }

    pub fn from_config(server: &ServerConfig) -> Self {
        Self::new(&server.host, &server.path_prefix, server.secure)
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "wss"
        } else {
            "ws"
        }
    }

    /// Socket URL for one page: `{scheme}://{host}{prefix}/{page_id}`.
    pub fn url_for(&self, page_id: &str) -> String {
        format!(
            "{}://{}{}/{}",
            self.scheme(),
            self.host,
            self.path_prefix.trim_end_matches('/'),
            utf8_percent_encode(page_id, PAGE_ID)
        )
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_page_uses_ws() {
        let ep = Endpoint::new("10.0.0.5:8099", "/ws/presence", false);
        assert_eq!(ep.url_for("exam-42"), "ws://10.0.0.5:8099/ws/presence/exam-42");
    }

    #[test]
    fn secure_page_uses_wss() {
        let ep = Endpoint::new("presence.example.org", "/ws/presence", true);
        assert_eq!(
            ep.url_for("exam-42"),
            "wss://presence.example.org/ws/presence/exam-42"
        );
    }

    #[test]
    fn trailing_slash_in_prefix_is_ignored() {
        let ep = Endpoint::new("h", "/ws/presence/", false);
        assert_eq!(ep.url_for("p"), "ws://h/ws/presence/p");
    }

    #[test]
    fn page_id_is_percent_encoded() {
        let ep = Endpoint::new("h", "/ws", false);
        assert_eq!(ep.url_for("group 1/exam?"), "ws://h/ws/group%201%2Fexam%3F");
        assert_eq!(ep.url_for("a-b_c.d~e"), "ws://h/ws/a-b_c.d~e");
    }

    #[test]
    fn default_matches_default_config() {
        let ep = Endpoint::default();
        assert_eq!(ep.url_for("a"), "ws://localhost:8099/ws/presence/a");
    }
}
