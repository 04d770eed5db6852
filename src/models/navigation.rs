use serde::{Deserialize, Serialize};

/// Browser tab (or other browsing context) identifier.
pub type SessionId = u64;

/// Kind of resource a navigation event loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RequestKind {
    #[default]
    #[serde(rename = "main_frame")]
    MainFrame,
    #[serde(rename = "sub_frame")]
    SubFrame,
    #[serde(rename = "stylesheet")]
    Stylesheet,
    #[serde(rename = "script")]
    Script,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "font")]
    Font,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "xmlhttprequest")]
    XmlHttpRequest,
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "other")]
    Other,
}

impl RequestKind {
    pub const ALL: &'static [RequestKind] = &[
        RequestKind::MainFrame,
        RequestKind::SubFrame,
        RequestKind::Stylesheet,
        RequestKind::Script,
        RequestKind::Image,
        RequestKind::Font,
        RequestKind::Object,
        RequestKind::XmlHttpRequest,
        RequestKind::Ping,
        RequestKind::Other,
    ];

    /// A top-level document load, the one that names the session's primary host.
    pub fn is_top_level(&self) -> bool {
        matches!(self, RequestKind::MainFrame)
    }
}

/// A request observed in a tracked session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub session: SessionId,
    /// Full URL or bare hostname of the request.
    pub url: String,
    #[serde(default)]
    pub kind: RequestKind,
}

impl NavigationEvent {
    pub fn new(session: SessionId, url: impl Into<String>, kind: RequestKind) -> Self {
        Self { session, url: url.into(), kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_wire_names() {
        let kind: RequestKind = serde_json::from_str("\"xmlhttprequest\"").unwrap();
        assert_eq!(kind, RequestKind::XmlHttpRequest);
        let kind: RequestKind = serde_json::from_str("\"main_frame\"").unwrap();
        assert!(kind.is_top_level());
    }

    #[test]
    fn test_event_kind_defaults_to_main_frame() {
        let event: NavigationEvent =
            serde_json::from_str(r#"{"session": 7, "url": "https://example.com/"}"#).unwrap();
        assert_eq!(event.kind, RequestKind::MainFrame);
        assert_eq!(event.session, 7);
    }
}
