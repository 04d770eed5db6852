use serde::{Deserialize, Serialize};

use crate::config::Preferences;
use crate::errors::GradewatchError;
use crate::models::{NavigationEvent, SessionId};

/// Messages from the browser environment to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvironmentEvent {
    /// A request was made in a tracked session
    Navigate(NavigationEvent),
    /// The user asked for the full multi-host report of a session
    Report { session: SessionId },
    /// The preferences form was saved
    Preferences(Preferences),
    /// The session (tab) was closed
    Close { session: SessionId },
}

/// Parse one JSON-lines event. Blank lines and `#` comments yield `None`.
pub fn parse_event_line(line: &str) -> Result<Option<EnvironmentEvent>, GradewatchError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Depth;
    use crate::models::RequestKind;

    #[test]
    fn test_parse_navigate() {
        let event = parse_event_line(
            r#"{"type": "navigate", "session": 3, "url": "https://cdn.example.com/app.js", "kind": "script"}"#,
        ).unwrap().unwrap();
        assert_eq!(
            event,
            EnvironmentEvent::Navigate(NavigationEvent::new(3, "https://cdn.example.com/app.js", RequestKind::Script))
        );
    }

    #[test]
    fn test_parse_preferences_partial() {
        let event = parse_event_line(r#"{"type": "preferences", "depth": "all"}"#).unwrap().unwrap();
        match event {
            EnvironmentEvent::Preferences(prefs) => {
                assert_eq!(prefs.depth, Depth::All);
                assert_eq!(prefs.max_age, 72);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_and_close() {
        assert_eq!(
            parse_event_line(r#"{"type": "report", "session": 1}"#).unwrap(),
            Some(EnvironmentEvent::Report { session: 1 })
        );
        assert_eq!(
            parse_event_line(r#"{"type": "close", "session": 1}"#).unwrap(),
            Some(EnvironmentEvent::Close { session: 1 })
        );
    }

    #[test]
    fn test_skip_blank_and_comments() {
        assert!(parse_event_line("   ").unwrap().is_none());
        assert!(parse_event_line("# tab 1 opens").unwrap().is_none());
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(parse_event_line(r#"{"type": "reload", "session": 1}"#).is_err());
    }
}
