//! External events that drive the office.
//!
//! Events arrive from outside the scheduler (any thread), are queued on a
//! channel and applied at the start of the next frame.

use crate::error::OfficeError;
use serde::{Deserialize, Serialize};

/// A roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Status update for one member. `state` uses the external vocabulary
/// (`typing`, `reading`, `sleeping`, `gone`, `coffee`, `idle`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub agent: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, rename = "lastMsg", skip_serializing_if = "Option::is_none")]
    pub last_msg: Option<String>,
}

impl StatusEvent {
    pub fn new(agent: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            state: state.into(),
            task: None,
            last_msg: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfficeEvent {
    /// Replace the team; rebuilds the office.
    Roster {
        members: Vec<Member>,
        #[serde(default)]
        statuses: Vec<StatusEvent>,
    },
    Status(StatusEvent),
    Message {
        #[serde(rename = "fromAgent")]
        from_agent: String,
        #[serde(rename = "toAgent")]
        to_agent: String,
        #[serde(default)]
        summary: String,
    },
    TaskAssigned { agent: String, task: String },
    Completed { agent: String },
    Shutdown,
}

impl OfficeEvent {
    pub fn from_json(s: &str) -> Result<Self, OfficeError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn is_roster(&self) -> bool {
        matches!(self, OfficeEvent::Roster { .. })
    }
}

/// Collapse a drained batch: everything before the last roster is superseded
/// by the rebuild it triggers.
pub fn coalesce(events: Vec<OfficeEvent>) -> Vec<OfficeEvent> {
    match events.iter().rposition(OfficeEvent::is_roster) {
        Some(last) => events.into_iter().skip(last).collect(),
        None => events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_with_last_msg() {
        let e = OfficeEvent::from_json(
            r#"{"type":"status","agent":"agent-a","state":"typing","lastMsg":"hi"}"#,
        )
        .unwrap();
        match e {
            OfficeEvent::Status(s) => {
                assert_eq!(s.agent, "agent-a");
                assert_eq!(s.state, "typing");
                assert_eq!(s.last_msg.as_deref(), Some("hi"));
                assert!(s.task.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_message_and_shutdown() {
        let e = OfficeEvent::from_json(
            r#"{"type":"message","fromAgent":"a","toAgent":"b","summary":"review"}"#,
        )
        .unwrap();
        assert_eq!(
            e,
            OfficeEvent::Message {
                from_agent: "a".into(),
                to_agent: "b".into(),
                summary: "review".into(),
            }
        );
        assert_eq!(OfficeEvent::from_json(r#"{"type":"shutdown"}"#).unwrap(), OfficeEvent::Shutdown);
    }

    #[test]
    fn test_roster_statuses_optional() {
        let e = OfficeEvent::from_json(r#"{"type":"roster","members":[{"name":"a"},{"name":"b"}]}"#).unwrap();
        assert!(matches!(e, OfficeEvent::Roster { ref members, ref statuses } if members.len() == 2 && statuses.is_empty()));
    }

    #[test]
    fn test_bad_payload_is_json_error() {
        assert!(matches!(OfficeEvent::from_json(r#"{"type":"dance"}"#), Err(OfficeError::Json(_))));
    }

    #[test]
    fn test_coalesce_keeps_last_roster_onward() {
        let roster = |n: &str| OfficeEvent::Roster {
            members: vec![Member::new(n)],
            statuses: Vec::new(),
        };
        let batch = vec![
            OfficeEvent::Status(StatusEvent::new("x", "typing")),
            roster("first"),
            OfficeEvent::Shutdown,
            roster("second"),
            OfficeEvent::Completed { agent: "second".into() },
        ];
        let kept = coalesce(batch);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], roster("second"));
        assert!(matches!(kept[1], OfficeEvent::Completed { .. }));
    }
}
