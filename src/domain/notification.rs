// Chat notification domain model
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const TRACKER_TITLE: &str = "Tracker";
pub const TRACKER_COLOR: u32 = 0xe8921e;

/// Identifies one delivered notification so its actions can be resolved later.
///
/// Random rather than sequential: chat messages outlive the process, and a
/// button from a previous run must never match a record from this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for NotificationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageBody {
    pub title: &'static str,
    pub color: u32,
    pub fields: Vec<Field>,
}

impl MessageBody {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            title: TRACKER_TITLE,
            color: TRACKER_COLOR,
            fields,
        }
    }

    #[cfg(test)]
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Maps,
    StreetView,
}

impl ActionKind {
    pub const ALL: [ActionKind; 2] = [ActionKind::Maps, ActionKind::StreetView];

    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Maps => "Maps",
            ActionKind::StreetView => "Street View",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            ActionKind::Maps => "maps",
            ActionKind::StreetView => "streetview",
        }
    }

    /// Opaque handle carried by chat buttons, e.g. `maps:<32 hex digits>`.
    pub fn handle(&self, id: NotificationId) -> String {
        format!("{}:{}", self.key(), id)
    }

    pub fn parse_handle(handle: &str) -> Option<(ActionKind, NotificationId)> {
        let (key, id) = handle.split_once(':')?;
        let kind = Self::ALL.into_iter().find(|k| k.key() == key)?;
        let id = id.parse().ok()?;
        Some((kind, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_round_trip() {
        let id: NotificationId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        let handle = ActionKind::StreetView.handle(id);
        assert_eq!(handle, "streetview:67e5504410b1426f9247bb680e5fe0c8");
        assert!(handle.len() <= 100);
        assert_eq!(
            ActionKind::parse_handle(&handle),
            Some((ActionKind::StreetView, id))
        );
    }

    #[test]
    fn test_ids_are_not_sequential() {
        let first = NotificationId::new();
        let second = NotificationId::new();
        assert_ne!(first, second);
        assert_ne!(first.to_string(), "1");
    }

    #[test]
    fn test_parse_handle_rejects_garbage() {
        assert_eq!(ActionKind::parse_handle("maps"), None);
        assert_eq!(ActionKind::parse_handle("satellite:1"), None);
        assert_eq!(ActionKind::parse_handle("maps:abc"), None);
        // Handles minted by older builds carried a process-local counter
        assert_eq!(ActionKind::parse_handle("maps:1"), None);
    }
}
