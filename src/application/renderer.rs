// Notification renderer - Message body and deferred map-link actions for a record
use crate::domain::location::LocationRecord;
use crate::domain::notification::{ActionKind, Field, MessageBody};
use std::sync::Arc;

const MAP_ZOOM: u8 = 17;
const MAP_TYPE: &str = "hybrid";
const IMAGE_SIZE: &str = "400x400";
const MARKER_STYLE: &str = "color:blue%7Clabel:V%7C";
const STREET_VIEW_FOV: u8 = 80;
const STREET_VIEW_PITCH: u8 = 0;

/// Static image endpoints plus the key they are signed with.
#[derive(Debug, Clone)]
pub struct MapLinks {
    pub api_key: String,
    pub static_map_url: String,
    pub street_view_url: String,
}

impl MapLinks {
    /// Hybrid map centred on the fix with a single labelled pin.
    pub fn static_map(&self, record: &LocationRecord) -> String {
        let center = record.coordinates.compact();
        format!(
            "{}?center={}&zoom={}&size={}&maptype={}&markers={}{}&key={}",
            self.static_map_url,
            center,
            MAP_ZOOM,
            IMAGE_SIZE,
            MAP_TYPE,
            MARKER_STYLE,
            center,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Panorama at the fix, facing the direction of travel.
    pub fn street_view(&self, record: &LocationRecord) -> String {
        format!(
            "{}?size={}&location={}&fov={}&heading={}&pitch={}&key={}",
            self.street_view_url,
            IMAGE_SIZE,
            record.coordinates.compact(),
            STREET_VIEW_FOV,
            record.forward_heading.round() as i64,
            STREET_VIEW_PITCH,
            urlencoding::encode(&self.api_key)
        )
    }
}

/// A chat button's behaviour, bound to the record it was rendered from.
#[derive(Debug, Clone)]
pub struct LocationAction {
    pub kind: ActionKind,
    record: Arc<LocationRecord>,
    links: Arc<MapLinks>,
}

impl LocationAction {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn record(&self) -> &LocationRecord {
        &self.record
    }

    /// Computes the follow-up message for this action.
    pub fn invoke(&self) -> String {
        match self.kind {
            ActionKind::Maps => self.links.static_map(&self.record),
            ActionKind::StreetView => self.links.street_view(&self.record),
        }
    }
}

/// Exactly one action per `ActionKind`, in `ActionKind::ALL` order.
#[derive(Debug, Clone)]
pub struct ActionSet {
    actions: [LocationAction; 2],
}

impl ActionSet {
    pub fn iter(&self) -> impl Iterator<Item = &LocationAction> {
        self.actions.iter()
    }

    pub fn get(&self, kind: ActionKind) -> &LocationAction {
        match kind {
            ActionKind::Maps => &self.actions[0],
            ActionKind::StreetView => &self.actions[1],
        }
    }
}

#[derive(Clone)]
pub struct NotificationRenderer {
    links: Arc<MapLinks>,
}

impl NotificationRenderer {
    pub fn new(links: MapLinks) -> Self {
        Self {
            links: Arc::new(links),
        }
    }

    pub fn render(&self, record: Arc<LocationRecord>) -> (MessageBody, ActionSet) {
        let body = MessageBody::new(vec![
            field("Timestamp", record.timestamp.clone()),
            field("Coordinates", record.coordinates.to_string()),
            field("Speed", record.speed.to_string()),
            field("Altitude", record.altitude.to_string()),
            field("Battery Level", record.battery_level.to_string()),
            field("WiFi", record.wifi.to_string()),
            field("Address", record.address.clone()),
        ]);

        let actions = ActionSet {
            actions: ActionKind::ALL.map(|kind| LocationAction {
                kind,
                record: record.clone(),
                links: self.links.clone(),
            }),
        };

        (body, actions)
    }
}

fn field(label: &'static str, value: String) -> Field {
    Field { label, value }
}
