// Device change events
//
// Connect and disconnect reports travel from the device-event layer to the
// monitor task as `DeviceChangeEvent`s. Events are serializable so they can
// be logged or replayed as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio::types::AudioDeviceDescriptor;

/// What happened to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceChangeType {
    Connected,
    Disconnected,
}

/// One connect or disconnect report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceChangeEvent {
    pub id: Uuid,
    pub change_type: DeviceChangeType,
    pub descriptor: AudioDeviceDescriptor,
    pub received_at: DateTime<Utc>,
}

impl DeviceChangeEvent {
    pub fn new(change_type: DeviceChangeType, descriptor: AudioDeviceDescriptor) -> Self {
        Self {
            id: Uuid::new_v4(),
            change_type,
            descriptor,
            received_at: Utc::now(),
        }
    }

    pub fn connected(descriptor: AudioDeviceDescriptor) -> Self {
        Self::new(DeviceChangeType::Connected, descriptor)
    }

    pub fn disconnected(descriptor: AudioDeviceDescriptor) -> Self {
        Self::new(DeviceChangeType::Disconnected, descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::{DeviceRole, DeviceType};

    #[test]
    fn test_event_serializes_as_json() {
        let event = DeviceChangeEvent::connected(
            AudioDeviceDescriptor::new(DeviceType::BluetoothA2dp, DeviceRole::Output)
                .with_mac_address("AA:BB"),
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"Connected\""));
        assert!(json.contains("AA:BB"));

        let decoded: DeviceChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id, event.id);
        assert_eq!(decoded.descriptor.device_type, DeviceType::BluetoothA2dp);
    }

    #[test]
    fn test_events_get_distinct_ids() {
        let desc = AudioDeviceDescriptor::new(DeviceType::Speaker, DeviceRole::Output);
        let a = DeviceChangeEvent::connected(desc.clone());
        let b = DeviceChangeEvent::disconnected(desc);
        assert_ne!(a.id, b.id);
        assert_eq!(b.change_type, DeviceChangeType::Disconnected);
    }
}
