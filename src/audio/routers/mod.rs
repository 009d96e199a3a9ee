// Device routers - stream intent to concrete device selection
//
// Each router is one routing policy. A router answers "which device should
// this stream use" for six intents and returns the empty descriptor when it
// has no opinion, letting the next router of the chain decide. The
// `AudioRouterCenter` owns the chains and walks them in priority order.

pub mod cockpit_phone;
pub mod default;
pub mod pair_device;
pub mod privacy_priority;
pub mod public_priority;
pub mod router_center;
pub mod stream_filter;
pub mod user_select;

use crate::audio::types::{AudioDeviceDescriptor, SourceType, StreamUsage};

pub use cockpit_phone::CockpitPhoneRouter;
pub use default::DefaultRouter;
pub use pair_device::PairDeviceRouter;
pub use privacy_priority::PrivacyPriorityRouter;
pub use public_priority::PublicPriorityRouter;
pub use router_center::{AudioRouterCenter, CaptureIntent, RenderIntent, RouterChain};
pub use stream_filter::StreamFilterRouter;
pub use user_select::UserSelectRouter;

/// Common interface for routing policies
///
/// Every method returns the empty descriptor (`DeviceType::None`) when the
/// router has nothing to offer for that intent.
pub trait DeviceRouter: Send + Sync {
    /// Router name used in logs
    fn name(&self) -> &'static str;

    fn get_media_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        AudioDeviceDescriptor::default()
    }

    fn get_call_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        AudioDeviceDescriptor::default()
    }

    fn get_call_capture_device(&self, _source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        AudioDeviceDescriptor::default()
    }

    fn get_ring_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        AudioDeviceDescriptor::default()
    }

    fn get_record_capture_device(&self, _source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        AudioDeviceDescriptor::default()
    }

    fn get_tone_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        AudioDeviceDescriptor::default()
    }
}

/// Most recently connected device; on equal stamps the earlier entry wins
pub fn get_latest_connect_device(descs: &[AudioDeviceDescriptor]) -> AudioDeviceDescriptor {
    let mut latest: Option<&AudioDeviceDescriptor> = None;
    for desc in descs {
        if latest.map_or(true, |best| desc.connect_time_stamp > best.connect_time_stamp) {
            latest = Some(desc);
        }
    }
    latest.cloned().unwrap_or_default()
}

/// The candidate that is the same endpoint as `selected`, or the empty descriptor
pub fn find_selected_device(
    selected: &AudioDeviceDescriptor,
    candidates: &[AudioDeviceDescriptor],
) -> AudioDeviceDescriptor {
    if selected.is_none() {
        return AudioDeviceDescriptor::default();
    }
    candidates
        .iter()
        .find(|candidate| {
            candidate.is_same_device(selected) && candidate.mac_address == selected.mac_address
        })
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::{DeviceRole, DeviceType};

    fn sco(mac: &str, stamp: i64) -> AudioDeviceDescriptor {
        AudioDeviceDescriptor::new(DeviceType::BluetoothSco, DeviceRole::Output)
            .with_mac_address(mac)
            .with_connect_time_stamp(stamp)
    }

    #[test]
    fn test_latest_device_wins() {
        let descs = vec![sco("A", 100), sco("B", 300), sco("C", 200)];
        assert_eq!(get_latest_connect_device(&descs).mac_address, "B");
    }

    #[test]
    fn test_latest_device_tie_keeps_first() {
        let descs = vec![sco("A", 100), sco("B", 100)];
        assert_eq!(get_latest_connect_device(&descs).mac_address, "A");
        assert!(get_latest_connect_device(&[]).is_none());
    }

    #[test]
    fn test_find_selected_device() {
        let candidates = vec![sco("A", 1), sco("B", 2)];
        assert_eq!(find_selected_device(&sco("B", 0), &candidates).mac_address, "B");
        assert!(find_selected_device(&sco("Z", 0), &candidates).is_none());
        assert!(find_selected_device(&AudioDeviceDescriptor::default(), &candidates).is_none());
    }
}
