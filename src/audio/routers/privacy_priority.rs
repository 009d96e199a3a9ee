use std::sync::Arc;

use super::{get_latest_connect_device, DeviceRouter};
use crate::audio::devices::AudioDeviceManager;
use crate::audio::types::{AudioDeviceDescriptor, SourceType, StreamUsage};

/// Prefers the most recent personal device (headsets, earbuds)
#[derive(Debug, Clone)]
pub struct PrivacyPriorityRouter {
    device_manager: Arc<AudioDeviceManager>,
}

impl PrivacyPriorityRouter {
    pub fn new(device_manager: Arc<AudioDeviceManager>) -> Self {
        Self { device_manager }
    }
}

impl DeviceRouter for PrivacyPriorityRouter {
    fn name(&self) -> &'static str {
        "privacy_priority_router"
    }

    fn get_media_render_device(&self, stream_usage: StreamUsage, client_uid: i32) -> AudioDeviceDescriptor {
        let desc = get_latest_connect_device(&self.device_manager.get_media_render_privacy_devices());
        crate::device_debug!(
            "{:?} client {} fetch media render {:?}",
            stream_usage,
            client_uid,
            desc.device_type
        );
        desc
    }

    fn get_call_render_device(&self, stream_usage: StreamUsage, client_uid: i32) -> AudioDeviceDescriptor {
        let desc = get_latest_connect_device(&self.device_manager.get_comm_render_privacy_devices());
        crate::device_debug!(
            "{:?} client {} fetch call render {:?}",
            stream_usage,
            client_uid,
            desc.device_type
        );
        desc
    }

    fn get_call_capture_device(&self, source_type: SourceType, client_uid: i32) -> AudioDeviceDescriptor {
        let desc = get_latest_connect_device(&self.device_manager.get_comm_capture_privacy_devices());
        crate::device_debug!(
            "{:?} client {} fetch call capture {:?}",
            source_type,
            client_uid,
            desc.device_type
        );
        desc
    }

    fn get_record_capture_device(&self, source_type: SourceType, client_uid: i32) -> AudioDeviceDescriptor {
        let desc = get_latest_connect_device(&self.device_manager.get_media_capture_privacy_devices());
        crate::device_debug!(
            "{:?} client {} fetch record capture {:?}",
            source_type,
            client_uid,
            desc.device_type
        );
        desc
    }
}
