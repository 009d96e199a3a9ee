use std::sync::Arc;

use super::{get_latest_connect_device, DeviceRouter};
use crate::audio::devices::AudioDeviceManager;
use crate::audio::types::{AudioDeviceDescriptor, SourceType, StreamUsage};

/// Falls back to shared devices (sound boxes, car kits) for media.
/// Calls are never routed to a public device by this router.
#[derive(Debug, Clone)]
pub struct PublicPriorityRouter {
    device_manager: Arc<AudioDeviceManager>,
}

impl PublicPriorityRouter {
    pub fn new(device_manager: Arc<AudioDeviceManager>) -> Self {
        Self { device_manager }
    }
}

impl DeviceRouter for PublicPriorityRouter {
    fn name(&self) -> &'static str {
        "public_priority_router"
    }

    fn get_media_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        get_latest_connect_device(&self.device_manager.get_media_render_public_devices())
    }

    fn get_record_capture_device(&self, _source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        get_latest_connect_device(&self.device_manager.get_media_capture_public_devices())
    }
}
