use std::sync::Arc;

use tracing::info;

use super::{find_selected_device, DeviceRouter};
use crate::audio::devices::{AudioDeviceManager, AudioStateManager};
use crate::audio::types::{AudioDeviceDescriptor, AudioDeviceUsage, SourceType, StreamUsage};

/// Honours an explicit user selection while the selected device is still available
#[derive(Debug, Clone)]
pub struct UserSelectRouter {
    device_manager: Arc<AudioDeviceManager>,
    state_manager: Arc<AudioStateManager>,
}

impl UserSelectRouter {
    pub fn new(device_manager: Arc<AudioDeviceManager>, state_manager: Arc<AudioStateManager>) -> Self {
        Self {
            device_manager,
            state_manager,
        }
    }

    fn resolve(
        &self,
        intent: &str,
        preferred: AudioDeviceDescriptor,
        candidates: &[AudioDeviceDescriptor],
    ) -> AudioDeviceDescriptor {
        if preferred.is_none() {
            crate::device_debug!("No preferred {} device", intent);
            return preferred;
        }
        let desc = find_selected_device(&preferred, candidates);
        if desc.is_none() {
            info!(
                "Preferred {} device {:?} '{}' is no longer available",
                intent, preferred.device_type, preferred.mac_address
            );
        }
        desc
    }
}

impl DeviceRouter for UserSelectRouter {
    fn name(&self) -> &'static str {
        "user_select_router"
    }

    fn get_media_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        let mut candidates = self.device_manager.get_media_render_public_devices();
        candidates.push(self.device_manager.get_render_default_device());
        candidates.extend(self.device_manager.get_media_render_privacy_devices());
        self.resolve(
            "media render",
            self.state_manager.get_preferred_media_render_device(),
            &candidates,
        )
    }

    fn get_call_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        let candidates = self
            .device_manager
            .get_available_devices_by_usage(AudioDeviceUsage::CALL_OUTPUT_DEVICES);
        self.resolve(
            "call render",
            self.state_manager.get_preferred_call_render_device(),
            &candidates,
        )
    }

    fn get_call_capture_device(&self, _source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        let candidates = self
            .device_manager
            .get_available_devices_by_usage(AudioDeviceUsage::CALL_INPUT_DEVICES);
        self.resolve(
            "call capture",
            self.state_manager.get_preferred_call_capture_device(),
            &candidates,
        )
    }

    fn get_record_capture_device(&self, _source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        let candidates = self
            .device_manager
            .get_available_devices_by_usage(AudioDeviceUsage::MEDIA_INPUT_DEVICES);
        self.resolve(
            "record capture",
            self.state_manager.get_preferred_record_capture_device(),
            &candidates,
        )
    }
}
