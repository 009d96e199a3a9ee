use std::sync::Arc;

use super::DeviceRouter;
use crate::audio::devices::{AudioDeviceManager, AudioStateManager};
use crate::audio::types::{AudioDeviceDescriptor, ConnectState, SourceType};

/// Captures a call from the microphone half of the accessory the call renders to
#[derive(Debug, Clone)]
pub struct PairDeviceRouter {
    device_manager: Arc<AudioDeviceManager>,
    state_manager: Arc<AudioStateManager>,
}

impl PairDeviceRouter {
    pub fn new(device_manager: Arc<AudioDeviceManager>, state_manager: Arc<AudioStateManager>) -> Self {
        Self {
            device_manager,
            state_manager,
        }
    }
}

impl DeviceRouter for PairDeviceRouter {
    fn name(&self) -> &'static str {
        "pair_device_router"
    }

    fn get_call_capture_device(&self, _source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        let Some(active) = self.state_manager.get_active_call_render_device() else {
            return AudioDeviceDescriptor::default();
        };
        let Some(pair) = self.device_manager.get_paired_device(&active) else {
            return AudioDeviceDescriptor::default();
        };
        if pair.connect_state == ConnectState::VirtualConnected || !pair.is_enable {
            return AudioDeviceDescriptor::default();
        }

        let usable = self
            .device_manager
            .get_comm_capture_privacy_devices()
            .into_iter()
            .chain(self.device_manager.get_comm_capture_public_devices())
            .any(|desc| desc.is_same_device(&pair));
        if usable {
            crate::device_debug!(
                "Call capture follows paired {:?} '{}'",
                pair.device_type,
                pair.mac_address
            );
            pair
        } else {
            AudioDeviceDescriptor::default()
        }
    }
}
