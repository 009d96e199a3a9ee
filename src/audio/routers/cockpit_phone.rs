// Cockpit phone router
//
// In a vehicle the phone call belongs on the car's hands-free kit. This
// router only answers call intents, and only with public communication
// devices of the configured accessory category.

use std::sync::Arc;

use colored::Colorize;
use tracing::info;

use super::{get_latest_connect_device, DeviceRouter};
use crate::audio::devices::AudioDeviceManager;
use crate::audio::types::{
    AudioDeviceDescriptor, DeviceCategory, SourceType, StreamUsage,
};

#[derive(Debug, Clone)]
pub struct CockpitPhoneRouter {
    device_manager: Arc<AudioDeviceManager>,
    category: DeviceCategory,
}

impl CockpitPhoneRouter {
    /// Router filtering on car Bluetooth kits
    pub fn new(device_manager: Arc<AudioDeviceManager>) -> Self {
        Self::with_category(device_manager, DeviceCategory::BT_CAR)
    }

    pub fn with_category(device_manager: Arc<AudioDeviceManager>, category: DeviceCategory) -> Self {
        Self {
            device_manager,
            category,
        }
    }

    pub fn category(&self) -> DeviceCategory {
        self.category
    }

    fn filter_by_category(&self, descs: Vec<AudioDeviceDescriptor>) -> Vec<AudioDeviceDescriptor> {
        descs
            .into_iter()
            .filter(|desc| desc.device_category.intersects(self.category))
            .collect()
    }
}

impl DeviceRouter for CockpitPhoneRouter {
    fn name(&self) -> &'static str {
        "cockpit_phone_router"
    }

    fn get_call_render_device(&self, stream_usage: StreamUsage, client_uid: i32) -> AudioDeviceDescriptor {
        let candidates = self.filter_by_category(self.device_manager.get_comm_render_public_devices());
        let desc = get_latest_connect_device(&candidates);
        if !desc.is_none() {
            info!(
                "{} {:?} client {} -> {:?} '{}' (of {})",
                "COCKPIT_CALL_RENDER".bright_blue(),
                stream_usage,
                client_uid,
                desc.device_type,
                desc.mac_address,
                candidates.len()
            );
        }
        desc
    }

    fn get_call_capture_device(&self, source_type: SourceType, client_uid: i32) -> AudioDeviceDescriptor {
        let candidates = self.filter_by_category(self.device_manager.get_comm_capture_public_devices());
        let desc = get_latest_connect_device(&candidates);
        if !desc.is_none() {
            info!(
                "{} {:?} client {} -> {:?} '{}' (of {})",
                "COCKPIT_CALL_CAPTURE".bright_blue(),
                source_type,
                client_uid,
                desc.device_type,
                desc.mac_address,
                candidates.len()
            );
        }
        desc
    }
}
