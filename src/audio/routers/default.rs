use std::sync::Arc;

use super::DeviceRouter;
use crate::audio::devices::AudioDeviceManager;
use crate::audio::types::{AudioDeviceDescriptor, SourceType, StreamUsage};

/// Last router of every chain: the built-in default slots
#[derive(Debug, Clone)]
pub struct DefaultRouter {
    device_manager: Arc<AudioDeviceManager>,
}

impl DefaultRouter {
    pub fn new(device_manager: Arc<AudioDeviceManager>) -> Self {
        Self { device_manager }
    }
}

impl DeviceRouter for DefaultRouter {
    fn name(&self) -> &'static str {
        "default_router"
    }

    fn get_media_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        self.device_manager.get_render_default_device()
    }

    fn get_call_render_device(&self, stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        self.device_manager.get_comm_render_default_device(stream_usage)
    }

    fn get_call_capture_device(&self, _source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        self.device_manager.get_capture_default_device()
    }

    fn get_ring_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        self.device_manager.get_render_default_device()
    }

    fn get_record_capture_device(&self, _source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        self.device_manager.get_capture_default_device()
    }

    fn get_tone_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        self.device_manager.get_render_default_device()
    }
}
