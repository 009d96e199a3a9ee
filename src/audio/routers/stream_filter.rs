// Stream filter router
//
// While a distributed cast session is active, streams selected by the cast
// type follow the remote device. The cast target is only used while it is
// still announced as a connected remote device.

use std::sync::Arc;

use tracing::info;

use super::DeviceRouter;
use crate::audio::devices::{AudioDeviceManager, AudioStateManager, CastType};
use crate::audio::types::{AudioDeviceDescriptor, SourceType, StreamUsage};

#[derive(Debug, Clone)]
pub struct StreamFilterRouter {
    device_manager: Arc<AudioDeviceManager>,
    state_manager: Arc<AudioStateManager>,
}

/// Which remote list the cast target must appear in
#[derive(Debug, Clone, Copy)]
enum RemoteSide {
    Render,
    Capture,
}

impl StreamFilterRouter {
    pub fn new(device_manager: Arc<AudioDeviceManager>, state_manager: Arc<AudioStateManager>) -> Self {
        Self {
            device_manager,
            state_manager,
        }
    }

    /// Cast target if `follows` accepts the cast type and the target is still connected
    fn cast_target(&self, side: RemoteSide, follows: impl Fn(CastType) -> bool) -> AudioDeviceDescriptor {
        let routing = self.state_manager.get_distributed_routing_info();
        let Some(target) = routing.descriptor else {
            return AudioDeviceDescriptor::default();
        };
        if !follows(routing.cast_type) {
            return AudioDeviceDescriptor::default();
        }

        let remotes = match side {
            RemoteSide::Render => self.device_manager.get_remote_render_devices(),
            RemoteSide::Capture => self.device_manager.get_remote_capture_devices(),
        };
        if remotes.iter().any(|remote| remote.is_same_device(&target)) {
            info!(
                "Cast {:?} routes to remote {:?} on {}",
                routing.cast_type, target.device_type, target.network_id
            );
            target
        } else {
            AudioDeviceDescriptor::default()
        }
    }
}

impl DeviceRouter for StreamFilterRouter {
    fn name(&self) -> &'static str {
        "stream_filter_router"
    }

    fn get_media_render_device(&self, stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        self.cast_target(RemoteSide::Render, |cast| match cast {
            CastType::All => true,
            CastType::Projection => stream_usage == StreamUsage::Music,
            CastType::Null | CastType::Cooperation => false,
        })
    }

    fn get_call_render_device(&self, _stream_usage: StreamUsage, _client_uid: i32) -> AudioDeviceDescriptor {
        self.cast_target(RemoteSide::Render, |cast| cast == CastType::All)
    }

    fn get_call_capture_device(&self, _source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        self.cast_target(RemoteSide::Capture, |cast| cast == CastType::All)
    }

    fn get_record_capture_device(&self, source_type: SourceType, _client_uid: i32) -> AudioDeviceDescriptor {
        self.cast_target(RemoteSide::Capture, |cast| match cast {
            CastType::All => true,
            CastType::Projection => source_type == SourceType::Mic,
            CastType::Null | CastType::Cooperation => false,
        })
    }
}
