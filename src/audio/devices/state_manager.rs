// User and session routing state
//
// Holds the devices a user explicitly selected per intent, the device the
// active call is rendering to, and the distributed (cast) routing target.
// Routers read it; the policy server writes it.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audio::types::AudioDeviceDescriptor;

/// How a distributed cast shares audio with a remote device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CastType {
    #[default]
    Null,
    /// Every stream follows the remote device
    All,
    /// Only music render and mic capture follow the remote device
    Projection,
    Cooperation,
}

/// Remote device currently targeted by a cast session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributedRoutingInfo {
    pub descriptor: Option<AudioDeviceDescriptor>,
    pub cast_type: CastType,
}

#[derive(Debug, Default)]
struct RoutingState {
    preferred_media_render: Option<AudioDeviceDescriptor>,
    preferred_call_render: Option<AudioDeviceDescriptor>,
    preferred_call_capture: Option<AudioDeviceDescriptor>,
    preferred_ring_render: Option<AudioDeviceDescriptor>,
    preferred_record_capture: Option<AudioDeviceDescriptor>,
    preferred_tone_render: Option<AudioDeviceDescriptor>,
    active_call_render: Option<AudioDeviceDescriptor>,
    distributed_routing: DistributedRoutingInfo,
}

/// Preferred devices and session routing state shared by the routers
#[derive(Debug, Default)]
pub struct AudioStateManager {
    state: RwLock<RoutingState>,
}

macro_rules! preferred_device_accessors {
    ($($field:ident => $set:ident, $get:ident;)*) => {
        $(
            pub fn $set(&self, desc: AudioDeviceDescriptor) {
                info!("Preferred device {}: {:?}", stringify!($field), desc.device_type);
                let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                state.$field = (!desc.is_none()).then_some(desc);
            }

            /// Empty descriptor when nothing is selected
            pub fn $get(&self) -> AudioDeviceDescriptor {
                let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
                state.$field.clone().unwrap_or_default()
            }
        )*
    };
}

impl AudioStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    preferred_device_accessors! {
        preferred_media_render => set_preferred_media_render_device, get_preferred_media_render_device;
        preferred_call_render => set_preferred_call_render_device, get_preferred_call_render_device;
        preferred_call_capture => set_preferred_call_capture_device, get_preferred_call_capture_device;
        preferred_ring_render => set_preferred_ring_render_device, get_preferred_ring_render_device;
        preferred_record_capture => set_preferred_record_capture_device, get_preferred_record_capture_device;
        preferred_tone_render => set_preferred_tone_render_device, get_preferred_tone_render_device;
    }

    /// Record the device the running call renders to. The empty descriptor clears it.
    pub fn set_active_call_render_device(&self, desc: AudioDeviceDescriptor) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.active_call_render = (!desc.is_none()).then_some(desc);
    }

    pub fn get_active_call_render_device(&self) -> Option<AudioDeviceDescriptor> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.active_call_render.clone()
    }

    pub fn set_distributed_routing_info(&self, info: DistributedRoutingInfo) {
        info!(
            "Distributed routing target {:?} cast={:?}",
            info.descriptor.as_ref().map(|d| d.device_type),
            info.cast_type
        );
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.distributed_routing = info;
    }

    pub fn get_distributed_routing_info(&self) -> DistributedRoutingInfo {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.distributed_routing.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::{DeviceRole, DeviceType};

    #[test]
    fn test_preferences_default_to_empty_descriptor() {
        let state = AudioStateManager::new();
        assert!(state.get_preferred_media_render_device().is_none());
        assert!(state.get_active_call_render_device().is_none());
        assert_eq!(state.get_distributed_routing_info().cast_type, CastType::Null);
    }

    #[test]
    fn test_setting_empty_descriptor_clears_preference() {
        let state = AudioStateManager::new();
        state.set_preferred_call_render_device(AudioDeviceDescriptor::new(
            DeviceType::WiredHeadset,
            DeviceRole::Output,
        ));
        assert_eq!(
            state.get_preferred_call_render_device().device_type,
            DeviceType::WiredHeadset
        );

        state.set_preferred_call_render_device(AudioDeviceDescriptor::default());
        assert!(state.get_preferred_call_render_device().is_none());
    }
}
