// Router center - ordered router chains per stream intent
//
// Stream usages and source types are mapped to an intent, every intent has a
// chain of routers, and the first router returning a real device wins.
// During a call scene, media-like render streams follow the call chain so
// that a notification never jumps off the headset the call is using.

use std::sync::Arc;

use colored::Colorize;
use tracing::info;

use super::{
    CockpitPhoneRouter, DefaultRouter, DeviceRouter, PairDeviceRouter, PrivacyPriorityRouter,
    PublicPriorityRouter, StreamFilterRouter, UserSelectRouter,
};
use crate::audio::devices::{AudioDeviceManager, AudioStateManager};
use crate::audio::types::{AudioDeviceDescriptor, AudioScene, DeviceCategory, SourceType, StreamUsage};
use crate::config::RouterProfile;

/// Render intent of a stream usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderIntent {
    Media,
    Call,
    Ring,
    Tone,
}

impl RenderIntent {
    pub fn from_stream_usage(stream_usage: StreamUsage) -> Self {
        use StreamUsage::*;
        match stream_usage {
            Unknown | Music | Movie | Game | Audiobook | Navigation | Ultrasonic => Self::Media,
            VoiceCommunication | VoiceAssistant | VoiceMessage | VoiceModemCommunication => Self::Call,
            Alarm | Ringtone | Ranging => Self::Ring,
            NotificationRingtone | Notification | Accessibility | System | Dtmf | EnforcedTone => {
                Self::Tone
            }
        }
    }
}

/// Capture intent of a source type; invalid sources have none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureIntent {
    Record,
    Call,
}

impl CaptureIntent {
    pub fn from_source_type(source_type: SourceType) -> Option<Self> {
        use SourceType::*;
        match source_type {
            Mic | VoiceRecognition | PlaybackCapture | Wakeup | Ultrasonic => Some(Self::Record),
            VoiceCommunication | VirtualCapture => Some(Self::Call),
            Invalid => None,
        }
    }
}

/// Router chains owned by the center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouterChain {
    MediaRender,
    CallRender,
    CallCapture,
    RecordCapture,
}

pub struct AudioRouterCenter {
    device_manager: Arc<AudioDeviceManager>,
    state_manager: Arc<AudioStateManager>,
    media_render_routers: Vec<Box<dyn DeviceRouter>>,
    call_render_routers: Vec<Box<dyn DeviceRouter>>,
    call_capture_routers: Vec<Box<dyn DeviceRouter>>,
    record_capture_routers: Vec<Box<dyn DeviceRouter>>,
}

impl std::fmt::Debug for AudioRouterCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioRouterCenter")
            .field("media_render", &self.router_names(RouterChain::MediaRender))
            .field("call_render", &self.router_names(RouterChain::CallRender))
            .field("call_capture", &self.router_names(RouterChain::CallCapture))
            .field("record_capture", &self.router_names(RouterChain::RecordCapture))
            .finish()
    }
}

impl AudioRouterCenter {
    /// Build the chains for a product profile
    pub fn new(
        device_manager: Arc<AudioDeviceManager>,
        state_manager: Arc<AudioStateManager>,
        profile: RouterProfile,
        cockpit_category: DeviceCategory,
    ) -> Self {
        let dm = &device_manager;
        let sm = &state_manager;

        let media_render_routers: Vec<Box<dyn DeviceRouter>> = vec![
            Box::new(UserSelectRouter::new(dm.clone(), sm.clone())),
            Box::new(PrivacyPriorityRouter::new(dm.clone())),
            Box::new(PublicPriorityRouter::new(dm.clone())),
            Box::new(StreamFilterRouter::new(dm.clone(), sm.clone())),
            Box::new(DefaultRouter::new(dm.clone())),
        ];

        let record_capture_routers: Vec<Box<dyn DeviceRouter>> = vec![
            Box::new(UserSelectRouter::new(dm.clone(), sm.clone())),
            Box::new(PrivacyPriorityRouter::new(dm.clone())),
            Box::new(PublicPriorityRouter::new(dm.clone())),
            Box::new(StreamFilterRouter::new(dm.clone(), sm.clone())),
            Box::new(DefaultRouter::new(dm.clone())),
        ];

        let mut call_render_routers: Vec<Box<dyn DeviceRouter>> = vec![
            Box::new(UserSelectRouter::new(dm.clone(), sm.clone())),
            Box::new(PrivacyPriorityRouter::new(dm.clone())),
        ];
        let mut call_capture_routers: Vec<Box<dyn DeviceRouter>> = vec![
            Box::new(UserSelectRouter::new(dm.clone(), sm.clone())),
            Box::new(PairDeviceRouter::new(dm.clone(), sm.clone())),
            Box::new(PrivacyPriorityRouter::new(dm.clone())),
        ];
        if profile == RouterProfile::Cockpit {
            call_render_routers.push(Box::new(CockpitPhoneRouter::with_category(
                dm.clone(),
                cockpit_category,
            )));
            call_capture_routers.push(Box::new(CockpitPhoneRouter::with_category(
                dm.clone(),
                cockpit_category,
            )));
        }
        call_render_routers.push(Box::new(DefaultRouter::new(dm.clone())));
        call_capture_routers.push(Box::new(DefaultRouter::new(dm.clone())));

        info!(
            "{} Router chains built for {:?} profile",
            "ROUTER_CENTER".bright_cyan(),
            profile
        );

        Self {
            device_manager,
            state_manager,
            media_render_routers,
            call_render_routers,
            call_capture_routers,
            record_capture_routers,
        }
    }

    /// Router names of one chain, in priority order
    pub fn router_names(&self, chain: RouterChain) -> Vec<&'static str> {
        let routers = match chain {
            RouterChain::MediaRender => &self.media_render_routers,
            RouterChain::CallRender => &self.call_render_routers,
            RouterChain::CallCapture => &self.call_capture_routers,
            RouterChain::RecordCapture => &self.record_capture_routers,
        };
        routers.iter().map(|router| router.name()).collect()
    }

    fn first_match(
        routers: &[Box<dyn DeviceRouter>],
        tag: &str,
        fetch: impl Fn(&dyn DeviceRouter) -> AudioDeviceDescriptor,
    ) -> AudioDeviceDescriptor {
        for router in routers {
            let desc = fetch(router.as_ref());
            if !desc.is_none() {
                info!(
                    "{} {} picked {:?} '{}'",
                    tag.bright_green(),
                    router.name(),
                    desc.device_type,
                    desc.mac_address
                );
                return desc;
            }
        }
        AudioDeviceDescriptor::default()
    }

    pub fn fetch_media_render_device(&self, stream_usage: StreamUsage, client_uid: i32) -> AudioDeviceDescriptor {
        Self::first_match(&self.media_render_routers, "MEDIA_RENDER", |router| {
            router.get_media_render_device(stream_usage, client_uid)
        })
    }

    /// Call render device; a hit also becomes the active call render device
    pub fn fetch_call_render_device(&self, stream_usage: StreamUsage, client_uid: i32) -> AudioDeviceDescriptor {
        let desc = Self::first_match(&self.call_render_routers, "CALL_RENDER", |router| {
            router.get_call_render_device(stream_usage, client_uid)
        });
        if !desc.is_none() {
            self.state_manager.set_active_call_render_device(desc.clone());
        }
        desc
    }

    pub fn fetch_call_capture_device(&self, source_type: SourceType, client_uid: i32) -> AudioDeviceDescriptor {
        Self::first_match(&self.call_capture_routers, "CALL_CAPTURE", |router| {
            router.get_call_capture_device(source_type, client_uid)
        })
    }

    pub fn fetch_record_capture_device(&self, source_type: SourceType, client_uid: i32) -> AudioDeviceDescriptor {
        Self::first_match(&self.record_capture_routers, "RECORD_CAPTURE", |router| {
            router.get_record_capture_device(source_type, client_uid)
        })
    }

    fn is_call_scene(&self, audio_scene: AudioScene) -> bool {
        match audio_scene {
            AudioScene::PhoneCall | AudioScene::PhoneChat => true,
            AudioScene::Ringing => self.device_manager.has_sco_device(),
            AudioScene::Default => false,
        }
    }

    /// Output device for a render stream in the current scene, or the empty descriptor
    pub fn fetch_output_device(
        &self,
        stream_usage: StreamUsage,
        client_uid: i32,
        audio_scene: AudioScene,
    ) -> AudioDeviceDescriptor {
        info!("{:?} client {} start fetch output device", stream_usage, client_uid);

        let desc = match RenderIntent::from_stream_usage(stream_usage) {
            RenderIntent::Media | RenderIntent::Ring | RenderIntent::Tone => {
                if self.is_call_scene(audio_scene) {
                    let call_usage = if audio_scene == AudioScene::PhoneCall {
                        StreamUsage::VoiceModemCommunication
                    } else {
                        StreamUsage::VoiceCommunication
                    };
                    self.fetch_call_render_device(call_usage, client_uid)
                } else {
                    self.fetch_media_render_device(stream_usage, client_uid)
                }
            }
            RenderIntent::Call => self.fetch_call_render_device(stream_usage, client_uid),
        };

        if desc.is_none() {
            info!("{:?} client {} fetch no device", stream_usage, client_uid);
        }
        desc
    }

    /// Input device for a capture stream, or the empty descriptor
    pub fn fetch_input_device(&self, source_type: SourceType, client_uid: i32) -> AudioDeviceDescriptor {
        info!("{:?} client {} start fetch input device", source_type, client_uid);

        let desc = match CaptureIntent::from_source_type(source_type) {
            Some(CaptureIntent::Record) => self.fetch_record_capture_device(source_type, client_uid),
            Some(CaptureIntent::Call) => self.fetch_call_capture_device(source_type, client_uid),
            None => AudioDeviceDescriptor::default(),
        };

        if desc.is_none() {
            info!("{:?} client {} fetch no device", source_type, client_uid);
        }
        desc
    }
}
