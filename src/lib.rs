// Audio policy routing library
//
// Device classification, pairing and stream routing for an audio policy
// server. The device-event layer feeds connect/disconnect reports in, the
// stream-creation path asks the router center which device a stream uses.

pub mod audio;
pub mod config;
pub mod error;
pub mod log;
pub mod policy;
pub mod types;

pub use audio::devices::{
    AudioDeviceManager, AudioDeviceParser, AudioStateManager, DeviceBucket, DeviceChangeEvent,
    DeviceChangeType, DeviceMonitor, DevicePrivacyInfo, PrivacyMap,
};
pub use audio::routers::{AudioRouterCenter, CockpitPhoneRouter, DeviceRouter};
pub use audio::types::{
    AudioDeviceDescriptor, AudioDeviceUsage, AudioScene, ConnectState, DeviceCategory, DeviceRole,
    DeviceRoleFlags, DeviceType, DeviceUsage, PrivacyType, SourceType, StreamUsage,
};
pub use config::{PolicyConfig, RouterProfile};
pub use error::PolicyError;
pub use policy::AudioPolicyCore;
