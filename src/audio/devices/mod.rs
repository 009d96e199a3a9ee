// Audio devices module - Device registry, privacy classification and events
//
// - privacy: privacy table rows and matching rules
// - parser: privacy XML loader feeding the table
// - device_manager: connected devices, purpose buckets, pairing, default slots
// - state_manager: user preferences and cast routing state read by the routers
// - types: device change events
// - monitor: async event loop applying connect/disconnect reports

pub mod device_manager;
pub mod parser;
pub mod privacy;
pub mod state_manager;
pub mod types;

pub mod monitor;

// Re-export main public API
pub use device_manager::{current_time_ms, AudioDeviceManager, DeviceBucket};
pub use parser::{AudioDeviceParser, PrivacyMap};
pub use privacy::{DevicePrivacyInfo, DevicePrivacyTable};
pub use state_manager::{AudioStateManager, CastType, DistributedRoutingInfo};

pub use types::{DeviceChangeEvent, DeviceChangeType};

pub use monitor::{DeviceChangeListener, DeviceMonitor, DeviceMonitorConfig, DeviceMonitorStats};
