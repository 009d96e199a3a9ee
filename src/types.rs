// Crate-wide constants shared by the device manager and the routers

/// Network id carried by every device attached to this host
pub const LOCAL_NETWORK_ID: &str = "LocalDevice";

/// Device id reported by a descriptor that was never assigned one
pub const INVALID_DEVICE_ID: i32 = 0;

/// Client uid used when a fetch is not made on behalf of an application
pub const SYSTEM_CLIENT_UID: i32 = 1000;

/// Default capacity of the device event channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;
