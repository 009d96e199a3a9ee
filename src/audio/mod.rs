// Audio module - device registry and routing policy
//
// - types: descriptors, device enums and bitmask types
// - devices: privacy table, registry, routing state and event monitor
// - routers: routing policies and the router center

pub mod devices;
pub mod routers;
pub mod types;
