// Device privacy table
//
// Rows are loaded once from the policy configuration and split into a
// private and a public list. Classification in the device manager asks one
// list at a time whether a descriptor qualifies for a role/usage pair.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::audio::types::{
    AudioDeviceDescriptor, DeviceCategory, DeviceRole, DeviceRoleFlags, DeviceType, DeviceUsage,
    PrivacyType,
};

/// One row of the privacy table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePrivacyInfo {
    pub device_name: String,
    pub device_type: DeviceType,
    pub device_role: DeviceRoleFlags,
    pub device_usage: DeviceUsage,
    pub device_category: DeviceCategory,
}

impl DevicePrivacyInfo {
    pub fn new(
        device_type: DeviceType,
        device_role: DeviceRoleFlags,
        device_usage: DeviceUsage,
        device_category: DeviceCategory,
    ) -> Self {
        Self {
            device_name: String::new(),
            device_type,
            device_role,
            device_usage,
            device_category,
        }
    }

    /// Exact category match, or any shared category bit
    fn category_matches(&self, category: DeviceCategory) -> bool {
        self.device_category == category || self.device_category.intersects(category)
    }

    /// Whether `desc` qualifies for a bucket of `role` and `usage` through this row
    pub fn matches(&self, desc: &AudioDeviceDescriptor, role: DeviceRole, usage: DeviceUsage) -> bool {
        self.device_type == desc.device_type
            && desc.device_role == role
            && self.device_role.intersects(role.as_flags())
            && self.device_usage.intersects(usage)
            && self.category_matches(desc.device_category)
    }
}

/// Private and public rows, immutable between loads
#[derive(Debug, Clone, Default)]
pub struct DevicePrivacyTable {
    privacy_devices: Vec<DevicePrivacyInfo>,
    public_devices: Vec<DevicePrivacyInfo>,
}

impl DevicePrivacyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a parsed map into the two lists. Missing privacy types become empty lists.
    pub fn from_map(map: &HashMap<PrivacyType, Vec<DevicePrivacyInfo>>) -> Self {
        Self {
            privacy_devices: map.get(&PrivacyType::Privacy).cloned().unwrap_or_default(),
            public_devices: map.get(&PrivacyType::Public).cloned().unwrap_or_default(),
        }
    }

    pub fn to_map(&self) -> HashMap<PrivacyType, Vec<DevicePrivacyInfo>> {
        HashMap::from([
            (PrivacyType::Privacy, self.privacy_devices.clone()),
            (PrivacyType::Public, self.public_devices.clone()),
        ])
    }

    pub fn devices(&self, privacy_type: PrivacyType) -> &[DevicePrivacyInfo] {
        match privacy_type {
            PrivacyType::Privacy => &self.privacy_devices,
            PrivacyType::Public => &self.public_devices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.privacy_devices.is_empty() && self.public_devices.is_empty()
    }

    /// Whether any row of the `privacy_type` list admits `desc` for `role` and `usage`
    pub fn device_attr_match(
        &self,
        desc: &AudioDeviceDescriptor,
        privacy_type: PrivacyType,
        role: DeviceRole,
        usage: DeviceUsage,
    ) -> bool {
        self.devices(privacy_type)
            .iter()
            .any(|info| info.matches(desc, role, usage))
    }

    /// Whether either list approves `device_type` for any bit of `usage`
    pub fn type_supports_usage(&self, device_type: DeviceType, usage: DeviceUsage) -> bool {
        self.all_rows()
            .any(|info| info.device_type == device_type && info.device_usage.intersects(usage))
    }

    /// Union of usages of every row for `device_type`
    pub fn usage_for_type(&self, device_type: DeviceType) -> DeviceUsage {
        self.all_rows()
            .filter(|info| info.device_type == device_type)
            .fold(DeviceUsage::empty(), |acc, info| acc | info.device_usage)
    }

    fn all_rows(&self) -> impl Iterator<Item = &DevicePrivacyInfo> {
        self.privacy_devices.iter().chain(self.public_devices.iter())
    }
}
