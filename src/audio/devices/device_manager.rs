// Connected device registry and purpose buckets
//
// This module owns the single canonical list of connected descriptors and
// the twelve purpose-specific buckets derived from it. Descriptors live in
// one arena keyed by `DeviceHandle`; the connected list, every bucket and
// the pairing links only hold handles, so an in-place update is visible
// everywhere and removal is one sweep over handle lists.
//
// Classification is push based: it runs when a device is added (or its
// attributes change) and the bucket getters just copy out the result.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use colored::Colorize;
use tracing::{error, info, warn};

use super::parser::{AudioDeviceParser, PrivacyMap};
use super::privacy::DevicePrivacyTable;
use crate::audio::types::{
    AudioDeviceDescriptor, AudioDeviceUsage, ConnectState, DeviceCategory, DeviceRole, DeviceType,
    DeviceUsage, PrivacyType, StreamUsage,
};

/// Monotonic milliseconds since the first call, never zero
pub fn current_time_ms() -> i64 {
    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    start.elapsed().as_millis() as i64 + 1
}

/// Stable arena key of a connected descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceHandle(u64);

/// Purpose-specific device collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceBucket {
    RemoteRender,
    RemoteCapture,
    CommRenderPrivacy,
    CommRenderPublic,
    CommCapturePrivacy,
    CommCapturePublic,
    MediaRenderPrivacy,
    MediaRenderPublic,
    MediaCapturePrivacy,
    MediaCapturePublic,
    CapturePrivacy,
    CapturePublic,
}

impl DeviceBucket {
    pub const ALL: [DeviceBucket; 12] = [
        Self::RemoteRender,
        Self::RemoteCapture,
        Self::CommRenderPrivacy,
        Self::CommRenderPublic,
        Self::CommCapturePrivacy,
        Self::CommCapturePublic,
        Self::MediaRenderPrivacy,
        Self::MediaRenderPublic,
        Self::MediaCapturePrivacy,
        Self::MediaCapturePublic,
        Self::CapturePrivacy,
        Self::CapturePublic,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn log_name(self) -> &'static str {
        match self {
            Self::RemoteRender => "remote render device",
            Self::RemoteCapture => "remote capture device",
            Self::CommRenderPrivacy => "communication render privacy device",
            Self::CommRenderPublic => "communication render public device",
            Self::CommCapturePrivacy => "communication capture privacy device",
            Self::CommCapturePublic => "communication capture public device",
            Self::MediaRenderPrivacy => "media render privacy device",
            Self::MediaRenderPublic => "media render public device",
            Self::MediaCapturePrivacy => "media capture privacy device",
            Self::MediaCapturePublic => "media capture public device",
            Self::CapturePrivacy => "capture privacy device",
            Self::CapturePublic => "capture public device",
        }
    }

    /// Privacy list, device role and usage a local device must match to join.
    /// Remote buckets are not privacy classified.
    fn privacy_rule(self) -> Option<(PrivacyType, DeviceRole, DeviceUsage)> {
        use DeviceRole::{Input, Output};
        use PrivacyType::{Privacy, Public};
        match self {
            Self::RemoteRender | Self::RemoteCapture => None,
            Self::CommRenderPrivacy => Some((Privacy, Output, DeviceUsage::VOICE)),
            Self::CommRenderPublic => Some((Public, Output, DeviceUsage::VOICE)),
            Self::CommCapturePrivacy => Some((Privacy, Input, DeviceUsage::VOICE)),
            Self::CommCapturePublic => Some((Public, Input, DeviceUsage::VOICE)),
            Self::MediaRenderPrivacy => Some((Privacy, Output, DeviceUsage::MEDIA)),
            Self::MediaRenderPublic => Some((Public, Output, DeviceUsage::MEDIA)),
            Self::MediaCapturePrivacy => Some((Privacy, Input, DeviceUsage::MEDIA)),
            Self::MediaCapturePublic => Some((Public, Input, DeviceUsage::MEDIA)),
            Self::CapturePrivacy => Some((Privacy, Input, DeviceUsage::ALL_USAGE)),
            Self::CapturePublic => Some((Public, Input, DeviceUsage::ALL_USAGE)),
        }
    }
}

#[derive(Debug)]
struct DeviceEntry {
    descriptor: AudioDeviceDescriptor,
    paired: Option<DeviceHandle>,
}

#[derive(Debug, Default)]
struct DeviceRegistry {
    next_handle: u64,
    entries: HashMap<DeviceHandle, DeviceEntry>,
    /// Most recently added first
    connected: Vec<DeviceHandle>,
    /// Each bucket keeps the relative order of `connected`
    buckets: [Vec<DeviceHandle>; 12],
    earpiece: Option<AudioDeviceDescriptor>,
    speaker: Option<AudioDeviceDescriptor>,
    default_mic: Option<AudioDeviceDescriptor>,
    privacy_table: DevicePrivacyTable,
}

impl DeviceRegistry {
    fn descriptor(&self, handle: DeviceHandle) -> Option<&AudioDeviceDescriptor> {
        self.entries.get(&handle).map(|entry| &entry.descriptor)
    }

    fn find_existing(&self, desc: &AudioDeviceDescriptor) -> Option<DeviceHandle> {
        self.connected.iter().copied().find(|handle| {
            self.descriptor(*handle)
                .is_some_and(|existing| existing.is_same_device(desc))
        })
    }

    fn add_new_device(&mut self, mut desc: AudioDeviceDescriptor) {
        if let Some(handle) = self.find_existing(&desc) {
            if self.update_exist_device(handle, &desc) {
                return;
            }
        }

        if desc.connect_time_stamp == 0 {
            desc.connect_time_stamp = current_time_ms();
        }

        let handle = DeviceHandle(self.next_handle);
        self.next_handle += 1;

        info!(
            "{} {:?} role={:?} network={} mac='{}' category={:?}",
            "DEVICE_ADD".bright_green(),
            desc.device_type,
            desc.device_role,
            desc.network_id,
            desc.mac_address,
            desc.device_category
        );

        self.entries.insert(
            handle,
            DeviceEntry {
                descriptor: desc,
                paired: None,
            },
        );
        self.make_paired_device_descriptor(handle);
        self.connected.insert(0, handle);

        self.update_default_devices(handle);
        self.classify(handle);
    }

    /// Returns true when the report was absorbed by an existing entry.
    /// A Bluetooth category change removes the entry so the caller re-adds it.
    fn update_exist_device(&mut self, handle: DeviceHandle, desc: &AudioDeviceDescriptor) -> bool {
        let Some(existing) = self.descriptor(handle) else {
            return false;
        };

        if existing.device_type.is_bluetooth() && existing.device_category != desc.device_category {
            info!(
                "{} {:?} '{}' category {:?} -> {:?}, re-adding",
                "DEVICE_RECATEGORIZE".bright_yellow(),
                existing.device_type,
                existing.mac_address,
                existing.device_category,
                desc.device_category
            );
            self.remove_handle(handle);
            return false;
        }

        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.descriptor.update_from(desc);
        }
        crate::device_debug!(
            "Device {:?} already connected, updated in place",
            desc.device_type
        );

        self.refresh_default_slots(handle);
        self.classify(handle);
        true
    }

    /// Link `handle` with the most recent unpaired opposite-role half of the same accessory
    fn make_paired_device_descriptor(&mut self, handle: DeviceHandle) {
        let Some(desc) = self.descriptor(handle) else {
            return;
        };

        let partner = self.connected.iter().copied().find(|candidate| {
            self.entries.get(candidate).is_some_and(|entry| {
                entry.paired.is_none() && entry.descriptor.pairs_with(desc)
            })
        });

        if let Some(partner) = partner {
            if let Some(entry) = self.entries.get_mut(&partner) {
                entry.paired = Some(handle);
            }
            if let Some(entry) = self.entries.get_mut(&handle) {
                entry.paired = Some(partner);
            }
            crate::device_debug!("Paired device {:?} with {:?}", handle, partner);
        }
    }

    /// Default slots are overwritten on every local connect of a matching type
    fn update_default_devices(&mut self, handle: DeviceHandle) {
        let Some(desc) = self.descriptor(handle).cloned() else {
            return;
        };
        if desc.is_remote() {
            return;
        }
        let slot = match desc.device_type {
            DeviceType::Earpiece => &mut self.earpiece,
            DeviceType::Speaker => &mut self.speaker,
            DeviceType::Mic => &mut self.default_mic,
            _ => return,
        };
        *slot = Some(desc);
    }

    fn refresh_default_slots(&mut self, handle: DeviceHandle) {
        let Some(desc) = self.entries.get(&handle).map(|e| e.descriptor.clone()) else {
            return;
        };
        for slot in [&mut self.earpiece, &mut self.speaker, &mut self.default_mic] {
            if slot.as_ref().is_some_and(|current| current.is_same_device(&desc)) {
                *slot = Some(desc.clone());
            }
        }
    }

    /// Bucket memberships a descriptor qualifies for
    fn bucket_membership(&self, desc: &AudioDeviceDescriptor) -> HashSet<DeviceBucket> {
        let mut buckets = HashSet::new();

        if desc.is_remote() {
            match desc.device_role {
                DeviceRole::Output => {
                    buckets.insert(DeviceBucket::RemoteRender);
                }
                DeviceRole::Input => {
                    buckets.insert(DeviceBucket::RemoteCapture);
                }
                DeviceRole::None => {}
            }
            return buckets;
        }

        // SCO whose category is still unresolved stays routable for calls
        if desc.device_type == DeviceType::BluetoothSco
            && desc.device_category == DeviceCategory::CATEGORY_DEFAULT
            && desc.connect_state != ConnectState::VirtualConnected
            && desc.is_enable
        {
            match desc.device_role {
                DeviceRole::Input => {
                    buckets.insert(DeviceBucket::CommCapturePrivacy);
                }
                DeviceRole::Output => {
                    buckets.insert(DeviceBucket::CommRenderPrivacy);
                }
                DeviceRole::None => {}
            }
        }

        for bucket in DeviceBucket::ALL {
            if let Some((privacy_type, role, usage)) = bucket.privacy_rule() {
                if self
                    .privacy_table
                    .device_attr_match(desc, privacy_type, role, usage)
                {
                    buckets.insert(bucket);
                }
            }
        }
        buckets
    }

    /// Bring the bucket memberships of `handle` in line with its current attributes
    fn classify(&mut self, handle: DeviceHandle) {
        let Some(desc) = self.descriptor(handle) else {
            return;
        };
        let desired = self.bucket_membership(desc);

        for bucket in DeviceBucket::ALL {
            let present = self.buckets[bucket.index()].contains(&handle);
            let wanted = desired.contains(&bucket);
            if wanted && !present {
                self.insert_in_connected_order(bucket, handle);
                info!("Add to {} list.", bucket.log_name());
            } else if !wanted && present {
                self.buckets[bucket.index()].retain(|h| *h != handle);
                info!("Remove from {} list.", bucket.log_name());
            }
        }
    }

    fn insert_in_connected_order(&mut self, bucket: DeviceBucket, handle: DeviceHandle) {
        let position_of = |h: &DeviceHandle| self.connected.iter().position(|c| c == h);
        let Some(target) = position_of(&handle) else {
            return;
        };
        let list = &self.buckets[bucket.index()];
        let at = list
            .iter()
            .position(|h| position_of(h).map_or(true, |p| p > target))
            .unwrap_or(list.len());
        self.buckets[bucket.index()].insert(at, handle);
    }

    fn remove_new_device(&mut self, desc: &AudioDeviceDescriptor) {
        let matching: Vec<DeviceHandle> = self
            .connected
            .iter()
            .copied()
            .filter(|handle| {
                self.descriptor(*handle)
                    .is_some_and(|existing| existing.matches_for_removal(desc))
            })
            .collect();

        if matching.is_empty() {
            warn!(
                "{} No connected {:?} on network {} (mac '{}')",
                "DEVICE_REMOVE_MISS".bright_yellow(),
                desc.device_type,
                desc.network_id,
                desc.mac_address
            );
            return;
        }

        for handle in matching {
            self.remove_handle(handle);
        }
    }

    /// Drop one entry from the arena, the connected list, every bucket and its pair
    fn remove_handle(&mut self, handle: DeviceHandle) {
        let Some(entry) = self.entries.remove(&handle) else {
            return;
        };

        if let Some(partner) = entry.paired {
            if let Some(partner_entry) = self.entries.get_mut(&partner) {
                partner_entry.paired = None;
            }
        }

        self.connected.retain(|h| *h != handle);
        for bucket in DeviceBucket::ALL {
            let list = &mut self.buckets[bucket.index()];
            let before = list.len();
            list.retain(|h| *h != handle);
            if list.len() != before {
                info!("Remove from {} list.", bucket.log_name());
            }
        }

        info!(
            "{} {:?} role={:?} network={} mac='{}'",
            "DEVICE_REMOVE".bright_red(),
            entry.descriptor.device_type,
            entry.descriptor.device_role,
            entry.descriptor.network_id,
            entry.descriptor.mac_address
        );
    }

    fn copy_bucket(&self, bucket: DeviceBucket) -> Vec<AudioDeviceDescriptor> {
        self.buckets[bucket.index()]
            .iter()
            .filter_map(|handle| self.descriptor(*handle).cloned())
            .collect()
    }

    fn connected_descriptors(&self) -> impl Iterator<Item = &AudioDeviceDescriptor> {
        self.connected
            .iter()
            .filter_map(|handle| self.descriptor(*handle))
    }
}

/// Usage bit, device role and approved usage checked by availability queries
const USAGE_RULES: [(AudioDeviceUsage, DeviceRole, DeviceUsage); 4] = [
    (AudioDeviceUsage::MEDIA_OUTPUT_DEVICES, DeviceRole::Output, DeviceUsage::MEDIA),
    (AudioDeviceUsage::MEDIA_INPUT_DEVICES, DeviceRole::Input, DeviceUsage::MEDIA),
    (AudioDeviceUsage::CALL_OUTPUT_DEVICES, DeviceRole::Output, DeviceUsage::VOICE),
    (AudioDeviceUsage::CALL_INPUT_DEVICES, DeviceRole::Input, DeviceUsage::VOICE),
];

/// Thread-safe registry of connected audio devices and their purpose buckets
pub struct AudioDeviceManager {
    registry: RwLock<DeviceRegistry>,
}

impl std::fmt::Debug for AudioDeviceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.read();
        f.debug_struct("AudioDeviceManager")
            .field("connected_devices", &registry.connected.len())
            .field("privacy_table_loaded", &!registry.privacy_table.is_empty())
            .finish()
    }
}

impl Default for AudioDeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDeviceManager {
    /// Create an empty manager with no privacy table
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(DeviceRegistry::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, DeviceRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DeviceRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the privacy table. An empty table is logged and ignored.
    ///
    /// Connected local devices are reclassified against the new table.
    pub fn on_xml_parsing_completed(&self, xml_data: &PrivacyMap) {
        if xml_data.values().all(Vec::is_empty) {
            error!("Failed to parse xml file.");
            return;
        }

        let mut registry = self.write();
        registry.privacy_table = DevicePrivacyTable::from_map(xml_data);
        let handles = registry.connected.clone();
        for handle in handles {
            registry.classify(handle);
        }
        info!(
            "Device privacy table loaded: {} privacy, {} public rows",
            registry.privacy_table.devices(PrivacyType::Privacy).len(),
            registry.privacy_table.devices(PrivacyType::Public).len()
        );
    }

    /// Parse the privacy XML at `path` and load it. Failures keep the current table.
    pub fn parse_device_xml(&self, path: &Path) -> bool {
        match AudioDeviceParser::new().parse_file(path) {
            Ok(map) => {
                self.on_xml_parsing_completed(&map);
                true
            }
            Err(e) => {
                error!("Audio device privacy config load failed: {}", e);
                false
            }
        }
    }

    /// Record a connected device, or absorb a reconnect report of a known one
    pub fn add_new_device(&self, desc: AudioDeviceDescriptor) {
        if matches!(desc.device_type, DeviceType::None | DeviceType::Invalid)
            || desc.device_role == DeviceRole::None
        {
            warn!(
                "{} Skipping malformed descriptor type={:?} role={:?}",
                "DEVICE_INVALID".bright_yellow(),
                desc.device_type,
                desc.device_role
            );
            return;
        }
        self.write().add_new_device(desc);
    }

    /// Remove every connected device matching type, network and (Bluetooth) mac
    pub fn remove_new_device(&self, desc: &AudioDeviceDescriptor) {
        if desc.device_type == DeviceType::None {
            warn!("Skipping removal of a descriptor without device type");
            return;
        }
        self.write().remove_new_device(desc);
    }

    /// Copy of one bucket, in recency order
    pub fn get_bucket_devices(&self, bucket: DeviceBucket) -> Vec<AudioDeviceDescriptor> {
        self.read().copy_bucket(bucket)
    }

    pub fn get_remote_render_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::RemoteRender)
    }

    pub fn get_remote_capture_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::RemoteCapture)
    }

    pub fn get_comm_render_privacy_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::CommRenderPrivacy)
    }

    pub fn get_comm_render_public_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::CommRenderPublic)
    }

    pub fn get_comm_capture_privacy_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::CommCapturePrivacy)
    }

    pub fn get_comm_capture_public_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::CommCapturePublic)
    }

    pub fn get_media_render_privacy_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::MediaRenderPrivacy)
    }

    pub fn get_media_render_public_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::MediaRenderPublic)
    }

    pub fn get_media_capture_privacy_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::MediaCapturePrivacy)
    }

    pub fn get_media_capture_public_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::MediaCapturePublic)
    }

    pub fn get_capture_privacy_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::CapturePrivacy)
    }

    pub fn get_capture_public_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.get_bucket_devices(DeviceBucket::CapturePublic)
    }

    /// Copy of the canonical connected list, most recently added first
    pub fn get_connected_devices(&self) -> Vec<AudioDeviceDescriptor> {
        self.read().connected_descriptors().cloned().collect()
    }

    /// Default slots plus every connected device the privacy table approves for `usage`
    pub fn get_available_devices_by_usage(
        &self,
        usage: AudioDeviceUsage,
    ) -> Vec<AudioDeviceDescriptor> {
        let registry = self.read();
        let mut seen = HashSet::new();
        let mut devices = Vec::new();
        let mut push = |desc: &AudioDeviceDescriptor| {
            if seen.insert(desc.dedup_key()) {
                devices.push(desc.clone());
            }
        };

        if usage.intersects(AudioDeviceUsage::CALL_OUTPUT_DEVICES) {
            if let Some(earpiece) = &registry.earpiece {
                push(earpiece);
            }
        }
        if usage.intersects(
            AudioDeviceUsage::MEDIA_OUTPUT_DEVICES | AudioDeviceUsage::CALL_OUTPUT_DEVICES,
        ) {
            if let Some(speaker) = &registry.speaker {
                push(speaker);
            }
        }
        if usage.intersects(
            AudioDeviceUsage::MEDIA_INPUT_DEVICES | AudioDeviceUsage::CALL_INPUT_DEVICES,
        ) {
            if let Some(mic) = &registry.default_mic {
                push(mic);
            }
        }

        for desc in registry.connected_descriptors() {
            let approved = USAGE_RULES.iter().any(|(bit, role, device_usage)| {
                usage.contains(*bit)
                    && desc.device_role == *role
                    && registry
                        .privacy_table
                        .type_supports_usage(desc.device_type, *device_usage)
            });
            if approved {
                push(desc);
            }
        }

        crate::device_debug!(
            "Available devices for {:?}: {}",
            usage,
            devices.len()
        );
        devices
    }

    /// Connected devices of exactly `device_type` and `mac_address`
    pub fn get_available_bluetooth_device(
        &self,
        device_type: DeviceType,
        mac_address: &str,
    ) -> Vec<AudioDeviceDescriptor> {
        self.read()
            .connected_descriptors()
            .filter(|desc| desc.device_type == device_type && desc.mac_address == mac_address)
            .cloned()
            .collect()
    }

    /// The opposite-role half linked to the connected device identified by `desc`
    pub fn get_paired_device(&self, desc: &AudioDeviceDescriptor) -> Option<AudioDeviceDescriptor> {
        let registry = self.read();
        let handle = registry.find_existing(desc)?;
        let partner = registry.entries.get(&handle)?.paired?;
        registry.descriptor(partner).cloned()
    }

    pub fn get_default_earpiece(&self) -> Option<AudioDeviceDescriptor> {
        self.read().earpiece.clone()
    }

    pub fn get_default_speaker(&self) -> Option<AudioDeviceDescriptor> {
        self.read().speaker.clone()
    }

    pub fn get_default_mic(&self) -> Option<AudioDeviceDescriptor> {
        self.read().default_mic.clone()
    }

    /// Default render device, or the empty descriptor
    pub fn get_render_default_device(&self) -> AudioDeviceDescriptor {
        self.get_default_speaker().unwrap_or_default()
    }

    /// Default capture device, or the empty descriptor
    pub fn get_capture_default_device(&self) -> AudioDeviceDescriptor {
        self.get_default_mic().unwrap_or_default()
    }

    /// Earpiece for voice streams when the product has one, otherwise the speaker
    pub fn get_comm_render_default_device(&self, stream_usage: StreamUsage) -> AudioDeviceDescriptor {
        let registry = self.read();
        let voice_usage = matches!(
            stream_usage,
            StreamUsage::VoiceCommunication
                | StreamUsage::VoiceModemCommunication
                | StreamUsage::VoiceMessage
        );
        if voice_usage {
            if let Some(earpiece) = &registry.earpiece {
                return earpiece.clone();
            }
        }
        registry.speaker.clone().unwrap_or_default()
    }

    /// Whether a Bluetooth SCO device is routable for private calls
    pub fn has_sco_device(&self) -> bool {
        let registry = self.read();
        registry.buckets[DeviceBucket::CommRenderPrivacy.index()]
            .iter()
            .filter_map(|handle| registry.descriptor(*handle))
            .any(|desc| desc.device_type == DeviceType::BluetoothSco)
    }

    /// Union of approved usages for `device_type` across both privacy lists
    pub fn get_device_usage_from_type(&self, device_type: DeviceType) -> DeviceUsage {
        self.read().privacy_table.usage_for_type(device_type)
    }

    /// Copy of the loaded privacy table
    pub fn get_device_privacy_maps(&self) -> PrivacyMap {
        self.read().privacy_table.to_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::devices::privacy::DevicePrivacyInfo;
    use crate::audio::types::DeviceRoleFlags;

    fn row(
        device_type: DeviceType,
        roles: DeviceRoleFlags,
        usage: DeviceUsage,
        category: DeviceCategory,
    ) -> DevicePrivacyInfo {
        DevicePrivacyInfo::new(device_type, roles, usage, category)
    }

    fn manager_with_table() -> AudioDeviceManager {
        let both = DeviceRoleFlags::INPUT | DeviceRoleFlags::OUTPUT;
        let map = PrivacyMap::from([
            (
                PrivacyType::Privacy,
                vec![
                    row(
                        DeviceType::BluetoothSco,
                        both,
                        DeviceUsage::VOICE,
                        DeviceCategory::BT_HEADPHONE,
                    ),
                    row(
                        DeviceType::BluetoothA2dp,
                        DeviceRoleFlags::OUTPUT,
                        DeviceUsage::MEDIA,
                        DeviceCategory::BT_HEADPHONE,
                    ),
                    row(
                        DeviceType::WiredHeadset,
                        both,
                        DeviceUsage::ALL_USAGE,
                        DeviceCategory::CATEGORY_DEFAULT,
                    ),
                ],
            ),
            (
                PrivacyType::Public,
                vec![
                    row(
                        DeviceType::BluetoothSco,
                        both,
                        DeviceUsage::VOICE,
                        DeviceCategory::BT_CAR,
                    ),
                    row(
                        DeviceType::BluetoothA2dp,
                        DeviceRoleFlags::OUTPUT,
                        DeviceUsage::MEDIA,
                        DeviceCategory::BT_CAR | DeviceCategory::BT_SOUNDBOX,
                    ),
                ],
            ),
        ]);
        let manager = AudioDeviceManager::new();
        manager.on_xml_parsing_completed(&map);
        manager
    }

    #[test]
    fn test_wired_headset_joins_all_privacy_buckets() {
        let manager = manager_with_table();
        manager.add_new_device(AudioDeviceDescriptor::new(
            DeviceType::WiredHeadset,
            DeviceRole::Input,
        ));

        assert_eq!(manager.get_comm_capture_privacy_devices().len(), 1);
        assert_eq!(manager.get_media_capture_privacy_devices().len(), 1);
        assert_eq!(manager.get_capture_privacy_devices().len(), 1);
        assert!(manager.get_comm_render_privacy_devices().is_empty());
        assert!(manager.get_capture_public_devices().is_empty());
    }

    #[test]
    fn test_remote_device_skips_privacy_classification() {
        let manager = manager_with_table();
        manager.add_new_device(
            AudioDeviceDescriptor::new(DeviceType::WiredHeadset, DeviceRole::Output)
                .with_network_id("remote-1"),
        );
        assert_eq!(manager.get_remote_render_devices().len(), 1);
        assert!(manager.get_remote_capture_devices().is_empty());
        assert!(manager.get_comm_render_privacy_devices().is_empty());
    }

    #[test]
    fn test_sco_with_default_category_is_routable_for_calls() {
        let manager = manager_with_table();
        manager.add_new_device(
            AudioDeviceDescriptor::new(DeviceType::BluetoothSco, DeviceRole::Output)
                .with_mac_address("AA"),
        );
        assert_eq!(manager.get_comm_render_privacy_devices().len(), 1);
        assert!(manager.has_sco_device());

        let mut virtual_sco = AudioDeviceDescriptor::new(DeviceType::BluetoothSco, DeviceRole::Output)
            .with_mac_address("BB");
        virtual_sco.connect_state = ConnectState::VirtualConnected;
        manager.add_new_device(virtual_sco);
        assert_eq!(manager.get_comm_render_privacy_devices().len(), 1);
    }

    #[test]
    fn test_in_place_update_reclassifies_non_bluetooth() {
        let manager = AudioDeviceManager::new();
        let mic = AudioDeviceDescriptor::new(DeviceType::UsbHeadset, DeviceRole::Input);
        manager.add_new_device(mic.clone());
        assert!(manager.get_capture_privacy_devices().is_empty());

        // Table arrives later; existing devices follow it
        let map = PrivacyMap::from([(
            PrivacyType::Privacy,
            vec![row(
                DeviceType::UsbHeadset,
                DeviceRoleFlags::INPUT,
                DeviceUsage::ALL_USAGE,
                DeviceCategory::CATEGORY_DEFAULT,
            )],
        )]);
        manager.on_xml_parsing_completed(&map);
        assert_eq!(manager.get_capture_privacy_devices().len(), 1);

        manager.add_new_device(mic.with_category(DeviceCategory::BT_WATCH));
        assert!(manager.get_capture_privacy_devices().is_empty());
        assert_eq!(manager.get_connected_devices().len(), 1);
    }

    #[test]
    fn test_empty_table_is_ignored() {
        let manager = manager_with_table();
        manager.on_xml_parsing_completed(&PrivacyMap::new());
        assert!(!manager.get_device_privacy_maps()[&PrivacyType::Public].is_empty());
        assert_eq!(
            manager.get_device_usage_from_type(DeviceType::WiredHeadset),
            DeviceUsage::ALL_USAGE
        );
    }

    #[test]
    fn test_malformed_descriptor_is_skipped() {
        let manager = manager_with_table();
        manager.add_new_device(AudioDeviceDescriptor::default());
        manager.add_new_device(AudioDeviceDescriptor::new(DeviceType::Speaker, DeviceRole::None));
        assert!(manager.get_connected_devices().is_empty());
    }

    #[test]
    fn test_buckets_follow_connect_order() {
        let manager = manager_with_table();
        for mac in ["11", "22", "33"] {
            manager.add_new_device(
                AudioDeviceDescriptor::new(DeviceType::BluetoothA2dp, DeviceRole::Output)
                    .with_mac_address(mac)
                    .with_category(DeviceCategory::BT_HEADPHONE),
            );
        }
        let macs: Vec<String> = manager
            .get_media_render_privacy_devices()
            .into_iter()
            .map(|d| d.mac_address)
            .collect();
        assert_eq!(macs, vec!["33", "22", "11"]);
    }

    #[test]
    fn test_comm_render_default_prefers_earpiece_for_voice() {
        let manager = AudioDeviceManager::new();
        assert!(manager
            .get_comm_render_default_device(StreamUsage::VoiceCommunication)
            .is_none());

        manager.add_new_device(AudioDeviceDescriptor::new(DeviceType::Speaker, DeviceRole::Output));
        manager.add_new_device(AudioDeviceDescriptor::new(DeviceType::Earpiece, DeviceRole::Output));
        assert_eq!(
            manager
                .get_comm_render_default_device(StreamUsage::VoiceCommunication)
                .device_type,
            DeviceType::Earpiece
        );
        assert_eq!(
            manager
                .get_comm_render_default_device(StreamUsage::Music)
                .device_type,
            DeviceType::Speaker
        );
    }
}
