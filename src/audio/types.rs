use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::types::{INVALID_DEVICE_ID, LOCAL_NETWORK_ID};

/// Kind of audio endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    None,
    Invalid,
    Earpiece,
    Speaker,
    WiredHeadset,
    WiredHeadphones,
    BluetoothSco,
    BluetoothA2dp,
    Mic,
    Wakeup,
    UsbHeadset,
    UsbArmHeadset,
    FileSink,
    FileSource,
    ExternCable,
    Default,
}

impl DeviceType {
    /// Parse the `DEVICE_TYPE_*` spelling used by the policy configuration
    pub fn from_config_name(name: &str) -> Option<Self> {
        let device_type = match name.trim() {
            "DEVICE_TYPE_NONE" => Self::None,
            "DEVICE_TYPE_INVALID" => Self::Invalid,
            "DEVICE_TYPE_EARPIECE" => Self::Earpiece,
            "DEVICE_TYPE_SPEAKER" => Self::Speaker,
            "DEVICE_TYPE_WIRED_HEADSET" => Self::WiredHeadset,
            "DEVICE_TYPE_WIRED_HEADPHONES" => Self::WiredHeadphones,
            "DEVICE_TYPE_BLUETOOTH_SCO" => Self::BluetoothSco,
            "DEVICE_TYPE_BLUETOOTH_A2DP" => Self::BluetoothA2dp,
            "DEVICE_TYPE_MIC" => Self::Mic,
            "DEVICE_TYPE_WAKEUP" => Self::Wakeup,
            "DEVICE_TYPE_USB_HEADSET" => Self::UsbHeadset,
            "DEVICE_TYPE_USB_ARM_HEADSET" => Self::UsbArmHeadset,
            "DEVICE_TYPE_FILE_SINK" => Self::FileSink,
            "DEVICE_TYPE_FILE_SOURCE" => Self::FileSource,
            "DEVICE_TYPE_EXTERN_CABLE" => Self::ExternCable,
            "DEVICE_TYPE_DEFAULT" => Self::Default,
            _ => return None,
        };
        Some(device_type)
    }

    /// Bluetooth devices are only identified once the mac address is known
    pub fn is_bluetooth(self) -> bool {
        matches!(self, Self::BluetoothSco | Self::BluetoothA2dp)
    }
}

/// Direction of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceRole {
    None,
    Input,
    Output,
}

impl DeviceRole {
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
            Self::None => Self::None,
        }
    }

    pub fn as_flags(self) -> DeviceRoleFlags {
        match self {
            Self::Input => DeviceRoleFlags::INPUT,
            Self::Output => DeviceRoleFlags::OUTPUT,
            Self::None => DeviceRoleFlags::empty(),
        }
    }
}

bitflags! {
    /// Roles a privacy table row applies to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DeviceRoleFlags: u32 {
        const INPUT = 1 << 0;
        const OUTPUT = 1 << 1;
    }
}

bitflags! {
    /// Purposes a device type is approved for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DeviceUsage: u32 {
        const MEDIA = 1 << 0;
        const VOICE = 1 << 1;
        const RECOGNITION = 1 << 2;
        const ALL_USAGE = Self::MEDIA.bits() | Self::VOICE.bits() | Self::RECOGNITION.bits();
    }
}

bitflags! {
    /// Accessory class reported by the Bluetooth stack. Empty is the default category.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DeviceCategory: u32 {
        const BT_HEADPHONE = 1 << 0;
        const BT_SOUNDBOX = 1 << 1;
        const BT_CAR = 1 << 2;
        const BT_GLASSES = 1 << 3;
        const BT_WATCH = 1 << 4;
        const BT_HEARAID = 1 << 5;
        const BT_UNWEAR_HEADPHONE = 1 << 6;
    }
}

impl DeviceCategory {
    pub const CATEGORY_DEFAULT: Self = Self::empty();

    /// Parse a single category name as written in the policy configuration
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.trim() {
            "CATEGORY_DEFAULT" => Some(Self::CATEGORY_DEFAULT),
            other => Self::from_name(other),
        }
    }
}

bitflags! {
    /// Usage filter accepted by `get_available_devices_by_usage`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AudioDeviceUsage: u32 {
        const MEDIA_OUTPUT_DEVICES = 1 << 0;
        const MEDIA_INPUT_DEVICES = 1 << 1;
        const ALL_MEDIA_DEVICES = Self::MEDIA_OUTPUT_DEVICES.bits() | Self::MEDIA_INPUT_DEVICES.bits();
        const CALL_OUTPUT_DEVICES = 1 << 2;
        const CALL_INPUT_DEVICES = 1 << 3;
        const ALL_CALL_DEVICES = Self::CALL_OUTPUT_DEVICES.bits() | Self::CALL_INPUT_DEVICES.bits();
        const D_ALL_DEVICES = Self::ALL_MEDIA_DEVICES.bits() | Self::ALL_CALL_DEVICES.bits();
    }
}

/// Privacy list a table row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrivacyType {
    Privacy,
    Public,
}

/// Connection state reported alongside a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectState {
    #[default]
    Connected,
    SuspendConnected,
    VirtualConnected,
    DeactiveConnected,
}

/// What a render stream is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamUsage {
    Unknown,
    /// Also reported as media by older clients
    Music,
    VoiceCommunication,
    VoiceAssistant,
    Alarm,
    VoiceMessage,
    NotificationRingtone,
    Ringtone,
    Notification,
    Accessibility,
    System,
    Movie,
    Game,
    Audiobook,
    Navigation,
    Dtmf,
    EnforcedTone,
    Ultrasonic,
    Ranging,
    VoiceModemCommunication,
}

/// What a capture stream records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    Invalid,
    Mic,
    VoiceRecognition,
    PlaybackCapture,
    Wakeup,
    VoiceCommunication,
    Ultrasonic,
    VirtualCapture,
}

/// Current audio scene of the policy server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioScene {
    #[default]
    Default,
    Ringing,
    PhoneCall,
    PhoneChat,
}

/// Stream capabilities advertised by an endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub supported_sample_rates: Vec<u32>,
    pub supported_channels: Vec<u16>,
}

/// One physical or virtual audio endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDeviceDescriptor {
    pub device_type: DeviceType,
    pub device_role: DeviceRole,
    pub device_id: i32,
    pub device_name: String,
    pub display_name: String,
    pub mac_address: String,
    pub network_id: String,
    pub device_category: DeviceCategory,
    pub connect_state: ConnectState,
    /// Monotonic milliseconds; zero means not yet stamped
    pub connect_time_stamp: i64,
    pub is_enable: bool,
    pub interrupt_group_id: i32,
    pub volume_group_id: i32,
    pub channel_masks: i32,
    pub stream_info: AudioStreamInfo,
}

impl Default for AudioDeviceDescriptor {
    fn default() -> Self {
        Self::new(DeviceType::None, DeviceRole::None)
    }
}

impl AudioDeviceDescriptor {
    /// Create a local descriptor with empty addressing
    pub fn new(device_type: DeviceType, device_role: DeviceRole) -> Self {
        Self {
            device_type,
            device_role,
            device_id: INVALID_DEVICE_ID,
            device_name: String::new(),
            display_name: String::new(),
            mac_address: String::new(),
            network_id: LOCAL_NETWORK_ID.to_string(),
            device_category: DeviceCategory::CATEGORY_DEFAULT,
            connect_state: ConnectState::Connected,
            connect_time_stamp: 0,
            is_enable: true,
            interrupt_group_id: 0,
            volume_group_id: 0,
            channel_masks: 0,
            stream_info: AudioStreamInfo::default(),
        }
    }

    pub fn with_mac_address(mut self, mac_address: impl Into<String>) -> Self {
        self.mac_address = mac_address.into();
        self
    }

    pub fn with_network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = network_id.into();
        self
    }

    pub fn with_category(mut self, category: DeviceCategory) -> Self {
        self.device_category = category;
        self
    }

    pub fn with_connect_time_stamp(mut self, stamp: i64) -> Self {
        self.connect_time_stamp = stamp;
        self
    }

    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// The "no device available" sentinel
    pub fn is_none(&self) -> bool {
        self.device_type == DeviceType::None
    }

    pub fn is_remote(&self) -> bool {
        self.network_id != LOCAL_NETWORK_ID
    }

    /// Same endpoint as `other`: type, network and role, plus mac for Bluetooth
    pub fn is_same_device(&self, other: &AudioDeviceDescriptor) -> bool {
        self.device_type == other.device_type
            && self.network_id == other.network_id
            && self.device_role == other.device_role
            && (!self.device_type.is_bluetooth() || self.mac_address == other.mac_address)
    }

    /// Disconnect matching ignores role so both halves of an accessory go together
    pub fn matches_for_removal(&self, other: &AudioDeviceDescriptor) -> bool {
        self.device_type == other.device_type
            && self.network_id == other.network_id
            && (!self.device_type.is_bluetooth() || self.mac_address == other.mac_address)
    }

    /// Whether `other` is the opposite-role half of the same accessory
    pub fn pairs_with(&self, other: &AudioDeviceDescriptor) -> bool {
        if self.device_role == DeviceRole::None || other.device_role != self.device_role.opposite() {
            return false;
        }
        if self.network_id != other.network_id || self.device_type != other.device_type {
            return false;
        }
        if !self.mac_address.is_empty() || !other.mac_address.is_empty() {
            return self.mac_address == other.mac_address;
        }
        true
    }

    /// Key used to deduplicate availability query results
    pub fn dedup_key(&self) -> (DeviceType, String, DeviceRole, String) {
        (
            self.device_type,
            self.network_id.clone(),
            self.device_role,
            self.mac_address.clone(),
        )
    }

    /// Overwrite this descriptor with a reconnect report. A zero stamp keeps the old one.
    pub fn update_from(&mut self, other: &AudioDeviceDescriptor) {
        let stamp = if other.connect_time_stamp == 0 {
            self.connect_time_stamp
        } else {
            other.connect_time_stamp
        };
        *self = other.clone();
        self.connect_time_stamp = stamp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor_is_none() {
        let desc = AudioDeviceDescriptor::default();
        assert!(desc.is_none());
        assert!(!desc.is_remote());
        assert_eq!(desc.device_category, DeviceCategory::CATEGORY_DEFAULT);
    }

    #[test]
    fn test_bluetooth_identity_requires_mac() {
        let a = AudioDeviceDescriptor::new(DeviceType::BluetoothA2dp, DeviceRole::Output)
            .with_mac_address("AA:BB");
        let b = AudioDeviceDescriptor::new(DeviceType::BluetoothA2dp, DeviceRole::Output)
            .with_mac_address("CC:DD");
        assert!(!a.is_same_device(&b));
        assert!(a.is_same_device(&a.clone()));

        // Wired devices ignore the mac
        let c = AudioDeviceDescriptor::new(DeviceType::WiredHeadset, DeviceRole::Output)
            .with_mac_address("x");
        let d = AudioDeviceDescriptor::new(DeviceType::WiredHeadset, DeviceRole::Output);
        assert!(c.is_same_device(&d));
    }

    #[test]
    fn test_pairing_rule() {
        let out = AudioDeviceDescriptor::new(DeviceType::BluetoothSco, DeviceRole::Output)
            .with_mac_address("AA");
        let input = AudioDeviceDescriptor::new(DeviceType::BluetoothSco, DeviceRole::Input)
            .with_mac_address("AA");
        let other = AudioDeviceDescriptor::new(DeviceType::BluetoothSco, DeviceRole::Input)
            .with_mac_address("BB");
        assert!(out.pairs_with(&input));
        assert!(input.pairs_with(&out));
        assert!(!out.pairs_with(&other));
        assert!(!out.pairs_with(&out.clone()));

        let remote_in = input.clone().with_network_id("remote-1");
        assert!(!out.pairs_with(&remote_in));
    }

    #[test]
    fn test_update_keeps_stamp_when_unset() {
        let mut stored = AudioDeviceDescriptor::new(DeviceType::Speaker, DeviceRole::Output)
            .with_connect_time_stamp(42);
        let report = AudioDeviceDescriptor::new(DeviceType::Speaker, DeviceRole::Output)
            .with_device_name("Speaker");
        stored.update_from(&report);
        assert_eq!(stored.connect_time_stamp, 42);
        assert_eq!(stored.device_name, "Speaker");
    }

    #[test]
    fn test_category_names() {
        assert_eq!(
            DeviceCategory::from_config_name("BT_CAR"),
            Some(DeviceCategory::BT_CAR)
        );
        assert_eq!(
            DeviceCategory::from_config_name("CATEGORY_DEFAULT"),
            Some(DeviceCategory::CATEGORY_DEFAULT)
        );
        assert_eq!(DeviceCategory::from_config_name("BT_TOASTER"), None);
        assert!(AudioDeviceUsage::ALL_CALL_DEVICES.contains(AudioDeviceUsage::CALL_INPUT_DEVICES));
    }
}
