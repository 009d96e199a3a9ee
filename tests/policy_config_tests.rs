use audio_policy_lib::audio::types::{
    AudioDeviceDescriptor, AudioScene, DeviceCategory, DeviceRole, DeviceType, PrivacyType,
    StreamUsage,
};
use audio_policy_lib::config::{PolicyConfig, RouterProfile};
use audio_policy_lib::log::{is_device_debug_enabled, set_device_debug};
use audio_policy_lib::policy::AudioPolicyCore;
use audio_policy_lib::types::SYSTEM_CLIENT_UID;
use audio_policy_lib::PolicyError;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

const PRIVACY_XML: &str = r#"<audio_device_privacy>
    <privacy_type name="privacy">
        <device type="DEVICE_TYPE_WIRED_HEADSET" role="input,output" usage="all"/>
    </privacy_type>
    <privacy_type name="public">
        <device type="DEVICE_TYPE_BLUETOOTH_SCO" role="input,output" usage="voice" category="BT_CAR"/>
    </privacy_type>
</audio_device_privacy>"#;

/// Test configuration loading and policy core assembly
#[cfg(test)]
mod policy_config_tests {
    use super::*;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    #[test]
    #[serial]
    fn test_config_file_drives_policy_core() {
        let dir = TempDir::new().unwrap();
        let xml_path = write_file(&dir, "audio_device_privacy.xml", PRIVACY_XML);
        let config_json = serde_json::json!({
            "privacy_config_path": xml_path,
            "router_profile": "phone",
            "monitor": { "event_channel_capacity": 8 }
        });
        let config_path = write_file(&dir, "policy.json", &config_json.to_string());

        let config = PolicyConfig::from_json_file(&config_path).unwrap();
        assert_eq!(config.router_profile, RouterProfile::Phone);
        assert_eq!(config.monitor.event_channel_capacity, 8);
        assert_eq!(config.monitor.listener_timeout_ms, 500);

        let core = AudioPolicyCore::new(config).unwrap();
        let maps = core.device_manager().get_device_privacy_maps();
        assert_eq!(maps[&PrivacyType::Privacy].len(), 1);
        assert_eq!(maps[&PrivacyType::Public].len(), 1);
    }

    #[test]
    fn test_cockpit_category_from_json() {
        let config =
            PolicyConfig::from_json_str(r#"{ "cockpit_category": "BT_CAR | BT_SOUNDBOX" }"#).unwrap();
        assert_eq!(
            config.cockpit_category,
            DeviceCategory::BT_CAR | DeviceCategory::BT_SOUNDBOX
        );
        assert_eq!(config.router_profile, RouterProfile::Cockpit);
    }

    #[test]
    fn test_missing_config_file_reports_io_error() {
        let err = PolicyConfig::from_json_file(std::path::Path::new("/nonexistent/policy.json"))
            .unwrap_err();
        assert!(matches!(err, PolicyError::Io { .. }));
    }

    #[test]
    #[serial]
    fn test_broken_privacy_file_degrades_to_defaults() {
        let mut xml = NamedTempFile::new().unwrap();
        xml.write_all(b"<audio_device_privacy><privacy_type name=\"nobody\">")
            .unwrap();

        let config = PolicyConfig {
            privacy_config_path: Some(xml.path().to_path_buf()),
            ..PolicyConfig::default()
        };
        let core = AudioPolicyCore::new(config).expect("Core must start without a table");
        assert!(core
            .device_manager()
            .get_device_privacy_maps()
            .values()
            .all(Vec::is_empty));

        core.device_manager()
            .add_new_device(AudioDeviceDescriptor::new(DeviceType::Speaker, DeviceRole::Output));
        let desc = core.fetch_output_device(StreamUsage::Music, SYSTEM_CLIENT_UID, AudioScene::Default);
        assert_eq!(desc.device_type, DeviceType::Speaker);
    }

    #[test]
    #[serial]
    fn test_zero_channel_capacity_is_rejected() {
        let mut config = PolicyConfig::default();
        config.monitor.event_channel_capacity = 0;
        assert!(AudioPolicyCore::new(config).is_err());
    }

    #[test]
    #[serial]
    fn test_device_debug_flag() {
        set_device_debug(false);
        assert!(!is_device_debug_enabled());

        let config = PolicyConfig {
            device_debug: true,
            ..PolicyConfig::default()
        };
        let _core = AudioPolicyCore::new(config).unwrap();
        assert!(is_device_debug_enabled());

        set_device_debug(false);
        assert!(!is_device_debug_enabled());
    }

    #[test]
    #[serial]
    fn test_events_wait_for_core_start() {
        let core = AudioPolicyCore::new(PolicyConfig::default()).unwrap();
        tokio_test::block_on(core.on_device_connected(AudioDeviceDescriptor::new(
            DeviceType::Speaker,
            DeviceRole::Output,
        )))
        .unwrap();

        assert!(core.device_manager().get_connected_devices().is_empty());
        assert!(!core.monitor().is_running());
    }

    #[tokio::test]
    #[serial]
    async fn test_core_applies_device_events() {
        let core = AudioPolicyCore::new(PolicyConfig::default()).unwrap();
        core.start().await.unwrap();

        core.on_device_connected(AudioDeviceDescriptor::new(DeviceType::Speaker, DeviceRole::Output))
            .await
            .unwrap();
        core.on_device_connected(
            AudioDeviceDescriptor::new(DeviceType::Earpiece, DeviceRole::Output),
        )
        .await
        .unwrap();

        for _ in 0..200 {
            if core.monitor().get_stats().await.events_processed == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let call = core.fetch_output_device(
            StreamUsage::VoiceCommunication,
            SYSTEM_CLIENT_UID,
            AudioScene::PhoneCall,
        );
        assert_eq!(call.device_type, DeviceType::Earpiece);
        core.shutdown().await;
    }
}
