// Policy core - composition root
//
// Builds the device registry, loads the privacy table, wires the routers and
// owns the event monitor. Everything is explicitly constructed and passed
// down; nothing here is process-global.

use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::audio::devices::{AudioDeviceManager, AudioStateManager, DeviceChangeEvent, DeviceMonitor};
use crate::audio::routers::AudioRouterCenter;
use crate::audio::types::{AudioDeviceDescriptor, AudioScene, SourceType, StreamUsage};
use crate::config::PolicyConfig;

#[derive(Debug)]
pub struct AudioPolicyCore {
    config: PolicyConfig,
    device_manager: Arc<AudioDeviceManager>,
    state_manager: Arc<AudioStateManager>,
    router_center: AudioRouterCenter,
    monitor: DeviceMonitor,
}

impl AudioPolicyCore {
    /// Assemble the policy core. A broken privacy file is logged and the core
    /// starts without a table.
    pub fn new(config: PolicyConfig) -> Result<Self> {
        if config.monitor.event_channel_capacity == 0 {
            anyhow::bail!("Device event channel capacity must be at least 1");
        }
        if config.device_debug {
            crate::log::set_device_debug(true);
        }

        let device_manager = Arc::new(AudioDeviceManager::new());
        match &config.privacy_config_path {
            Some(path) => {
                if !device_manager.parse_device_xml(path) {
                    warn!(
                        "{} Continuing without privacy table from {}",
                        "POLICY_DEGRADED".bright_yellow(),
                        path.display()
                    );
                }
            }
            None => info!("No privacy table configured, only default devices are classified"),
        }

        let state_manager = Arc::new(AudioStateManager::new());
        let router_center = AudioRouterCenter::new(
            device_manager.clone(),
            state_manager.clone(),
            config.router_profile,
            config.cockpit_category,
        );
        let monitor = DeviceMonitor::new(device_manager.clone(), Some(config.monitor.clone()));

        info!(
            "{} Audio policy core ready ({:?} profile)",
            "POLICY_INIT".bright_green(),
            config.router_profile
        );

        Ok(Self {
            config,
            device_manager,
            state_manager,
            router_center,
            monitor,
        })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn device_manager(&self) -> &Arc<AudioDeviceManager> {
        &self.device_manager
    }

    pub fn state_manager(&self) -> &Arc<AudioStateManager> {
        &self.state_manager
    }

    pub fn router_center(&self) -> &AudioRouterCenter {
        &self.router_center
    }

    pub fn monitor(&self) -> &DeviceMonitor {
        &self.monitor
    }

    /// Start applying queued device events
    pub async fn start(&self) -> Result<()> {
        self.monitor
            .start_monitoring()
            .await
            .context("Failed to start device event monitoring")
    }

    pub async fn shutdown(&self) {
        self.monitor.stop_monitoring().await;
    }

    pub async fn on_device_connected(&self, desc: AudioDeviceDescriptor) -> Result<()> {
        self.monitor.submit(DeviceChangeEvent::connected(desc)).await
    }

    pub async fn on_device_disconnected(&self, desc: AudioDeviceDescriptor) -> Result<()> {
        self.monitor.submit(DeviceChangeEvent::disconnected(desc)).await
    }

    pub fn fetch_output_device(
        &self,
        stream_usage: StreamUsage,
        client_uid: i32,
        audio_scene: AudioScene,
    ) -> AudioDeviceDescriptor {
        self.router_center
            .fetch_output_device(stream_usage, client_uid, audio_scene)
    }

    pub fn fetch_input_device(&self, source_type: SourceType, client_uid: i32) -> AudioDeviceDescriptor {
        self.router_center.fetch_input_device(source_type, client_uid)
    }
}
