use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use colored::Colorize;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex as AsyncMutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::types::{DeviceChangeEvent, DeviceChangeType};
use super::AudioDeviceManager;
use crate::types::DEFAULT_EVENT_CHANNEL_CAPACITY;

/// Observer of applied device changes
#[async_trait]
pub trait DeviceChangeListener: Send + Sync {
    async fn on_device_change(&self, event: &DeviceChangeEvent);
}

/// Device event service
///
/// Connect and disconnect reports are queued on a bounded channel and applied
/// to the shared `AudioDeviceManager` by a single background task, in order.
/// Listeners are told about each event after the manager has absorbed it.
pub struct DeviceMonitor {
    /// Registry the events are applied to
    device_manager: Arc<AudioDeviceManager>,

    config: DeviceMonitorConfig,

    sender: mpsc::Sender<DeviceChangeEvent>,

    /// Held by the monitoring task while it runs
    receiver: Arc<AsyncMutex<Option<mpsc::Receiver<DeviceChangeEvent>>>>,

    listeners: Arc<AsyncMutex<Vec<Arc<dyn DeviceChangeListener>>>>,

    is_running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    task: AsyncMutex<Option<JoinHandle<()>>>,

    stats: Arc<AsyncMutex<DeviceMonitorStats>>,
}

impl std::fmt::Debug for DeviceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceMonitor")
            .field("config", &self.config)
            .field("is_running", &self.is_running())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceMonitorConfig {
    /// Events buffered before `submit` waits
    pub event_channel_capacity: usize,

    /// Upper bound on a single listener callback
    pub listener_timeout_ms: u64,
}

impl Default for DeviceMonitorConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            listener_timeout_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceMonitorStats {
    pub monitoring_started_at: Option<DateTime<Utc>>,
    pub events_processed: u64,
    pub devices_connected: u64,
    pub devices_disconnected: u64,
    pub listener_notifications: u64,
    pub listener_timeouts: u64,
    pub last_event_at: Option<DateTime<Utc>>,
}

impl DeviceMonitor {
    /// Create a stopped monitor feeding `device_manager`
    pub fn new(device_manager: Arc<AudioDeviceManager>, config: Option<DeviceMonitorConfig>) -> Self {
        let config = config.unwrap_or_default();
        let (sender, receiver) = mpsc::channel(config.event_channel_capacity.max(1));
        Self {
            device_manager,
            config,
            sender,
            receiver: Arc::new(AsyncMutex::new(Some(receiver))),
            listeners: Arc::new(AsyncMutex::new(Vec::new())),
            is_running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
            task: AsyncMutex::new(None),
            stats: Arc::new(AsyncMutex::new(DeviceMonitorStats::default())),
        }
    }

    /// Sender handle for the device-event layer. Events queue up until monitoring starts.
    pub fn sender(&self) -> mpsc::Sender<DeviceChangeEvent> {
        self.sender.clone()
    }

    /// Queue one event
    pub async fn submit(&self, event: DeviceChangeEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|e| anyhow::anyhow!("Device event channel closed: {}", e))
    }

    pub async fn add_listener(&self, listener: Arc<dyn DeviceChangeListener>) {
        self.listeners.lock().await.push(listener);
    }

    /// Start the event loop
    pub async fn start_monitoring(&self) -> Result<()> {
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(anyhow::anyhow!("Device monitor is already running"));
        }

        let Some(receiver) = self.receiver.lock().await.take() else {
            self.is_running.store(false, Ordering::SeqCst);
            return Err(anyhow::anyhow!("Device event receiver is not available"));
        };

        info!("{} Starting device event monitoring", "DEVICE_MONITOR".bright_cyan());
        self.stats.lock().await.monitoring_started_at = Some(Utc::now());

        let handle = tokio::spawn(Self::monitoring_loop(
            receiver,
            self.receiver.clone(),
            self.device_manager.clone(),
            self.listeners.clone(),
            self.shutdown.clone(),
            self.stats.clone(),
            Duration::from_millis(self.config.listener_timeout_ms),
        ));
        *self.task.lock().await = Some(handle);

        info!("✅ Device event monitoring started");
        Ok(())
    }

    /// Stop the event loop. Events still queued stay queued for the next start.
    pub async fn stop_monitoring(&self) {
        if !self.is_running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.shutdown.notify_one();

        if let Some(handle) = self.task.lock().await.take() {
            if let Err(e) = handle.await {
                warn!("Device monitoring task ended abnormally: {}", e);
            }
        }
        info!("🛑 Device event monitoring stopped");
    }

    pub async fn get_stats(&self) -> DeviceMonitorStats {
        self.stats.lock().await.clone()
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    async fn monitoring_loop(
        mut receiver: mpsc::Receiver<DeviceChangeEvent>,
        receiver_slot: Arc<AsyncMutex<Option<mpsc::Receiver<DeviceChangeEvent>>>>,
        device_manager: Arc<AudioDeviceManager>,
        listeners: Arc<AsyncMutex<Vec<Arc<dyn DeviceChangeListener>>>>,
        shutdown: Arc<Notify>,
        stats: Arc<AsyncMutex<DeviceMonitorStats>>,
        listener_timeout: Duration,
    ) {
        debug!("Device monitoring loop started");

        loop {
            tokio::select! {
                _ = shutdown.notified() => break,
                event = receiver.recv() => match event {
                    Some(event) => {
                        Self::apply_event(&device_manager, &event, &stats).await;
                        Self::notify_listeners(&listeners, &event, &stats, listener_timeout).await;
                    }
                    None => break,
                },
            }
        }

        *receiver_slot.lock().await = Some(receiver);
        debug!("Device monitoring loop ended");
    }

    async fn apply_event(
        device_manager: &AudioDeviceManager,
        event: &DeviceChangeEvent,
        stats: &AsyncMutex<DeviceMonitorStats>,
    ) {
        crate::device_debug!(
            "Applying device event {} {:?} {:?}",
            event.id,
            event.change_type,
            event.descriptor.device_type
        );

        match event.change_type {
            DeviceChangeType::Connected => device_manager.add_new_device(event.descriptor.clone()),
            DeviceChangeType::Disconnected => device_manager.remove_new_device(&event.descriptor),
        }

        let mut stats = stats.lock().await;
        stats.events_processed += 1;
        stats.last_event_at = Some(Utc::now());
        match event.change_type {
            DeviceChangeType::Connected => stats.devices_connected += 1,
            DeviceChangeType::Disconnected => stats.devices_disconnected += 1,
        }
    }

    async fn notify_listeners(
        listeners: &AsyncMutex<Vec<Arc<dyn DeviceChangeListener>>>,
        event: &DeviceChangeEvent,
        stats: &AsyncMutex<DeviceMonitorStats>,
        listener_timeout: Duration,
    ) {
        let listeners = listeners.lock().await.clone();
        if listeners.is_empty() {
            return;
        }

        let results = join_all(listeners.iter().map(|listener| {
            tokio::time::timeout(listener_timeout, listener.on_device_change(event))
        }))
        .await;

        let timeouts = results.iter().filter(|r| r.is_err()).count() as u64;
        if timeouts > 0 {
            warn!("⚠️ {} device listener(s) timed out on event {}", timeouts, event.id);
        }

        let mut stats = stats.lock().await;
        stats.listener_notifications += results.len() as u64 - timeouts;
        stats.listener_timeouts += timeouts;
    }
}
