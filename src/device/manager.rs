use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::models::{send_ptz_command_with, CameraHandle};
use crate::config::{self, RawPtzConfig};
use crate::ptz::{PtzError, Result};
use crate::serial::{LinkOpener, SerialportOpener};

/// Registry of cameras and their PTZ links.
/// Commands to one camera run one at a time; different cameras proceed in parallel.
pub struct PtzManager<O = SerialportOpener> {
    cameras: Arc<RwLock<HashMap<Uuid, Arc<Mutex<CameraHandle>>>>>,
    opener: Arc<O>,
}

impl PtzManager<SerialportOpener> {
    pub fn new() -> Self {
        Self::with_opener(SerialportOpener)
    }
}

impl Default for PtzManager<SerialportOpener> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> PtzManager<O>
where
    O: LinkOpener + Send + Sync + 'static,
{
    pub fn with_opener(opener: O) -> Self {
        Self {
            cameras: Arc::new(RwLock::new(HashMap::new())),
            opener: Arc::new(opener),
        }
    }

    /// Add a camera; invalid PTZ configuration leaves it without PTZ control
    pub async fn register_camera(&self, name: impl Into<String>, raw: &RawPtzConfig) -> Uuid {
        let camera = CameraHandle::new(name, raw);
        let id = camera.id;
        log::info!(
            "Registered camera {} ({}), PTZ {}",
            camera.name,
            id,
            if camera.ptz_enabled() { "enabled" } else { "disabled" }
        );

        let mut cameras_guard = self.cameras.write().await;
        cameras_guard.insert(id, Arc::new(Mutex::new(camera)));
        id
    }

    /// Register every camera listed in a JSON device file
    pub async fn register_from_file(&self, path: impl AsRef<Path>) -> anyhow::Result<Vec<Uuid>> {
        let entries = config::load_devices(path)?;
        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            ids.push(self.register_camera(entry.name, &entry.ptz).await);
        }
        Ok(ids)
    }

    /// Replace a camera's PTZ configuration, waiting for any command in flight.
    /// Returns whether PTZ is enabled afterwards.
    pub async fn reconfigure(&self, camera_id: &Uuid, raw: &RawPtzConfig) -> Result<bool> {
        let slot = self.slot(camera_id).await?;
        let mut camera = slot.lock().await;
        camera.reconfigure(raw);
        log::info!("Reconfigured camera {} ({})", camera.name, camera_id);
        Ok(camera.ptz_enabled())
    }

    pub async fn remove_camera(&self, camera_id: &Uuid) -> Result<()> {
        let mut cameras_guard = self.cameras.write().await;
        match cameras_guard.remove(camera_id) {
            Some(_) => {
                log::info!("Removed camera {}", camera_id);
                Ok(())
            }
            None => Err(PtzError::UnknownCamera(*camera_id)),
        }
    }

    /// Snapshot of a camera, taken once no command is in flight for it
    pub async fn get_camera(&self, camera_id: &Uuid) -> Option<CameraHandle> {
        let slot = self.slot(camera_id).await.ok()?;
        let camera = slot.lock().await;
        Some(camera.clone())
    }

    pub async fn get_cameras(&self) -> Vec<CameraHandle> {
        let slots: Vec<_> = {
            let cameras_guard = self.cameras.read().await;
            cameras_guard.values().cloned().collect()
        };

        let mut cameras = Vec::with_capacity(slots.len());
        for slot in slots {
            cameras.push(slot.lock().await.clone());
        }
        cameras
    }

    pub async fn ptz_enabled(&self, camera_id: &Uuid) -> bool {
        self.get_camera(camera_id)
            .await
            .map(|camera| camera.ptz_enabled())
            .unwrap_or(false)
    }

    /// Send a command to a camera.
    ///
    /// Waits for any earlier command to the same camera, including its
    /// automatic stop, then runs the blocking transmission off the async runtime.
    pub async fn send_command(
        &self,
        camera_id: &Uuid,
        command_bits: u32,
        delay_ms: u32,
        pan_speed: i32,
        tilt_speed: i32,
        preset_id: i32,
    ) -> Result<()> {
        let slot = self.slot(camera_id).await?;
        let mut camera = slot.lock_owned().await;
        let opener = Arc::clone(&self.opener);

        tokio::task::spawn_blocking(move || {
            let result = send_ptz_command_with(
                opener.as_ref(),
                &camera,
                command_bits,
                delay_ms,
                pan_speed,
                tilt_speed,
                preset_id,
            );
            if result.is_ok() {
                camera.last_command_at = Some(Utc::now());
            }
            result
        })
        .await
        .map_err(|e| {
            log::error!("PTZ task for camera {} failed: {}", camera_id, e);
            PtzError::TaskFailed(e.to_string())
        })?
    }

    async fn slot(&self, camera_id: &Uuid) -> Result<Arc<Mutex<CameraHandle>>> {
        let cameras_guard = self.cameras.read().await;
        cameras_guard
            .get(camera_id)
            .cloned()
            .ok_or(PtzError::UnknownCamera(*camera_id))
    }
}
