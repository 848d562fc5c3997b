// Kanaboard Hardware Keyboard Reader
// Reads key events from one evdev device and turns them into raw key events

use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use evdev::{Device, EventType};
use log::{debug, warn};

use crate::event::{MetaTracker, RawKeyEvent};
use crate::input::{DeviceConfiguration, KeyboardClass};
use crate::ScanCode;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors that can occur while reading a keyboard device
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event device error: {0}")]
    Evdev(String),
}

/// Polls a single keyboard device.
///
/// When opened with `grab`, other clients stop receiving the device's keys
/// until the reader is dropped.
pub struct KeyboardReader {
    device: Device,
    path: PathBuf,
    tracker: MetaTracker,
    grabbed: bool,
}

impl KeyboardReader {
    /// Open the device at `path`
    pub fn open(path: impl AsRef<Path>, grab: bool) -> DeviceResult<Self> {
        let path = path.as_ref();
        let mut device = Device::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DeviceError::DeviceNotFound(path.display().to_string()),
            _ => DeviceError::Io(e),
        })?;

        if !device.supported_events().contains(EventType::KEY) {
            return Err(DeviceError::Evdev(format!(
                "{} does not report key events",
                path.display()
            )));
        }

        if grab {
            // A previous run may have exited with the device still grabbed
            let _ = device.ungrab();
            device.grab()?;
        }

        debug!(
            "Opened {} ({})",
            path.display(),
            device.name().unwrap_or("Unknown")
        );

        Ok(Self {
            device,
            path: path.to_path_buf(),
            tracker: MetaTracker::new(),
            grabbed: grab,
        })
    }

    pub fn name(&self) -> &str {
        self.device.name().unwrap_or("Unknown")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keyboard class inferred from the keys the device can report
    pub fn keyboard_class(&self) -> KeyboardClass {
        let keys: Vec<ScanCode> = self
            .device
            .supported_keys()
            .map(|keys| keys.iter().map(|key| ScanCode(key.code())).collect())
            .unwrap_or_default();
        KeyboardClass::from_supported_keys(&keys)
    }

    /// Configuration to report while this device is attached
    pub fn configuration(&self) -> DeviceConfiguration {
        DeviceConfiguration::new().with_keyboard(self.keyboard_class())
    }

    /// Wait up to `timeout_ms` for key events (-1 waits forever).
    ///
    /// A timeout or an interrupted wait returns no events.
    pub fn poll(&mut self, timeout_ms: i32) -> DeviceResult<Vec<RawKeyEvent>> {
        let mut events = Vec::new();
        let mut poll_fd = libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };

        let poll_result = unsafe { libc::poll(&mut poll_fd, 1, timeout_ms) };
        if poll_result < 0 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                return Ok(events);
            }
            return Err(DeviceError::Io(err));
        }
        if poll_result == 0 || poll_fd.revents & libc::POLLIN == 0 {
            return Ok(events);
        }

        let fetched = match self.device.fetch_events() {
            Ok(fetched) => fetched,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(events),
            Err(e) => return Err(DeviceError::Io(e)),
        };
        for input in fetched {
            if input.event_type() != EventType::KEY {
                continue;
            }
            match self.tracker.observe(ScanCode(input.code()), input.value()) {
                Some(event) => events.push(event),
                None => warn!("Ignoring key value {} for code {}", input.value(), input.code()),
            }
        }
        Ok(events)
    }

    /// Release the device grab, if held
    pub fn ungrab(&mut self) {
        if self.grabbed {
            let _ = self.device.ungrab();
            self.grabbed = false;
        }
    }
}

impl Drop for KeyboardReader {
    fn drop(&mut self) {
        // A grabbed device left behind keeps the keyboard unusable
        self.ungrab();
    }
}

/// List `(path, name)` for every device that reports letter keys
pub fn list_keyboards() -> Vec<(PathBuf, String)> {
    evdev::enumerate()
        .filter(|(_, device)| {
            let keys: Vec<ScanCode> = device
                .supported_keys()
                .map(|keys| keys.iter().map(|key| ScanCode(key.code())).collect())
                .unwrap_or_default();
            KeyboardClass::from_supported_keys(&keys).has_keys()
        })
        .map(|(path, device)| (path, device.name().unwrap_or("Unknown").to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_device() {
        match KeyboardReader::open("/dev/input/kanaboard-missing", false) {
            Err(DeviceError::DeviceNotFound(path)) => {
                assert!(path.contains("kanaboard-missing"))
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("opened a missing device"),
        }
    }
}
