// src/display/manager.rs
//! DisplayManager - Synchronous wrapper around DisplayDriver.

use crate::display::driver::DisplayDriver;
use crate::display::drivers::HeadlessDisplayDriver;
use crate::display::messages::{
    DisplayError, DisplayEvent, DriverConfig, DriverRequest, DriverResponse,
};
use anyhow::{Context, Result};
use log::info;

/// Which display driver to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayBackend {
    /// No window; frames are accepted and dropped.
    Headless,
    /// An Xlib window. Needs the `x11` feature and a reachable X server.
    X11,
}

impl DisplayBackend {
    /// The windowed backend when available, headless otherwise.
    pub fn detect() -> Self {
        if cfg!(feature = "x11") && std::env::var_os("DISPLAY").is_some() {
            DisplayBackend::X11
        } else {
            DisplayBackend::Headless
        }
    }
}

/// DisplayManager owns the display driver and the window size it reported.
pub struct DisplayManager {
    driver: Box<dyn DisplayDriver>,
    width_px: u32,
    height_px: u32,
}

impl DisplayManager {
    /// Creates the driver for `backend` and initializes its window.
    pub fn open(backend: DisplayBackend, config: DriverConfig) -> Result<Self> {
        let driver: Box<dyn DisplayDriver> = match backend {
            DisplayBackend::Headless => {
                info!("DisplayManager: Creating HeadlessDisplayDriver...");
                Box::new(HeadlessDisplayDriver::new()?)
            }
            #[cfg(feature = "x11")]
            DisplayBackend::X11 => {
                use crate::display::drivers::X11DisplayDriver;
                info!("DisplayManager: Creating X11DisplayDriver...");
                Box::new(X11DisplayDriver::new()?)
            }
            #[cfg(not(feature = "x11"))]
            DisplayBackend::X11 => {
                log::warn!("DisplayManager: Built without the x11 feature, falling back to headless");
                Box::new(HeadlessDisplayDriver::new()?)
            }
        };
        Self::with_driver(driver, config)
    }

    /// Initializes an already-constructed driver.
    pub fn with_driver(mut driver: Box<dyn DisplayDriver>, config: DriverConfig) -> Result<Self> {
        info!(
            "DisplayManager: Initializing driver ({}x{} px, '{}')...",
            config.width_px, config.height_px, config.title
        );
        let response = driver
            .handle_request(DriverRequest::Init(config))
            .map_err(|e| anyhow::anyhow!(e))
            .context("Failed to initialize display driver")?;

        let (width_px, height_px) = match response {
            DriverResponse::InitComplete {
                width_px,
                height_px,
            } => {
                info!("DisplayManager: Initialized - {}x{} px", width_px, height_px);
                (width_px, height_px)
            }
            other => {
                return Err(anyhow::anyhow!(
                    "Expected InitComplete response, got {:?}",
                    other
                ));
            }
        };

        Ok(Self {
            driver,
            width_px,
            height_px,
        })
    }

    /// Forward a request to the driver.
    pub fn handle_request(
        &mut self,
        request: DriverRequest,
    ) -> Result<DriverResponse, DisplayError> {
        self.driver.handle_request(request)
    }

    /// Fetches pending window events.
    pub fn poll_events(&mut self) -> Result<Vec<DisplayEvent>, DisplayError> {
        match self.driver.handle_request(DriverRequest::PollEvents)? {
            DriverResponse::Events(events) => Ok(events),
            other => Err(DisplayError::Generic(anyhow::anyhow!(
                "Expected Events response, got {:?}",
                other
            ))),
        }
    }

    /// Window width in pixels.
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Window height in pixels.
    pub fn height_px(&self) -> u32 {
        self.height_px
    }
}
