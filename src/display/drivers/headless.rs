//! Headless display driver implementation.
//!
//! Accepts frames without showing them. A [`FrameCapture`] handle lets the
//! caller look at what would have been on screen, inject a close request,
//! or make presents fail.

use crate::display::driver::DisplayDriver;
use crate::display::messages::{
    DisplayError, DisplayEvent, DisplayFrame, DriverConfig, DriverRequest, DriverResponse,
};
use anyhow::Result;
use log::{info, trace};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct CaptureState {
    keep_frames: bool,
    frames_presented: u64,
    polls: u64,
    last_frame: Option<DisplayFrame>,
    title: String,
    close_requested: bool,
    close_after_polls: Option<u64>,
    failing_presents: u32,
}

/// Shared view into a [`HeadlessDisplayDriver`].
#[derive(Debug, Clone, Default)]
pub struct FrameCapture {
    state: Arc<Mutex<CaptureState>>,
}

impl FrameCapture {
    fn lock(&self) -> MutexGuard<'_, CaptureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of frames successfully presented.
    pub fn frames_presented(&self) -> u64 {
        self.lock().frames_presented
    }

    /// Copy of the most recently presented frame.
    pub fn last_frame(&self) -> Option<DisplayFrame> {
        self.lock().last_frame.clone()
    }

    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    /// Makes the next event poll report `CloseRequested`.
    pub fn request_close(&self) {
        self.lock().close_requested = true;
    }

    /// Reports `CloseRequested` once `polls` event polls have happened.
    pub fn close_after_polls(&self, polls: u64) {
        self.lock().close_after_polls = Some(polls);
    }

    /// Makes the next `count` presents fail.
    pub fn fail_next_presents(&self, count: u32) {
        self.lock().failing_presents = count;
    }
}

pub struct HeadlessDisplayDriver {
    width_px: u32,
    height_px: u32,
    capture: FrameCapture,
}

impl HeadlessDisplayDriver {
    /// Returns a handle to this driver's capture state. Frames are only
    /// copied once a capture handle has been taken.
    pub fn capture(&self) -> FrameCapture {
        self.capture.lock().keep_frames = true;
        self.capture.clone()
    }

    fn poll_events(&mut self) -> Vec<DisplayEvent> {
        let mut state = self.capture.lock();
        state.polls += 1;

        let polls = state.polls;
        let scheduled = state.close_after_polls.is_some_and(|limit| polls >= limit);
        if state.close_requested || scheduled {
            state.close_requested = false;
            state.close_after_polls = None;
            info!("HeadlessDisplayDriver: Injecting CloseRequested");
            return vec![DisplayEvent::CloseRequested];
        }
        Vec::new()
    }

    fn present(&mut self, frame: DisplayFrame) -> Result<DriverResponse, DisplayError> {
        trace!("HeadlessDisplayDriver: Present");
        let mut state = self.capture.lock();

        if state.failing_presents > 0 {
            state.failing_presents -= 1;
            return Err(DisplayError::PresentationFailed(
                frame,
                "injected failure".to_string(),
            ));
        }

        if frame.width_px != self.width_px || frame.height_px != self.height_px {
            let reason = format!(
                "frame is {}x{}, window is {}x{}",
                frame.width_px, frame.height_px, self.width_px, self.height_px
            );
            return Err(DisplayError::PresentationFailed(frame, reason));
        }

        state.frames_presented += 1;
        if state.keep_frames {
            state.last_frame = Some(frame.clone());
        }
        Ok(DriverResponse::PresentComplete(frame))
    }
}

impl DisplayDriver for HeadlessDisplayDriver {
    fn new() -> Result<Self> {
        info!("HeadlessDisplayDriver::new()");
        Ok(Self {
            width_px: 0,
            height_px: 0,
            capture: FrameCapture::default(),
        })
    }

    fn handle_request(&mut self, request: DriverRequest) -> Result<DriverResponse, DisplayError> {
        match request {
            DriverRequest::Init(config) => {
                info!(
                    "HeadlessDisplayDriver: Init {}x{} '{}'",
                    config.width_px, config.height_px, config.title
                );
                let DriverConfig {
                    width_px,
                    height_px,
                    title,
                } = config;
                self.width_px = width_px;
                self.height_px = height_px;
                self.capture.lock().title = title;
                Ok(DriverResponse::InitComplete {
                    width_px,
                    height_px,
                })
            }
            DriverRequest::PollEvents => Ok(DriverResponse::Events(self.poll_events())),
            DriverRequest::Present(frame) => self.present(frame),
        }
    }
}
