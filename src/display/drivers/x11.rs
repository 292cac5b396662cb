#![cfg(feature = "x11")]

//! Minimal X11 DisplayDriver implementation using Xlib.
//!
//! Features:
//! - Fixed-size window (min and max size hints pinned to the frame size)
//! - WM_DELETE_WINDOW handling for the close signal
//! - Frame presentation via XPutImage

use crate::display::driver::DisplayDriver;
use crate::display::messages::{
    DisplayError, DisplayEvent, DisplayFrame, DriverConfig, DriverRequest, DriverResponse,
};
use ::x11::xlib::*;
use anyhow::{Context, Result};
use log::{debug, info, trace};
use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;

pub struct X11DisplayDriver {
    display: *mut Display,
    screen: c_int,
    window: Window,
    gc: GC,
    visual: *mut Visual,
    depth: u32,
    wm_delete_window: Atom,
    width_px: u32,
    height_px: u32,
}

impl DisplayDriver for X11DisplayDriver {
    fn new() -> Result<Self> {
        info!("X11DisplayDriver::new() - Connecting to X server");

        unsafe {
            let display = XOpenDisplay(ptr::null());
            if display.is_null() {
                return Err(anyhow::anyhow!("Failed to open X11 display. Is DISPLAY set?"));
            }

            let screen = XDefaultScreen(display);
            let visual = XDefaultVisual(display, screen);
            let depth = XDefaultDepth(display, screen) as u32;
            if depth != 24 && depth != 32 {
                XCloseDisplay(display);
                return Err(anyhow::anyhow!(
                    "Unsupported X11 default depth {} (need TrueColor 24 or 32)",
                    depth
                ));
            }

            Ok(Self {
                display,
                screen,
                window: 0,
                gc: ptr::null_mut(),
                visual,
                depth,
                wm_delete_window: 0,
                width_px: 0,
                height_px: 0,
            })
        }
    }

    fn handle_request(&mut self, request: DriverRequest) -> Result<DriverResponse, DisplayError> {
        match request {
            DriverRequest::Init(config) => Ok(self.handle_init(config)?),
            DriverRequest::PollEvents => Ok(self.handle_poll_events()),
            DriverRequest::Present(frame) => self.handle_present(frame),
        }
    }
}

impl X11DisplayDriver {
    fn handle_init(&mut self, config: DriverConfig) -> Result<DriverResponse> {
        if self.window != 0 {
            return Err(anyhow::anyhow!("X11DisplayDriver: Window already created"));
        }
        let DriverConfig {
            width_px,
            height_px,
            title,
        } = config;

        unsafe {
            let root = XRootWindow(self.display, self.screen);
            let window = XCreateSimpleWindow(
                self.display,
                root,
                0,
                0,
                width_px,
                height_px,
                0,
                XBlackPixel(self.display, self.screen),
                XBlackPixel(self.display, self.screen),
            );
            if window == 0 {
                return Err(anyhow::anyhow!("Failed to create X11 window"));
            }
            self.window = window;

            XSelectInput(self.display, window, StructureNotifyMask);

            // Pin the window to the frame size.
            let hints = XAllocSizeHints();
            if !hints.is_null() {
                (*hints).flags = PMinSize | PMaxSize;
                (*hints).min_width = width_px as c_int;
                (*hints).max_width = width_px as c_int;
                (*hints).min_height = height_px as c_int;
                (*hints).max_height = height_px as c_int;
                XSetWMNormalHints(self.display, window, hints);
                XFree(hints as *mut _);
            }

            self.gc = XCreateGC(self.display, window, 0, ptr::null_mut());

            // WM_DELETE_WINDOW turns the close button into a ClientMessage.
            let atom_name = b"WM_DELETE_WINDOW\0";
            self.wm_delete_window =
                XInternAtom(self.display, atom_name.as_ptr() as *const c_char, False);
            let mut protocols = [self.wm_delete_window];
            XSetWMProtocols(self.display, window, protocols.as_mut_ptr(), 1);

            XMapWindow(self.display, window);
            XFlush(self.display);
        }

        self.width_px = width_px;
        self.height_px = height_px;
        self.store_title(&title)?;

        info!("X11DisplayDriver: Initialized {}x{} px", width_px, height_px);
        Ok(DriverResponse::InitComplete {
            width_px,
            height_px,
        })
    }

    fn handle_poll_events(&mut self) -> DriverResponse {
        let mut events = Vec::new();

        unsafe {
            while XPending(self.display) > 0 {
                let mut event: XEvent = std::mem::zeroed();
                XNextEvent(self.display, &mut event);

                if let Some(display_event) = self.convert_event(&event) {
                    events.push(display_event);
                }
            }
        }

        DriverResponse::Events(events)
    }

    fn convert_event(&self, event: &XEvent) -> Option<DisplayEvent> {
        unsafe {
            match event.get_type() {
                ClientMessage => {
                    let message = XClientMessageEvent::from(*event);
                    if message.data.get_long(0) as Atom == self.wm_delete_window {
                        Some(DisplayEvent::CloseRequested)
                    } else {
                        None
                    }
                }
                DestroyNotify => Some(DisplayEvent::CloseRequested),
                other => {
                    trace!("X11DisplayDriver: Ignoring event type {}", other);
                    None
                }
            }
        }
    }

    fn handle_present(&mut self, frame: DisplayFrame) -> Result<DriverResponse, DisplayError> {
        trace!("X11DisplayDriver: Presenting frame");

        if frame.width_px != self.width_px || frame.height_px != self.height_px {
            let reason = format!(
                "frame is {}x{}, window is {}x{}",
                frame.width_px, frame.height_px, self.width_px, self.height_px
            );
            return Err(DisplayError::PresentationFailed(frame, reason));
        }

        unsafe {
            // XImage borrows the frame's pixels; they are detached again below.
            let image = XCreateImage(
                self.display,
                self.visual,
                self.depth,
                ZPixmap,
                0,
                frame.pixels.as_ptr() as *mut c_char,
                frame.width_px,
                frame.height_px,
                32, // bitmap_pad
                frame.stride() as c_int,
            );

            if image.is_null() {
                return Err(DisplayError::PresentationFailed(
                    frame,
                    "Failed to create XImage".to_string(),
                ));
            }

            XPutImage(
                self.display,
                self.window,
                self.gc,
                image,
                0,
                0,
                0,
                0,
                frame.width_px,
                frame.height_px,
            );

            // Don't let XDestroyImage free memory we still own.
            (*image).data = ptr::null_mut();
            XDestroyImage(image);

            XFlush(self.display);
        }

        Ok(DriverResponse::PresentComplete(frame))
    }

    fn store_title(&mut self, title: &str) -> Result<()> {
        let c_title = CString::new(title).context("Window title contains a NUL byte")?;
        unsafe {
            XStoreName(self.display, self.window, c_title.as_ptr());
            XFlush(self.display);
        }
        debug!("X11DisplayDriver: Title set to '{}'", title);
        Ok(())
    }
}

impl Drop for X11DisplayDriver {
    fn drop(&mut self) {
        info!("X11DisplayDriver::drop() - Cleaning up");
        unsafe {
            if !self.gc.is_null() {
                XFreeGC(self.display, self.gc);
            }
            if self.window != 0 {
                XDestroyWindow(self.display, self.window);
            }
            if !self.display.is_null() {
                XCloseDisplay(self.display);
            }
        }
        info!("X11DisplayDriver::drop() - Cleanup complete");
    }
}
