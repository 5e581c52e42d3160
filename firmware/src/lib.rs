//! USB mouse jiggler firmware for RP2040.
//!
//! This crate provides the embedded implementation of a mouse jiggler
//! that sweeps the pointer in a small circle and outputs it as USB HID.

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("features `dev-panic` and `prod-panic` are mutually exclusive");

// Re-export core types for convenience
pub use jiggler_core::{
    Jiggler, MouseReport, TransportError, UsbTransport, WaveformGenerator,
    BOOT_MOUSE_REPORT_DESCRIPTOR, REPORT_LEN,
};

pub mod usb;

pub use usb::{configure_usb_hid, current_report, publish_report, JigglerRequestHandler, UsbHidMouse};
