//! # Jiggler Core
//!
//! Platform-agnostic core logic for a USB mouse jiggler: a quarter-wave
//! sine generator drives tiny relative motion reports, and a dispatcher
//! feeds them to whatever USB stack implements [`UsbTransport`].
//!
//! - [`waveform`]: phase accumulator and quarter-wave sine synthesis
//! - [`report`]: boot mouse report layout and HID descriptor
//! - [`transport`]: the seam between dispatch logic and a USB stack
//! - [`jiggler`]: ties generator, report and transport together
//!
//! ## Example
//!
//! ```rust
//! use jiggler_core::{Jiggler, TransportError, UsbTransport, REPORT_LEN};
//!
//! struct LoopbackUsb {
//!     last: Option<[u8; REPORT_LEN]>,
//! }
//!
//! impl UsbTransport for LoopbackUsb {
//!     fn poll(&mut self) {}
//!     fn interrupt_ready(&self) -> bool {
//!         true
//!     }
//!     fn send_report(&mut self, raw: &[u8; REPORT_LEN]) -> Result<(), TransportError> {
//!         self.last = Some(*raw);
//!         Ok(())
//!     }
//! }
//!
//! let mut jiggler = Jiggler::new();
//! let mut usb = LoopbackUsb { last: None };
//!
//! jiggler.on_tick();
//! assert_eq!(jiggler.service(&mut usb), Ok(true));
//! assert!(usb.last.is_some());
//! ```
//!
//! ## Features
//!
//! - `std`: enables std for host-side testing
//! - `defmt`: derives `defmt::Format` on public types for embedded logging
//!
//! This crate is `no_std` by default for embedded targets.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod jiggler;
pub mod report;
pub mod transport;
pub mod waveform;

pub use jiggler::Jiggler;
pub use report::{MouseReport, BOOT_MOUSE_REPORT_DESCRIPTOR, REPORT_LEN};
pub use transport::{TransportError, UsbTransport};
pub use waveform::WaveformGenerator;
