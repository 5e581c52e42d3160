//! Transport abstraction over the USB device stack.
//!
//! The core never talks to hardware directly. It drives anything that
//! can poll a USB bus and push an interrupt IN report, which keeps the
//! dispatch logic testable on the host with a mock.

use crate::report::REPORT_LEN;

/// Errors surfaced by a [`UsbTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The interrupt endpoint was claimed by someone else between the
    /// readiness check and the write.
    Busy,
    /// The bus rejected the transfer.
    Io,
}

/// A USB device stack able to carry interrupt IN reports.
pub trait UsbTransport {
    /// Service the USB stack. Must be called often from the main loop;
    /// implementations handle enumeration and control traffic here.
    fn poll(&mut self);

    /// True when the interrupt IN endpoint can accept a new report.
    fn interrupt_ready(&self) -> bool;

    /// Hand one report to the interrupt IN endpoint.
    ///
    /// Callers check [`interrupt_ready`](Self::interrupt_ready) first;
    /// a transfer can still fail if the bus state changes in between.
    fn send_report(&mut self, raw: &[u8; REPORT_LEN]) -> Result<(), TransportError>;
}
