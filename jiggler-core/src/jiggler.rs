//! Ties the waveform generator to a USB transport.
//!
//! [`Jiggler`] owns all mutable state of the device: the phase
//! accumulator, the current report and the ready flag. The periodic
//! tick refreshes the report and raises the flag; the main-loop service
//! pass claims the flag and hands the report to the transport. Keeping
//! both sides behind `&mut self` makes the tick/dispatch interleaving
//! explicit instead of relying on shared statics.

use crate::report::{MouseReport, REPORT_LEN};
use crate::transport::{TransportError, UsbTransport};
use crate::waveform::WaveformGenerator;

/// The jiggler state machine: waveform, current report, ready flag.
#[derive(Clone, Copy, Debug)]
pub struct Jiggler {
    wave: WaveformGenerator,
    report: MouseReport,
    ready: bool,
}

impl Jiggler {
    /// A jiggler at phase zero holding the startup report. Nothing is
    /// marked ready until the first tick.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            wave: WaveformGenerator::new(),
            report: MouseReport::startup(),
            ready: false,
        }
    }

    /// Advance the waveform one step and stage the new sample.
    ///
    /// Called from the periodic tick. Overwrites any still-unsent
    /// report, so under backpressure the freshest sample wins and
    /// stale motion is never replayed.
    pub fn on_tick(&mut self) -> MouseReport {
        let (x, y) = self.wave.tick();
        self.report.x = x;
        self.report.y = y;
        self.ready = true;
        self.report
    }

    /// One main-loop pass: service the bus, then try to dispatch.
    pub fn service<T: UsbTransport>(&mut self, usb: &mut T) -> Result<bool, TransportError> {
        usb.poll();
        self.try_send(usb)
    }

    /// Send the staged report if one is ready and the endpoint is free.
    ///
    /// Returns `Ok(true)` when a report went out. The ready flag is
    /// cleared only once both conditions hold, so a busy endpoint
    /// leaves the sample staged for the next pass. A transport error
    /// drops the claimed sample; the next tick supersedes it anyway.
    pub fn try_send<T: UsbTransport>(&mut self, usb: &mut T) -> Result<bool, TransportError> {
        if !(self.ready && usb.interrupt_ready()) {
            return Ok(false);
        }
        self.ready = false;
        usb.send_report(&self.report.to_bytes())?;
        Ok(true)
    }

    /// Answer a host control query for the current input report.
    ///
    /// Fills `buf` with the wire bytes and returns the length, or
    /// `None` if `buf` cannot hold a full report. Reads the report
    /// regardless of the ready flag and changes no state, so a control
    /// query never swallows a pending interrupt transfer.
    pub fn get_report(&self, buf: &mut [u8]) -> Option<usize> {
        if buf.len() < REPORT_LEN {
            return None;
        }
        buf[..REPORT_LEN].copy_from_slice(&self.report.to_bytes());
        Some(REPORT_LEN)
    }

    /// The report most recently staged (or the startup report).
    #[must_use]
    pub const fn report(&self) -> MouseReport {
        self.report
    }

    /// True while a staged report awaits dispatch.
    #[must_use]
    pub const fn pending(&self) -> bool {
        self.ready
    }

    /// Current waveform phase.
    #[must_use]
    pub const fn phase(&self) -> u8 {
        self.wave.phase()
    }
}

impl Default for Jiggler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::waveform;

    struct MockUsb {
        endpoint_free: bool,
        fail_sends: bool,
        polls: usize,
        sent: Vec<[u8; REPORT_LEN]>,
    }

    impl MockUsb {
        fn new() -> Self {
            Self {
                endpoint_free: true,
                fail_sends: false,
                polls: 0,
                sent: Vec::new(),
            }
        }
    }

    impl UsbTransport for MockUsb {
        fn poll(&mut self) {
            self.polls += 1;
        }

        fn interrupt_ready(&self) -> bool {
            self.endpoint_free
        }

        fn send_report(&mut self, raw: &[u8; REPORT_LEN]) -> Result<(), TransportError> {
            if self.fail_sends {
                return Err(TransportError::Io);
            }
            self.sent.push(*raw);
            Ok(())
        }
    }

    #[test]
    fn startup_report_visible_before_first_tick() {
        let jiggler = Jiggler::new();
        let mut buf = [0u8; REPORT_LEN];
        assert_eq!(jiggler.get_report(&mut buf), Some(REPORT_LEN));
        assert_eq!(buf, [0x00, 0x01, 0x01]);
        assert!(!jiggler.pending());
    }

    #[test]
    fn nothing_is_sent_without_a_fresh_sample() {
        let mut jiggler = Jiggler::new();
        let mut usb = MockUsb::new();
        assert_eq!(jiggler.service(&mut usb), Ok(false));
        assert!(usb.sent.is_empty());
    }

    #[test]
    fn each_sample_is_sent_exactly_once() {
        let mut jiggler = Jiggler::new();
        let mut usb = MockUsb::new();
        let report = jiggler.on_tick();
        assert_eq!(jiggler.service(&mut usb), Ok(true));
        assert_eq!(usb.sent, vec![report.to_bytes()]);
        // the claimed sample must not go out again
        assert_eq!(jiggler.service(&mut usb), Ok(false));
        assert_eq!(usb.sent.len(), 1);
    }

    #[test]
    fn busy_endpoint_defers_without_losing_the_sample() {
        let mut jiggler = Jiggler::new();
        let mut usb = MockUsb::new();
        usb.endpoint_free = false;
        jiggler.on_tick();
        assert_eq!(jiggler.service(&mut usb), Ok(false));
        assert!(usb.sent.is_empty());
        assert!(jiggler.pending());
        usb.endpoint_free = true;
        assert_eq!(jiggler.service(&mut usb), Ok(true));
        assert_eq!(usb.sent.len(), 1);
    }

    #[test]
    fn backpressure_coalesces_to_the_newest_sample() {
        let mut jiggler = Jiggler::new();
        let mut usb = MockUsb::new();
        usb.endpoint_free = false;
        jiggler.on_tick();
        jiggler.on_tick();
        jiggler.on_tick();
        usb.endpoint_free = true;
        assert_eq!(jiggler.service(&mut usb), Ok(true));
        let (x, y) = waveform::sample(3);
        assert_eq!(usb.sent, vec![[0x00, x as u8, y as u8]]);
    }

    #[test]
    fn poll_runs_on_every_service_pass() {
        let mut jiggler = Jiggler::new();
        let mut usb = MockUsb::new();
        for _ in 0..5 {
            let _ = jiggler.service(&mut usb);
        }
        assert_eq!(usb.polls, 5);
    }

    #[test]
    fn failed_send_drops_the_claimed_sample() {
        let mut jiggler = Jiggler::new();
        let mut usb = MockUsb::new();
        usb.fail_sends = true;
        jiggler.on_tick();
        assert_eq!(jiggler.service(&mut usb), Err(TransportError::Io));
        assert!(!jiggler.pending());
        usb.fail_sends = false;
        assert_eq!(jiggler.service(&mut usb), Ok(false));
        assert!(usb.sent.is_empty());
    }

    #[test]
    fn sixty_fourth_tick_puts_x_at_the_crest() {
        let mut jiggler = Jiggler::new();
        for _ in 0..64 {
            jiggler.on_tick();
        }
        let mut buf = [0u8; REPORT_LEN];
        assert_eq!(jiggler.get_report(&mut buf), Some(REPORT_LEN));
        assert_eq!(buf, [0x00, 0x07, 0x00]);
    }

    #[test]
    fn control_query_ignores_the_ready_flag() {
        let mut jiggler = Jiggler::new();
        let mut usb = MockUsb::new();
        jiggler.on_tick();

        let mut before = [0u8; REPORT_LEN];
        jiggler.get_report(&mut before).unwrap();
        assert!(jiggler.pending());

        // claiming the flag must not change what the host sees
        jiggler.service(&mut usb).unwrap();
        let mut after = [0u8; REPORT_LEN];
        jiggler.get_report(&mut after).unwrap();
        assert!(!jiggler.pending());
        assert_eq!(before, after);
    }

    #[test]
    fn control_query_has_no_side_effects() {
        let mut jiggler = Jiggler::new();
        jiggler.on_tick();
        let phase = jiggler.phase();
        let mut buf = [0u8; REPORT_LEN];
        assert_eq!(jiggler.get_report(&mut buf), Some(REPORT_LEN));
        assert_eq!(jiggler.get_report(&mut buf), Some(REPORT_LEN));
        assert_eq!(jiggler.phase(), phase);
        assert!(jiggler.pending());
    }

    #[test]
    fn undersized_query_buffer_is_not_handled() {
        let jiggler = Jiggler::new();
        let mut buf = [0u8; REPORT_LEN - 1];
        assert_eq!(jiggler.get_report(&mut buf), None);
    }

    #[test]
    fn buttons_stay_released_forever() {
        let mut jiggler = Jiggler::new();
        for _ in 0..512 {
            let report = jiggler.on_tick();
            assert_eq!(report.to_bytes()[0], 0x00);
        }
    }
}
