//! USB HID boot mouse output and control-request handling.

use defmt::debug;
use embassy_usb::class::hid::{HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::driver::EndpointError;
use embassy_usb::Builder;
use jiggler_core::{MouseReport, TransportError, BOOT_MOUSE_REPORT_DESCRIPTOR, REPORT_LEN};
use portable_atomic::{AtomicU32, Ordering};

/// The report most recently staged by the tick task, packed into one
/// word so control requests read it without tearing. Initialized to
/// the startup report so queries before the first tick get an answer.
static CURRENT_REPORT: AtomicU32 = AtomicU32::new(pack_report(&MouseReport::startup()));

const fn pack_report(report: &MouseReport) -> u32 {
    let raw = report.to_bytes();
    u32::from_le_bytes([raw[0], raw[1], raw[2], 0])
}

/// Publish a report for control requests to read. Called by the tick
/// task alongside signaling the dispatch task.
pub fn publish_report(report: &MouseReport) {
    CURRENT_REPORT.store(pack_report(report), Ordering::Relaxed);
}

/// The report most recently published.
pub fn current_report() -> [u8; REPORT_LEN] {
    let raw = CURRENT_REPORT.load(Ordering::Relaxed).to_le_bytes();
    [raw[0], raw[1], raw[2]]
}

/// USB HID boot mouse output.
///
/// Wraps an embassy-usb HID writer to send mouse reports.
pub struct UsbHidMouse<'d> {
    writer: HidWriter<'d, embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>, 8>,
    ready: bool,
}

impl<'d> UsbHidMouse<'d> {
    /// Create a new USB HID mouse output from the given HID writer.
    pub fn new(
        writer: HidWriter<'d, embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>, 8>,
    ) -> Self {
        Self {
            writer,
            ready: false,
        }
    }

    /// Wait until the interrupt endpoint can accept a report. The
    /// first wait completes once the host has enumerated the device.
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
        self.ready = true;
    }

    /// Send one report over the interrupt IN endpoint.
    pub async fn send(&mut self, report: &MouseReport) -> Result<(), TransportError> {
        self.writer
            .write(&report.to_bytes())
            .await
            .map_err(|e| match e {
                EndpointError::Disabled => TransportError::Busy,
                _ => TransportError::Io,
            })
    }

    /// True once the device has enumerated.
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

/// HID request handler answering control-pipe report queries.
///
/// GET_REPORT for the input report returns the current report bytes.
/// Everything else is left unhandled; the device declares no output or
/// feature reports.
pub struct JigglerRequestHandler;

impl RequestHandler for JigglerRequestHandler {
    fn get_report(&mut self, id: ReportId, buf: &mut [u8]) -> Option<usize> {
        match id {
            ReportId::In(_) => {
                let raw = current_report();
                if buf.len() < raw.len() {
                    return None;
                }
                buf[..raw.len()].copy_from_slice(&raw);
                debug!("GET_REPORT answered: {:?}", raw);
                Some(raw.len())
            }
            _ => None,
        }
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Rejected
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Declares a boot-protocol mouse so BIOS/UEFI hosts can use the
/// device without parsing the report descriptor. Returns the HID
/// writer for use by the dispatch task.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>>,
    state: &'d mut State<'d>,
    request_handler: &'d mut dyn RequestHandler,
) -> HidWriter<'d, embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>, 8> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: BOOT_MOUSE_REPORT_DESCRIPTOR,
        request_handler: Some(request_handler),
        poll_ms: 10,
        max_packet_size: 8,
        hid_subclass: embassy_usb::class::hid::HidSubclass::Boot,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::Mouse,
    };

    embassy_usb::class::hid::HidWriter::new(builder, state, config)
}
