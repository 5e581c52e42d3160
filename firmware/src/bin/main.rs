#![no_std]
#![no_main]

use defmt::{error, info, Format};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;
use usb_jiggler::{
    configure_usb_hid, publish_report, Jiggler, JigglerRequestHandler, MouseReport, UsbHidMouse,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Signal for passing fresh reports from the tick task to dispatch.
/// Using Signal instead of Channel provides "latest value wins" semantics:
/// while the interrupt endpoint is busy, newer samples overwrite older ones
/// and stale motion is never replayed.
static REPORT_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, MouseReport>> = StaticCell::new();

/// USB device configuration buffers.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

/// Control request handler, answering GET_REPORT from the report mirror.
static REQUEST_HANDLER: StaticCell<JigglerRequestHandler> = StaticCell::new();

/// Waveform tick rate, selected by the rate jumper at boot.
///
/// At 256 ticks per cycle the pointer sweeps one full circle every
/// ~5.6 s (slow) or ~1.4 s (fast).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Format)]
enum TickRate {
    /// About 46 ticks per second.
    Slow,
    /// About 183 ticks per second.
    Fast,
}

impl TickRate {
    const fn hz(self) -> u64 {
        match self {
            TickRate::Slow => 46,
            TickRate::Fast => 183,
        }
    }

    const fn period(self) -> Duration {
        Duration::from_hz(self.hz())
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("USB jiggler starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // Initialize the report signal (latest-value semantics)
    let signal = REPORT_SIGNAL.init(Signal::new());

    // --- Tick Rate Jumper ---
    // Strap GPIO 22 to ground for the slow sweep. Sampled once at boot.
    let jumper = Input::new(p.PIN_22, Pull::Up);
    let rate = if jumper.is_low() {
        TickRate::Slow
    } else {
        TickRate::Fast
    };
    info!("Tick rate: {} ({} Hz)", rate, rate.hz());

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Rust Jiggler");
    usb_config.product = Some("USB Mouse Jiggler");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let request_handler = REQUEST_HANDLER.init(JigglerRequestHandler);
    let hid_writer = configure_usb_hid(&mut builder, hid_state, request_handler);

    // Build the USB device
    let usb_device = builder.build();

    // Create output
    let usb_output = UsbHidMouse::new(hid_writer);

    // On-board LED (Pico): solid once enumerated, toggles on dispatch errors
    let led = Output::new(p.PIN_25, Level::Low);

    spawner.spawn(usb_task(usb_device)).unwrap();
    spawner.spawn(tick_task(rate, signal)).unwrap();
    spawner.spawn(dispatch_task(usb_output, signal, led)).unwrap();

    info!("USB jiggler initialized");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Tick task - the periodic heartbeat. Advances the waveform and
/// signals the latest report.
#[embassy_executor::task]
async fn tick_task(
    rate: TickRate,
    signal: &'static Signal<CriticalSectionRawMutex, MouseReport>,
) {
    let mut jiggler = Jiggler::new();
    let mut ticker = Ticker::every(rate.period());
    loop {
        ticker.next().await;
        let report = jiggler.on_tick();
        // Mirror the report for control queries, then hand it to dispatch
        // (overwrites any still-pending value)
        publish_report(&report);
        signal.signal(report);
    }
}

/// Dispatch task - forwards the freshest report to the interrupt endpoint.
#[embassy_executor::task]
async fn dispatch_task(
    mut output: UsbHidMouse<'static>,
    signal: &'static Signal<CriticalSectionRawMutex, MouseReport>,
    mut led: Output<'static>,
) {
    // Wait for USB to be ready
    output.wait_ready().await;
    led.set_high();
    info!("USB HID ready, jiggling the pointer...");

    loop {
        // Claim a sample only once the endpoint can take it, so the
        // signal keeps coalescing to the freshest report in between.
        output.wait_ready().await;
        let report = signal.wait().await;
        if let Err(e) = output.send(&report).await {
            error!("Dispatch error: {:?}", e);
            led.toggle();
        }
    }
}
