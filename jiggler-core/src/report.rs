//! Boot-protocol mouse report layout and its HID descriptor.

/// Length of one boot mouse input report on the wire.
pub const REPORT_LEN: usize = 3;

/// One boot-protocol mouse input report.
///
/// Wire layout is three bytes: button bits, then X and Y displacement
/// as two's-complement signed bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Button states in the low three bits: bit 0 left, bit 1 right,
    /// bit 2 middle. Bits 3..=7 are declared constant padding by the
    /// descriptor and must stay zero.
    pub buttons: u8,
    /// Relative X displacement since the previous report.
    pub x: i8,
    /// Relative Y displacement since the previous report.
    pub y: i8,
}

impl MouseReport {
    /// The power-on report: no buttons, one count of motion on each
    /// axis. Answers host queries that arrive before the first tick.
    #[must_use]
    pub const fn startup() -> Self {
        Self {
            buttons: 0,
            x: 1,
            y: 1,
        }
    }

    /// Serialize to the wire layout.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; REPORT_LEN] {
        [self.buttons, self.x as u8, self.y as u8]
    }

    /// Rebuild a report from its wire bytes.
    #[must_use]
    pub const fn from_bytes(raw: [u8; REPORT_LEN]) -> Self {
        Self {
            buttons: raw[0],
            x: raw[1] as i8,
            y: raw[2] as i8,
        }
    }
}

/// HID report descriptor for a 3-button boot-protocol mouse.
///
/// Declares exactly the layout [`MouseReport::to_bytes`] produces:
/// three button bits, five bits of constant padding, then two relative
/// 8-bit axes in the range -127..=127.
#[rustfmt::skip]
pub const BOOT_MOUSE_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    0x05, 0x09, //     Usage Page (Buttons)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x03, //     Usage Maximum (Button 3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x03, //     Input (Constant, Variable, Absolute), padding
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x02, //     Report Count (2)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    0xC0,       //   End Collection (Physical)
    0xC0,       // End Collection (Application)
];

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn wire_layout_is_buttons_then_signed_axes() {
        let report = MouseReport {
            buttons: 0,
            x: 7,
            y: -5,
        };
        assert_eq!(report.to_bytes(), [0x00, 0x07, 0xFB]);
    }

    #[test]
    fn startup_report_moves_one_count_on_each_axis() {
        assert_eq!(MouseReport::startup().to_bytes(), [0x00, 0x01, 0x01]);
    }

    #[test]
    fn round_trips_through_wire_bytes() {
        let report = MouseReport {
            buttons: 0x05,
            x: -128,
            y: 127,
        };
        assert_eq!(MouseReport::from_bytes(report.to_bytes()), report);
    }

    #[test]
    fn descriptor_declares_three_buttons_and_relative_axes() {
        let d = BOOT_MOUSE_REPORT_DESCRIPTOR;
        assert_eq!(d.len(), 50);
        // Generic Desktop / Mouse application collection
        assert_eq!(&d[..6], &[0x05, 0x01, 0x09, 0x02, 0xA1, 0x01]);
        // buttons 1..=3
        assert!(contains(d, &[0x19, 0x01, 0x29, 0x03]));
        // three data bits plus five bits of padding fill the first byte
        assert!(contains(d, &[0x95, 0x03, 0x75, 0x01]));
        assert!(contains(d, &[0x95, 0x01, 0x75, 0x05]));
        // signed axes, -127..=127, relative
        assert!(contains(d, &[0x15, 0x81, 0x25, 0x7F]));
        assert!(contains(d, &[0x81, 0x06]));
        // both collections closed
        assert_eq!(&d[d.len() - 2..], &[0xC0, 0xC0]);
    }

    #[test]
    fn descriptor_matches_report_len() {
        // 3 button bits + 5 padding bits + two 8-bit axes
        let bits: usize = 3 + 5 + 2 * 8;
        assert_eq!(bits / 8, REPORT_LEN);
    }
}
