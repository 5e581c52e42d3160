//! Quarter-wave sine synthesis for the jiggle motion.
//!
//! The full 256-step cycle is folded into a 64-entry table holding one
//! quadrant of a sine wave. The top two bits of the phase select the
//! quadrant: bit 7 is the sign of the output, bit 6 mirrors the table
//! index so the wave ramps back down. Storing one quadrant instead of a
//! full cycle keeps the table small enough for the tightest targets.

/// One quadrant of `sin`, scaled to `0..=0x7F` across 64 steps.
///
/// Entry `i` is `round(sin(i / 64 * pi / 2) * 127)`. The table never
/// decreases, starts at zero and ends at the full amplitude.
pub const QUARTER_WAVE: [u8; 64] = [
    0x00, 0x03, 0x06, 0x09, 0x0C, 0x0F, 0x12, 0x15,
    0x18, 0x1C, 0x1F, 0x22, 0x25, 0x28, 0x2B, 0x2E,
    0x30, 0x33, 0x36, 0x39, 0x3C, 0x3F, 0x41, 0x44,
    0x47, 0x49, 0x4C, 0x4E, 0x51, 0x53, 0x55, 0x58,
    0x5A, 0x5C, 0x5E, 0x60, 0x62, 0x64, 0x66, 0x68,
    0x6A, 0x6C, 0x6D, 0x6F, 0x70, 0x72, 0x73, 0x74,
    0x76, 0x77, 0x78, 0x79, 0x7A, 0x7B, 0x7C, 0x7C,
    0x7D, 0x7E, 0x7E, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F,
];

/// Right shift applied to table values, scaling the amplitude from
/// `0..=127` down to `0..=7` counts per report.
pub const MAGNITUDE_SHIFT: u32 = 4;

/// Phase lead of the Y axis over X, in ticks. A quarter cycle apart,
/// the two axes trace a closed loop instead of a diagonal line.
pub const QUADRATURE_OFFSET: u8 = 64;

/// Signed displacement for one axis at the given phase.
///
/// Bit 7 of the phase picks the sign, bit 6 mirrors the quadrant, and
/// the low six bits index [`QUARTER_WAVE`]. The magnitude is shifted
/// down while still unsigned and only then negated, so the result is
/// exactly `-7..=7`.
#[inline]
#[must_use]
pub const fn displacement(phase: u8) -> i8 {
    let index = if phase & 0x40 != 0 {
        0x3F - (phase & 0x3F)
    } else {
        phase & 0x3F
    };
    let magnitude = (QUARTER_WAVE[index as usize] >> MAGNITUDE_SHIFT) as i8;
    if phase & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// The (X, Y) displacement pair at the given phase.
///
/// Y runs [`QUADRATURE_OFFSET`] ticks ahead of X, so the pointer sweeps
/// a small circle once per 256 ticks.
#[inline]
#[must_use]
pub const fn sample(phase: u8) -> (i8, i8) {
    (
        displacement(phase),
        displacement(phase.wrapping_add(QUADRATURE_OFFSET)),
    )
}

/// Free-running phase accumulator for the jiggle waveform.
///
/// Each call to [`tick`](Self::tick) advances the phase by one step and
/// returns the sample at the new position. The phase wraps at 256, so
/// the motion repeats indefinitely and an entire cycle nets out to zero
/// displacement on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveformGenerator {
    phase: u8,
}

impl WaveformGenerator {
    /// A generator at phase zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    /// Advance one step and return the (X, Y) sample at the new phase.
    pub fn tick(&mut self) -> (i8, i8) {
        self.phase = self.phase.wrapping_add(1);
        sample(self.phase)
    }

    /// Current phase, mostly useful for diagnostics.
    #[must_use]
    pub const fn phase(&self) -> u8 {
        self.phase
    }
}

impl Default for WaveformGenerator {
    fn default() -> Self {
        Self::new()
    }
}
