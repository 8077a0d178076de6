// guitar.rs

/// Timbre of one string band. Lower bands ring longer, sound warmer and
/// sit louder in the mix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StringTimbre {
    /// Feedback gain applied on every pass through the delay line.
    pub damping: f32,
    /// Weight of the current cell in the two-point average (higher = brighter).
    pub brightness: f32,
    pub decay_rate: f32,
    /// Cutoff of the body resonance low-pass in Hz.
    pub body_resonance: f32,
    pub resonance_q: f32,
    pub volume: f32,
    pub is_low_string: bool,
}

impl StringTimbre {
    pub const fn low_e() -> Self {
        Self {
            damping: 0.996,
            brightness: 0.35,
            decay_rate: 0.8,
            body_resonance: 2000.0,
            resonance_q: 1.4,
            volume: 0.9,
            is_low_string: true,
        }
    }

    pub const fn wound() -> Self {
        Self {
            damping: 0.995,
            brightness: 0.42,
            decay_rate: 1.1,
            body_resonance: 2600.0,
            resonance_q: 1.2,
            volume: 0.8,
            is_low_string: false,
        }
    }

    pub const fn middle() -> Self {
        Self {
            damping: 0.994,
            brightness: 0.5,
            decay_rate: 1.5,
            body_resonance: 3200.0,
            resonance_q: 1.0,
            volume: 0.7,
            is_low_string: false,
        }
    }

    pub const fn treble() -> Self {
        Self {
            damping: 0.992,
            brightness: 0.58,
            decay_rate: 2.0,
            body_resonance: 4000.0,
            resonance_q: 0.8,
            volume: 0.6,
            is_low_string: false,
        }
    }
}

/// Frequency bands as (exclusive upper bound in Hz, timbre), in ascending order.
pub const STRING_BANDS: [(f32, StringTimbre); 4] = [
    (120.0, StringTimbre::low_e()),
    (180.0, StringTimbre::wound()),
    (250.0, StringTimbre::middle()),
    (f32::INFINITY, StringTimbre::treble()),
];

/// Timbre for a fundamental frequency. Total: anything above the last finite
/// bound (or NaN) gets the treble band.
pub fn parameters_for(frequency: f32) -> StringTimbre {
    STRING_BANDS
        .iter()
        .find(|(upper, _)| frequency < *upper)
        .map(|(_, timbre)| *timbre)
        .unwrap_or(StringTimbre::treble())
}
