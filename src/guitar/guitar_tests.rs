#[cfg(test)]
mod tests {
    use crate::guitar::guitar::{parameters_for, StringTimbre, STRING_BANDS};

    #[test]
    fn test_band_boundaries_belong_to_upper_band() {
        assert!(parameters_for(119.99).is_low_string);
        assert!(!parameters_for(120.0).is_low_string);
        assert_eq!(parameters_for(179.99), StringTimbre::wound());
        assert_eq!(parameters_for(180.0), StringTimbre::middle());
        assert_eq!(parameters_for(249.99), StringTimbre::middle());
        assert_eq!(parameters_for(250.0), StringTimbre::treble());
    }

    #[test]
    fn test_parameters_are_total() {
        for frequency in [0.0, -5.0, 1.0e6, f32::INFINITY, f32::NAN] {
            let _ = parameters_for(frequency);
        }
        assert_eq!(parameters_for(f32::NAN), StringTimbre::treble());
        assert_eq!(parameters_for(0.0), StringTimbre::low_e());
    }

    #[test]
    fn test_bands_are_monotonic() {
        for pair in STRING_BANDS.windows(2) {
            let (lower_bound, lower) = pair[0];
            let (upper_bound, upper) = pair[1];
            assert!(lower_bound < upper_bound);
            assert!(lower.decay_rate < upper.decay_rate, "lower strings ring longer");
            assert!(lower.body_resonance < upper.body_resonance, "lower strings are warmer");
            assert!(lower.volume > upper.volume, "lower strings are louder");
        }
    }

    #[test]
    fn test_open_strings() {
        // E2, A2, D3, G3, B3, E4
        assert!(parameters_for(82.41).is_low_string);
        assert!(parameters_for(110.0).is_low_string);
        assert_eq!(parameters_for(146.83), StringTimbre::wound());
        assert_eq!(parameters_for(196.0), StringTimbre::middle());
        assert_eq!(parameters_for(246.94), StringTimbre::middle());
        assert_eq!(parameters_for(329.63), StringTimbre::treble());
    }
}
