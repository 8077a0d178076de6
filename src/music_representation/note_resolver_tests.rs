#[cfg(test)]
mod tests {
    use crate::music_representation::note_resolver::{
        is_valid_note_name, parse_note, pitch_class, resolve, ParsedNote, MAX_OCTAVE,
    };

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {} Hz, got {} Hz",
            expected,
            actual
        );
    }

    #[test]
    fn test_reference_pitches() {
        assert_close(resolve("A4"), 440.0);
        assert_close(resolve("C4"), 261.63);
        assert_close(resolve("E2"), 82.41);
        assert_close(resolve("A3"), 220.0);
    }

    #[test]
    fn test_default_octave_is_four() {
        assert_eq!(resolve("A"), resolve("A4"));
        assert_eq!(
            parse_note("G"),
            Some(ParsedNote {
                pitch_class: 7,
                octave: 4
            })
        );
    }

    #[test]
    fn test_enharmonic_equivalence() {
        assert_eq!(resolve("C#4"), resolve("Db4"));
        assert_eq!(resolve("F#3"), resolve("Gb3"));
        assert_eq!(resolve("E#4"), resolve("F4"));
        assert_eq!(resolve("Fb4"), resolve("E4"));
    }

    #[test]
    fn test_wrapping_spellings_stay_in_octave() {
        assert_eq!(resolve("B#4"), resolve("C4"));
        assert_eq!(resolve("Cb4"), resolve("B4"));
    }

    #[test]
    fn test_double_accidentals() {
        assert_eq!(resolve("Dbb4"), resolve("C4"));
        assert_eq!(resolve("C##4"), resolve("D4"));
        assert_eq!(resolve("Cbb4"), resolve("Bb4"));
        assert_eq!(resolve("B##3"), resolve("C#3"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for name in ["C4", "Eb3", "G##2", "Abb5", "B"] {
            assert_eq!(resolve(name), resolve(name));
        }
    }

    #[test]
    fn test_unrecognized_names_fall_back_to_c4() {
        let c4 = resolve("C4");
        assert_eq!(resolve("X"), c4);
        assert_eq!(resolve("H#2"), c4);
        assert_eq!(resolve(""), c4);
        assert_eq!(resolve("c4"), c4);
    }

    #[test]
    fn test_stray_characters_are_ignored() {
        assert_eq!(resolve(" A4 "), resolve("A4"));
        assert_eq!(resolve("C#-4"), resolve("C#4"));
    }

    #[test]
    fn test_pitch_class_ignores_octave() {
        assert_eq!(pitch_class("Eb2"), Some(3));
        assert_eq!(pitch_class("Eb5"), Some(3));
        assert_eq!(pitch_class("Y"), None);
    }

    #[test]
    fn test_surface_format() {
        for name in ["C", "C4", "C#4", "Dbb", "G##2", "Bb0"] {
            assert!(is_valid_note_name(name), "{} should be valid", name);
        }
        for name in ["c4", "C###", "Cb#", "C10", "H", "C#b4", ""] {
            assert!(!is_valid_note_name(name), "{} should be invalid", name);
        }
    }

    #[test]
    fn test_out_of_range_octaves_fall_back_to_c4() {
        let c4 = resolve("C4");
        assert_eq!(resolve("C999999999"), c4);
        assert_eq!(resolve("A99999999999999999999"), c4);
        assert_eq!(resolve("G11"), c4);
        assert_eq!(parse_note("C999999999"), None);

        let highest = parse_note(&format!("B{}", MAX_OCTAVE)).unwrap();
        assert_eq!(highest.octave, MAX_OCTAVE);
        assert!(highest.frequency().is_finite());
    }
}
