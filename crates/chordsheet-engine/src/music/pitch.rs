use super::chord::Quality;

/// A pitch class 0–11, C = 0.
///
/// Spelling (C# vs Db) is not part of the value; it is chosen at render time
/// from the sharp/flat preference of the surrounding key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

/// Semitone offsets of the natural notes A–G from C.
const NATURAL_SEMITONES: [(char, u8); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

impl PitchClass {
    /// Builds a pitch class from a root letter and accidental offset.
    ///
    /// `accidental` is +1 for `#`, -1 for `b`, 0 for natural.
    pub fn from_letter(letter: char, accidental: i8) -> Option<PitchClass> {
        let base = NATURAL_SEMITONES
            .iter()
            .find(|(l, _)| *l == letter.to_ascii_uppercase())
            .map(|(_, s)| *s)?;
        Some(PitchClass(
            (base as i8 + accidental).rem_euclid(12) as u8,
        ))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Shifts by `semitones` (any sign, any magnitude), wrapping mod 12.
    #[must_use]
    pub fn transposed(self, semitones: i32) -> PitchClass {
        PitchClass((self.0 as i32 + semitones).rem_euclid(12) as u8)
    }

    /// Spells the pitch class with the given accidental preference.
    pub fn spell(self, prefer_sharps: bool) -> &'static str {
        if prefer_sharps {
            SHARP_NAMES[self.0 as usize]
        } else {
            FLAT_NAMES[self.0 as usize]
        }
    }
}

/// Triad qualities of the major scale degrees, indexed by semitone offset
/// from the tonic. `None` marks chromatic steps.
const MAJOR_DEGREES: [Option<Quality>; 12] = [
    Some(Quality::Major),      // I
    None,
    Some(Quality::Minor),      // ii
    None,
    Some(Quality::Minor),      // iii
    Some(Quality::Major),      // IV
    None,
    Some(Quality::Major),      // V
    None,
    Some(Quality::Minor),      // vi
    None,
    Some(Quality::Diminished), // vii°
];

/// Same for the natural minor scale.
const MINOR_DEGREES: [Option<Quality>; 12] = [
    Some(Quality::Minor),      // i
    None,
    Some(Quality::Diminished), // ii°
    Some(Quality::Major),      // III
    None,
    Some(Quality::Minor),      // iv
    None,
    Some(Quality::Minor),      // v
    Some(Quality::Major),      // VI
    None,
    Some(Quality::Major),      // VII
    None,
];

/// Major keys conventionally written with flats (F, Bb, Eb, Ab, Db, Gb).
const FLAT_MAJOR_TONICS: [u8; 6] = [5, 10, 3, 8, 1, 6];

/// A declared key: tonic, mode, and the accidental preference that follows
/// from how it was written (`Bb` prefers flats even though A# names the same
/// pitch class).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub tonic: PitchClass,
    pub minor: bool,
    prefer_sharps: bool,
}

impl Key {
    /// Parses a key directive value: `G`, `Em`, `Bb`, `F#m`, `c minor`,
    /// `Ab major`. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Key> {
        let text = text.trim();
        let mut chars = text.chars();
        let letter = chars.next()?;
        if !letter.is_ascii_alphabetic() {
            return None;
        }
        let rest = chars.as_str();
        let (accidental, rest) = match rest.as_bytes().first() {
            Some(b'#') => (1i8, &rest[1..]),
            Some(b'b') => (-1i8, &rest[1..]),
            _ => (0, rest),
        };
        let tonic = PitchClass::from_letter(letter, accidental)?;
        let minor = match rest.trim().to_ascii_lowercase().as_str() {
            "" | "maj" | "major" => letter.is_ascii_lowercase(),
            "m" | "min" | "minor" => true,
            _ => return None,
        };
        let prefer_sharps = match accidental {
            1 => true,
            -1 => false,
            _ => {
                // Relative major decides for unmarked tonics.
                let major_tonic = if minor { tonic.transposed(3) } else { tonic };
                !FLAT_MAJOR_TONICS.contains(&major_tonic.value())
            }
        };
        Some(Key {
            tonic,
            minor,
            prefer_sharps,
        })
    }

    pub fn prefer_sharps(self) -> bool {
        self.prefer_sharps
    }

    /// The diatonic triad quality rooted on `pc`, if `pc` is a scale degree.
    pub fn diatonic_quality(self, pc: PitchClass) -> Option<Quality> {
        let degree = (pc.value() as i32 - self.tonic.value() as i32).rem_euclid(12) as usize;
        if self.minor {
            MINOR_DEGREES[degree]
        } else {
            MAJOR_DEGREES[degree]
        }
    }

    /// Whether a chord with this root and triad quality belongs to the key.
    /// Extensions are ignored; `G7` counts as diatonic in G.
    pub fn is_diatonic(self, root: PitchClass, quality: Quality) -> bool {
        self.diatonic_quality(root) == Some(quality)
    }

    /// Transposes the key, re-deriving the spelling preference from the
    /// new tonic.
    #[must_use]
    pub fn transposed(self, semitones: i32) -> Key {
        let tonic = self.tonic.transposed(semitones);
        let major_tonic = if self.minor { tonic.transposed(3) } else { tonic };
        Key {
            tonic,
            minor: self.minor,
            prefer_sharps: !FLAT_MAJOR_TONICS.contains(&major_tonic.value()),
        }
    }

    /// Renders the key back to directive-value form (`G`, `Em`, `Bb`).
    pub fn render(self) -> String {
        self.render_with(self.prefer_sharps)
    }

    /// Renders with an explicit accidental preference, for hosts that force
    /// sharps or flats across a transposition.
    pub fn render_with(self, prefer_sharps: bool) -> String {
        let mut s = self.tonic.spell(prefer_sharps).to_string();
        if self.minor {
            s.push('m');
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('C', 0, 0)]
    #[case('C', 1, 1)]
    #[case('B', 0, 11)]
    #[case('C', -1, 11)]
    #[case('F', 1, 6)]
    fn letters_resolve(#[case] letter: char, #[case] acc: i8, #[case] pc: u8) {
        assert_eq!(PitchClass::from_letter(letter, acc).unwrap().value(), pc);
    }

    #[test]
    fn unknown_letter_is_rejected() {
        assert!(PitchClass::from_letter('H', 0).is_none());
    }

    #[rstest]
    #[case("G", false, true)]
    #[case("Em", true, true)]
    #[case("Bb", false, false)]
    #[case("F#m", true, true)]
    #[case("d minor", true, false)]
    #[case("Ab major", false, false)]
    fn keys_parse(#[case] text: &str, #[case] minor: bool, #[case] sharps: bool) {
        let key = Key::parse(text).unwrap();
        assert_eq!(key.minor, minor);
        assert_eq!(key.prefer_sharps(), sharps);
    }

    #[test]
    fn nonsense_key_is_rejected() {
        assert!(Key::parse("Hb").is_none());
        assert!(Key::parse("G mixolydian").is_none());
        assert!(Key::parse("").is_none());
    }

    #[test]
    fn diatonic_triads_of_g_major() {
        let g = Key::parse("G").unwrap();
        let pc = |l| PitchClass::from_letter(l, 0).unwrap();
        assert!(g.is_diatonic(pc('G'), Quality::Major));
        assert!(g.is_diatonic(pc('E'), Quality::Minor));
        assert!(g.is_diatonic(pc('C'), Quality::Major));
        assert!(g.is_diatonic(pc('D'), Quality::Major));
        assert!(!g.is_diatonic(pc('C'), Quality::Minor));
        assert!(!g.is_diatonic(PitchClass::from_letter('G', 1).unwrap(), Quality::Major));
    }

    #[test]
    fn transposed_key_respells() {
        let g = Key::parse("G").unwrap();
        let up3 = g.transposed(3);
        assert_eq!(up3.render(), "Bb");
        let em = Key::parse("Em").unwrap();
        assert_eq!(em.transposed(2).render(), "F#m");
    }
}
