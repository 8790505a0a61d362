use super::pitch::PitchClass;

/// Triad quality of a parsed chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Suspended,
    Power,
}

/// Quality symbols, longest first so prefix scanning is unambiguous
/// (`maj7` matches `maj` + `7`, never `m` + `aj7`).
const QUALITY_TABLE: [(&str, Quality); 13] = [
    ("sus4", Quality::Suspended),
    ("sus2", Quality::Suspended),
    ("sus", Quality::Suspended),
    ("maj", Quality::Major),
    ("min", Quality::Minor),
    ("dim", Quality::Diminished),
    ("aug", Quality::Augmented),
    ("m", Quality::Minor),
    ("M", Quality::Major),
    ("-", Quality::Minor),
    ("°", Quality::Diminished),
    ("+", Quality::Augmented),
    ("5", Quality::Power),
];

/// Extension symbols, longest first. Matched repeatedly after the quality;
/// any residue the table cannot account for makes the whole token opaque.
const EXTENSION_TABLE: [&str; 19] = [
    "add11", "add9", "maj7", "maj9", "sus4", "sus2", "#11", "b13", "#5", "#9", "b5", "b9", "13",
    "11", "9", "7", "6", "4", "2",
];

/// A chord token the grammar tables fully account for.
///
/// The written form is preserved exactly: `root_text` and `bass_text` keep
/// the source spelling, `suffix` keeps the quality/extension text verbatim.
/// Rendering concatenates these, so `render(parse(s)) == s` for every token
/// this type represents. Transposition replaces only the pitch spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordToken {
    pub root: PitchClass,
    pub root_text: String,
    pub quality: Quality,
    pub extensions: Vec<String>,
    /// Quality + extension text exactly as written (`m7b5`, `maj7`, empty).
    pub suffix: String,
    pub bass: Option<PitchClass>,
    pub bass_text: Option<String>,
}

/// A chord position in a content line: either fully parsed or retained
/// verbatim. Opaque tokens are never dropped and never transposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordSymbol {
    Parsed(ChordToken),
    Opaque(String),
}

impl ChordToken {
    /// Transposes root and bass by `semitones`, respelling per
    /// `prefer_sharps`. The suffix is untouched.
    #[must_use]
    pub fn transposed(&self, semitones: i32, prefer_sharps: bool) -> ChordToken {
        let root = self.root.transposed(semitones);
        let bass = self.bass.map(|b| b.transposed(semitones));
        ChordToken {
            root,
            root_text: root.spell(prefer_sharps).to_string(),
            quality: self.quality,
            extensions: self.extensions.clone(),
            suffix: self.suffix.clone(),
            bass,
            bass_text: bass.map(|b| b.spell(prefer_sharps).to_string()),
        }
    }

    pub fn render(&self) -> String {
        let mut s = String::with_capacity(self.root_text.len() + self.suffix.len() + 3);
        s.push_str(&self.root_text);
        s.push_str(&self.suffix);
        if let Some(bass) = &self.bass_text {
            s.push('/');
            s.push_str(bass);
        }
        s
    }
}

impl ChordSymbol {
    pub fn render(&self) -> String {
        match self {
            ChordSymbol::Parsed(token) => token.render(),
            ChordSymbol::Opaque(text) => text.clone(),
        }
    }

    /// Transposition is the identity on opaque tokens.
    #[must_use]
    pub fn transposed(&self, semitones: i32, prefer_sharps: bool) -> ChordSymbol {
        match self {
            ChordSymbol::Parsed(token) => {
                ChordSymbol::Parsed(token.transposed(semitones, prefer_sharps))
            }
            ChordSymbol::Opaque(text) => ChordSymbol::Opaque(text.clone()),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, ChordSymbol::Opaque(_))
    }
}

/// Parses one chord token. Never fails: text the grammar tables cannot fully
/// account for comes back as [`ChordSymbol::Opaque`], preserved verbatim.
pub fn parse_chord(text: &str) -> ChordSymbol {
    match try_parse(text) {
        Some(token) => ChordSymbol::Parsed(token),
        None => ChordSymbol::Opaque(text.to_string()),
    }
}

fn try_parse(text: &str) -> Option<ChordToken> {
    let (body, bass_part) = match text.split_once('/') {
        Some((body, bass)) => (body, Some(bass)),
        None => (text, None),
    };

    let (root, root_len) = parse_note(body)?;
    let suffix = &body[root_len..];
    let (quality, extensions) = parse_suffix(suffix)?;

    let (bass, bass_text) = match bass_part {
        Some(bass_str) => {
            let (pc, len) = parse_note(bass_str)?;
            if len != bass_str.len() {
                return None;
            }
            (Some(pc), Some(bass_str.to_string()))
        }
        None => (None, None),
    };

    Some(ChordToken {
        root,
        root_text: body[..root_len].to_string(),
        quality,
        extensions,
        suffix: suffix.to_string(),
        bass,
        bass_text,
    })
}

/// Parses a note name at the start of `s`: uppercase letter A–G plus at most
/// one accidental. Returns the pitch class and consumed byte count.
fn parse_note(s: &str) -> Option<(PitchClass, usize)> {
    let mut bytes = s.bytes();
    let letter = bytes.next()? as char;
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let (accidental, len) = match bytes.next() {
        Some(b'#') => (1i8, 2),
        Some(b'b') => (-1i8, 2),
        _ => (0, 1),
    };
    PitchClass::from_letter(letter, accidental).map(|pc| (pc, len))
}

fn parse_suffix(suffix: &str) -> Option<(Quality, Vec<String>)> {
    let mut rest = suffix;
    let mut quality = Quality::Major;
    for (symbol, q) in QUALITY_TABLE {
        if rest.starts_with(symbol) {
            quality = q;
            rest = &rest[symbol.len()..];
            break;
        }
    }

    let mut extensions = Vec::new();
    'scan: while !rest.is_empty() {
        for symbol in EXTENSION_TABLE {
            if rest.starts_with(symbol) {
                extensions.push(symbol.to_string());
                rest = &rest[symbol.len()..];
                continue 'scan;
            }
        }
        // Residue the tables don't know: the whole token is opaque.
        return None;
    }
    Some((quality, extensions))
}
