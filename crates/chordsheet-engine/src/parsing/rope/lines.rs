use xi_rope::Rope;

use super::span::Span;

/// A single raw line of the buffer with its byte span.
///
/// The span includes the trailing newline when one is present, so the spans
/// of consecutive lines tile the buffer without gaps.
#[derive(Debug, Clone)]
pub struct RawLine {
    pub span: Span,
    pub text: String,
}

/// Iterates the buffer line by line, preserving newlines in the spans.
///
/// Uses `lines_raw` so that span arithmetic stays exact; classification
/// strips the terminator itself.
pub fn raw_lines(rope: &Rope) -> impl Iterator<Item = RawLine> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        RawLine {
            span: Span::new(start, offset),
            text: line.into_owned(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_tile_the_buffer() {
        let rope = Rope::from("{key: G}\n[G]Amazing\n\ngrace");
        let lines: Vec<RawLine> = raw_lines(&rope).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].span, Span::new(0, 9));
        assert_eq!(lines[1].span, Span::new(9, 20));
        assert_eq!(lines[2].span, Span::new(20, 21));
        assert_eq!(lines[3].span, Span::new(21, 26));
        let mut prev_end = 0;
        for line in &lines {
            assert_eq!(line.span.start, prev_end);
            prev_end = line.span.end;
        }
        assert_eq!(prev_end, rope.len());
    }

    #[test]
    fn newline_stays_in_text() {
        let rope = Rope::from("[C]la\n");
        let lines: Vec<RawLine> = raw_lines(&rope).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "[C]la\n");
    }
}
