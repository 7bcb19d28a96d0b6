//! Property-based tests for the streaming validator.
//!
//! The central property is chunk transparency: however a stream is cut into
//! chunks, the validator must reach exactly the same report as when the whole
//! stream arrives at once. Inputs are drawn from a small alphabet that is dense in
//! delimiters, quotes, whitespace and line-break characters so that cuts land
//! inside quoted fields and between `\r` and `\n` as often as possible.

use proptest::prelude::*;
use proptest::sample::Index;
use term_csv::core::{Level, MessageTag, ValidationReport};
use term_csv::dialect::{Dialect, Terminator};
use term_csv::validator::StreamingValidator;

// ============================================================================
// Test Data Generation Utilities
// ============================================================================

const ALPHABET: &[char] = &['a', '1', ',', '"', '\r', '\n', ' ', '\t', 'é', ':'];

// Valid ASCII plus the pieces of two multi-byte characters and a byte that is
// never valid UTF-8.
const BYTE_ALPHABET: &[u8] = &[b'a', b'1', b',', b'"', b'\r', b'\n', 0xC3, 0xA9, 0xE2, 0x82, 0xFF];

fn csv_text(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ALPHABET), 0..max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

fn csv_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(BYTE_ALPHABET), 0..max_len)
}

fn dialect() -> impl Strategy<Value = Dialect> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(prop::sample::select(vec![
            Terminator::CrLf,
            Terminator::Lf,
            Terminator::Cr,
        ])),
        any::<bool>(),
    )
        .prop_map(|(header, terminator, skip_blank_rows)| Dialect {
            header,
            line_terminator: terminator,
            skip_blank_rows,
            ..Dialect::default()
        })
}

/// Byte offsets of `text` that fall on character boundaries, end included.
fn boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

fn validate_str_chunks(dialect: &Dialect, chunks: &[&str]) -> ValidationReport {
    let mut validator = StreamingValidator::with_dialect(dialect.clone()).unwrap();
    for chunk in chunks {
        validator.submit_chunk(chunk);
    }
    validator.finalize();
    validator.report()
}

fn validate_byte_chunks(dialect: &Dialect, chunks: &[&[u8]]) -> ValidationReport {
    let mut validator = StreamingValidator::with_dialect(dialect.clone()).unwrap();
    for chunk in chunks {
        validator.submit_bytes(chunk);
    }
    validator.finalize();
    validator.report()
}

// ============================================================================
// Chunk Transparency
// ============================================================================

proptest! {
    /// Cutting a stream once at any character boundary changes nothing.
    #[test]
    fn test_single_split_is_transparent(
        text in csv_text(80),
        dialect in dialect(),
        cut in any::<Index>()
    ) {
        let offsets = boundaries(&text);
        let at = offsets[cut.index(offsets.len())];
        let (head, tail) = text.split_at(at);

        let whole = validate_str_chunks(&dialect, &[text.as_str()]);
        let split = validate_str_chunks(&dialect, &[head, tail]);
        prop_assert_eq!(whole, split);
    }

    /// Cutting a stream into many pieces, including empty ones, changes nothing.
    #[test]
    fn test_many_splits_are_transparent(
        text in csv_text(120),
        dialect in dialect(),
        cuts in prop::collection::vec(any::<Index>(), 0..8)
    ) {
        let offsets = boundaries(&text);
        let mut points: Vec<usize> = cuts.iter().map(|c| offsets[c.index(offsets.len())]).collect();
        points.sort_unstable();

        let mut chunks = Vec::new();
        let mut start = 0;
        for point in points {
            chunks.push(&text[start..point]);
            start = point;
        }
        chunks.push(&text[start..]);

        let whole = validate_str_chunks(&dialect, &[text.as_str()]);
        let split = validate_str_chunks(&dialect, &chunks);
        prop_assert_eq!(whole, split);
    }

    /// Byte chunks may split multi-byte characters and invalid sequences anywhere.
    #[test]
    fn test_byte_split_is_transparent(
        bytes in csv_bytes(80),
        dialect in dialect(),
        cut in any::<Index>()
    ) {
        let at = cut.index(bytes.len() + 1);
        let (head, tail) = bytes.split_at(at);

        let whole = validate_byte_chunks(&dialect, &[bytes.as_slice()]);
        let split = validate_byte_chunks(&dialect, &[head, tail]);
        prop_assert_eq!(whole, split);
    }

    /// Text submitted as bytes is judged the same as text submitted as `str`.
    #[test]
    fn test_bytes_and_text_agree_on_valid_utf8(text in csv_text(80), dialect in dialect()) {
        let as_text = validate_str_chunks(&dialect, &[text.as_str()]);
        let as_bytes = validate_byte_chunks(&dialect, &[text.as_bytes()]);
        prop_assert_eq!(as_text, as_bytes);
    }
}

// ============================================================================
// Message Invariants
// ============================================================================

proptest! {
    /// The verdict is exactly "no errors".
    #[test]
    fn test_valid_iff_no_errors(text in csv_text(80), dialect in dialect()) {
        let mut validator = StreamingValidator::with_dialect(dialect).unwrap();
        validator.submit_chunk(&text);
        prop_assert_eq!(validator.is_valid(), validator.errors().is_empty());
        validator.finalize();
        prop_assert_eq!(validator.is_valid(), validator.errors().is_empty());
        prop_assert_eq!(validator.report().valid, validator.errors().is_empty());
    }

    /// A malformed row carries at most one quoting or whitespace fault.
    #[test]
    fn test_one_structural_fault_per_row(text in csv_text(120)) {
        let mut validator = StreamingValidator::new();
        validator.validate_chunks([text.as_str()]);

        let mut rows: Vec<usize> = validator
            .errors()
            .iter()
            .filter(|m| matches!(
                m.tag,
                MessageTag::UnclosedQuote | MessageTag::StrayQuote | MessageTag::Whitespace
            ))
            .filter_map(|m| m.row)
            .collect();
        let total = rows.len();
        rows.dedup();
        prop_assert_eq!(rows.len(), total);
    }

    /// Stream-level findings are reported at most once per run.
    #[test]
    fn test_once_per_run_messages(bytes in csv_bytes(120), dialect in dialect()) {
        let report = validate_byte_chunks(&dialect, &[bytes.as_slice()]);
        for tag in [
            MessageTag::LineBreaks,
            MessageTag::NonrfcLineBreaks,
            MessageTag::AssumedHeader,
            MessageTag::InvalidEncoding,
        ] {
            prop_assert!(report.messages_by_tag(tag).len() <= 1, "{} reported twice", tag);
        }
    }

    /// Each level's list only holds messages of that level.
    #[test]
    fn test_messages_sorted_by_level(text in csv_text(80), dialect in dialect()) {
        let report = validate_str_chunks(&dialect, &[text.as_str()]);
        prop_assert!(report.errors.iter().all(|m| m.level == Level::Error));
        prop_assert!(report.warnings.iter().all(|m| m.level == Level::Warning));
        prop_assert!(report.info_messages.iter().all(|m| m.level == Level::Info));
    }
}
