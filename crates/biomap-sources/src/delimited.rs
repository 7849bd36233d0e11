//! Delimited text reader (CSV, semicolon CSV, TSV).
//!
//! Exports from spreadsheet tools arrive in whatever encoding and separator
//! the author's locale produced. Text is decoded as UTF-8 when valid and as
//! Latin-1 otherwise; the separator is sniffed from the header line.

use biomap_core::RawTable;
use std::borrow::Cow;

/// Separators considered by [`sniff_delimiter`], in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Parse delimited bytes into a table. Every cell is kept as text, including
/// empty ones; short rows are padded with missing cells.
pub fn parse_delimited(bytes: &[u8]) -> Result<RawTable, csv::Error> {
    let text = decode_text(bytes);
    let delimiter = sniff_delimiter(&text);
    tracing::trace!(delimiter = ?char::from(delimiter), "sniffed delimiter");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut table = RawTable::new(headers);

    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(|cell| Some(cell.to_string())).collect());
    }
    Ok(table)
}

/// UTF-8 if valid, Latin-1 otherwise, with any leading BOM removed.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            tracing::debug!("input is not valid UTF-8; decoding as Latin-1");
            Cow::Owned(bytes.iter().map(|&b| b as char).collect())
        }
    };
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_prefix('\u{feff}').unwrap_or(s)),
        Cow::Owned(s) => match s.strip_prefix('\u{feff}') {
            Some(rest) => Cow::Owned(rest.to_string()),
            None => Cow::Owned(s),
        },
    }
}

/// The candidate separator occurring most often (outside quotes) on the first
/// non-empty line; `,` when none occurs.
pub fn sniff_delimiter(text: &str) -> u8 {
    let Some(header) = text.lines().find(|l| !l.trim().is_empty()) else {
        return b',';
    };

    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for b in header.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = CANDIDATE_DELIMITERS.iter().position(|&d| d == b) {
                counts[i] += 1;
            }
        }
    }

    // max_by_key keeps the last maximum; reversing makes the earliest
    // candidate win ties.
    counts
        .iter()
        .zip(CANDIDATE_DELIMITERS)
        .rev()
        .max_by_key(|(count, _)| **count)
        .filter(|(count, _)| **count > 0)
        .map_or(b',', |(_, delimiter)| delimiter)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
