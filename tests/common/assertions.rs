//! Domain-specific assertion macros for biomap harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the raw
//! input, so a failing parameterised case is readable without a debugger.

/// Assert that the normalizer reads `$raw` as `$expected` (within 1e-9).
///
/// ```rust
/// assert_parses!("370-450", 410.0);
/// ```
#[macro_export]
macro_rules! assert_parses {
    ($raw:expr, $expected:expr) => {{
        let raw: &str = $raw;
        let expected: f64 = $expected;
        match biomap_core::parse_numeric(raw) {
            Some(actual) if (actual - expected).abs() < 1e-9 => {}
            Some(actual) => panic!(
                "assert_parses! failed for {:?}:\n  expected: {}\n  actual:   {}",
                raw, expected, actual
            ),
            None => panic!(
                "assert_parses! failed for {:?}: expected {}, got missing",
                raw, expected
            ),
        }
    }};
}

/// Assert that the normalizer reads `$raw` as missing.
#[macro_export]
macro_rules! assert_missing {
    ($raw:expr) => {{
        let raw: &str = $raw;
        if let Some(actual) = biomap_core::parse_numeric(raw) {
            panic!("assert_missing! failed: {:?} parsed as {}", raw, actual);
        }
    }};
}

/// Assert that a radius lies in `[lo, hi]` inclusive.
#[macro_export]
macro_rules! assert_radius_within {
    ($radius:expr, $lo:expr, $hi:expr) => {{
        let (radius, lo, hi): (f64, f64, f64) = ($radius, $lo, $hi);
        if !(lo..=hi).contains(&radius) {
            panic!(
                "assert_radius_within! failed: {} is outside [{}, {}]",
                radius, lo, hi
            );
        }
    }};
}

/// Assert that a rendered page contains `$needle`, printing the start of
/// the first script block on failure.
#[macro_export]
macro_rules! assert_page_contains {
    ($html:expr, $needle:expr) => {{
        let html: &str = &$html;
        let needle: &str = $needle;
        if !html.contains(needle) {
            let start = html.find("<script>").unwrap_or(0);
            let excerpt: String = html[start..].chars().take(600).collect();
            panic!(
                "assert_page_contains! failed: {:?} not found.\n  page excerpt:\n{}",
                needle, excerpt
            );
        }
    }};
}
