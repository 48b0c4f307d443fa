//! Natural filename comparison.
//!
//! A name is split into alternating runs of digits and non-digits. Digit
//! runs compare by numeric value (leading zeros ignored), text runs compare
//! case-insensitively. When the same position holds a number in one name and
//! text in the other, the number sorts first. If one chunk sequence is a
//! prefix of the other, the shorter one sorts first.

use std::cmp::Ordering;

/// One run of a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// A run of ASCII digits. Digits are kept without leading zeros so that
    /// arbitrarily long runs compare by value without overflow.
    Number(String),
    /// A run of anything else, lowercased.
    Text(String),
}

impl Chunk {
    fn number(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Chunk::Number(trimmed.to_string())
    }
}

impl Ord for Chunk {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Chunk::Number(a), Chunk::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Chunk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a name into its natural-sort chunks.
///
/// `"Page012.PNG"` becomes `[Text("page"), Number("12"), Text(".png")]`.
pub fn natural_key(name: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut run = String::new();
    let mut in_digits = false;

    for ch in name.chars() {
        let is_digit = ch.is_ascii_digit();
        if !run.is_empty() && is_digit != in_digits {
            chunks.push(finish_run(&run, in_digits));
            run.clear();
        }
        in_digits = is_digit;
        run.push(ch);
    }
    if !run.is_empty() {
        chunks.push(finish_run(&run, in_digits));
    }
    chunks
}

fn finish_run(run: &str, digits: bool) -> Chunk {
    if digits {
        Chunk::number(run)
    } else {
        Chunk::Text(run.to_lowercase())
    }
}

/// Compare two names in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Sort names in natural order. The sort is stable: names with equal keys
/// (`"page7"` and `"page007"`) keep their relative order.
pub fn natural_sort<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by_cached_key(|name| natural_key(name.as_ref()));
}
