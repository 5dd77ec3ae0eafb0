/// Returns the suffix of `text` holding its last `n` lines.
///
/// `n <= 0` returns the whole text, as does a text with fewer than `n` lines.
/// A trailing newline does not count as an extra empty line.
pub fn tail_lines(text: &str, n: i64) -> &str {
    if n <= 0 {
        return text;
    }
    let skip = usize::try_from(n - 1).unwrap_or(usize::MAX);
    let body = text.strip_suffix('\n').unwrap_or(text);
    match body.rmatch_indices('\n').nth(skip) {
        Some((idx, _)) => &text[idx + 1..],
        None => text,
    }
}
