/// Fallback token estimate: one token per ~4 characters, never below one.
pub fn approx_token_count(text: &str) -> usize {
    (text.chars().count() / 4).max(1)
}

/// Packs non-blank lines greedily into chunks of at most `max_tokens`.
///
/// A line that alone exceeds the budget still becomes its own chunk; lines
/// are never split.
pub fn chunk_by_tokens<F>(text: &str, count_tokens: F, max_tokens: usize) -> Vec<String>
where
    F: Fn(&str) -> usize,
{
    let mut chunks = Vec::new();
    let mut buf: Vec<&str> = Vec::new();
    let mut buf_tokens = 0;

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let line_tokens = count_tokens(line);
        if !buf.is_empty() && buf_tokens + line_tokens > max_tokens {
            chunks.push(buf.join("\n"));
            buf.clear();
            buf_tokens = 0;
        }
        buf.push(line);
        buf_tokens += line_tokens;
    }

    if !buf.is_empty() {
        chunks.push(buf.join("\n"));
    }

    chunks
}
