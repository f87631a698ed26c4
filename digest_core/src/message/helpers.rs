use super::dto::Message;

const MAX_KEYWORDS: usize = 12;

/// Flattens messages into `user [kind]: text` lines, skipping blank texts.
pub fn messages_to_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .filter_map(|m| {
            let text = m.text.trim();
            if text.is_empty() {
                None
            } else {
                Some(format!("{} [{}]: {}", m.user, m.kind, text))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits a `k1 / k2 / k3` topic key into at most twelve keywords.
pub fn parse_keywords(topic_key: &str) -> Vec<String> {
    let keywords: Vec<String> = topic_key
        .split('/')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect();

    if keywords.is_empty() {
        vec![topic_key.trim().to_string()]
    } else {
        keywords
    }
}
