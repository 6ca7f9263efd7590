/// Modifiers placed before the topic, in query order.
pub const PREFIXES: [&str; 5] = ["best", "how to", "what is", "guide to", "tips for"];

/// Modifiers placed after the topic, in query order.
pub const SUFFIXES: [&str; 5] = ["guide", "tips", "for beginners", "explained", "2024"];

/// Upper bound on generated variations.
pub const MAX_VARIATIONS: usize = 15;

/// Expands a seed phrase into templated query variations.
///
/// Order is significant: the remote lookup only sends the first `2 × limit`
/// entries. The topic comes first, then prefixed forms, then suffixed forms,
/// then the `best {topic} tips` and `how to {topic}` templates. The last one
/// repeats a prefixed form; duplicates are kept.
pub fn generate_variations(topic: &str) -> Vec<String> {
    let mut variations = Vec::with_capacity(1 + PREFIXES.len() + SUFFIXES.len() + 2);
    variations.push(topic.to_string());

    variations.extend(PREFIXES.iter().map(|prefix| format!("{} {}", prefix, topic)));
    variations.extend(SUFFIXES.iter().map(|suffix| format!("{} {}", topic, suffix)));

    variations.push(format!("best {} tips", topic));
    variations.push(format!("how to {}", topic));

    variations.truncate(MAX_VARIATIONS);
    variations
}
