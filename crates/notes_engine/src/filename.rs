use sha2::{Digest, Sha256};

const MAX_STEM_CHARS: usize = 80;

/// Portable, deterministic file stem for a topic export: `{title}--{short_hash(topic_id)}`.
///
/// Two topics with the same title still land in different files.
pub fn export_stem(title: &str, topic_id: &str) -> String {
    format!("{}--{}", sanitize_title(title), short_hash(topic_id))
}

fn sanitize_title(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let c = if is_forbidden(c) || c.is_whitespace() { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }

    let trimmed = compacted.trim_matches(&['_', '.'][..]);
    let mut name: String = trimmed.chars().take(MAX_STEM_CHARS).collect();
    if name.is_empty() {
        name = "untitled".to_string();
    }
    if is_reserved_device_name(&name) {
        name.push('_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_device_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect()
}
