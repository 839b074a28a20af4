//! Narration text sanitation.
//!
//! Upstream step narration occasionally arrives empty, mis-encoded, or with
//! stray control characters. Cleaning repairs what it can; implausibly short
//! results are replaced by a fixed per-step fallback so the tutor never
//! narrates a blank line.

use tracing::warn;

/// Cleaned narration shorter than this is treated as a content defect.
const MIN_PLAUSIBLE_CHARS: usize = 5;

/// Upper bound on entity-decode passes; real content settles in one or two.
const MAX_DECODE_PASSES: usize = 8;

const STEP_FALLBACKS: [&str; 3] = [
    "Identify the digit in the 1st decimal place. This is the first digit after the decimal \
     point. We will call it the \"rounding digit\". Draw a \"cut off\" line after the rounding \
     digit.",
    "Check the digit to the right of the \"cut off\" line. If this digit is less than 5 we keep \
     our rounding digit the same.",
    "Remove all digits after the \"cut off\" line. We have now rounded the number to 1 decimal \
     place.",
];

const GENERIC_FALLBACK: &str = "Let's work through this step together.";

/// Canonical narration fallback for a 1-based step number.
#[must_use]
pub fn fallback_narration(step: u32) -> &'static str {
    match step {
        0 => GENERIC_FALLBACK,
        n => STEP_FALLBACKS
            .get(n as usize - 1)
            .copied()
            .unwrap_or(GENERIC_FALLBACK),
    }
}

/// Strip control characters, decode HTML entities, and collapse whitespace.
///
/// Entity decoding runs to a fixpoint so that double-encoded content
/// (`&amp;quot;`) settles, which also makes the whole function idempotent:
/// `clean_narration(clean_narration(s)) == clean_narration(s)`.
#[must_use]
pub fn clean_narration(raw: &str) -> String {
    let despaced: String = raw
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();

    let mut decoded = despaced;
    for _ in 0..MAX_DECODE_PASSES {
        let next = decode_entities_once(&decoded);
        if next == decoded {
            break;
        }
        decoded = next;
    }

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean `raw` and substitute the step fallback when the result is too short
/// to be real content. Repairs are logged, never surfaced to the student.
#[must_use]
pub fn resolve_narration(step: u32, raw: &str) -> String {
    let cleaned = clean_narration(raw);
    if cleaned.chars().count() < MIN_PLAUSIBLE_CHARS {
        warn!(step, raw, "narration text implausibly short, using fallback");
        return fallback_narration(step).to_string();
    }
    cleaned
}

fn decode_entities_once(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail[1..].find(';').map(|i| i + 1) {
            // Entities are short; anything longer is just literal text.
            Some(end) if end <= 10 => {
                let name = &tail[1..end];
                match decode_entity(name) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&tail[..=end]),
                }
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
                .map(|hex| u32::from_str_radix(hex, 16))
                .or_else(|| name.strip_prefix('#').map(str::parse::<u32>))?
                .ok()?;
            char::from_u32(code)
        }
    }
}
