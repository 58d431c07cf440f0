//! Token estimation for results the service never produced

/// Characters per token assumed by the fallback estimate.
const CHARS_PER_TOKEN: f64 = 4.0;

/// Strip leading and trailing whitespace, counting the ASCII information
/// separators (U+001C..=U+001F) as whitespace too.
pub(crate) fn trim_prompt(prompt: &str) -> &str {
    prompt.trim_matches(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}

/// Estimate the token count of a prompt without asking the service.
///
/// Crude on purpose: `max(1, round(chars / 4))` over the trimmed prompt,
/// counting Unicode scalar values and rounding halves to even. It only keeps
/// the result shape consistent when the service is unreachable.
pub fn fallback_token_estimate(prompt: &str) -> u64 {
    let chars = trim_prompt(prompt).chars().count();
    let estimate = (chars as f64 / CHARS_PER_TOKEN).round_ties_even() as u64;
    estimate.max(1)
}
