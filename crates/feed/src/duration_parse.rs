// ABOUTME: Duration string parsing for podcast episode lengths.
// ABOUTME: Supports plain seconds and colon-separated [[[DD:]HH:]MM:]SS tokens.

/// Unit weights for colon-separated components, least significant first.
const UNIT_WEIGHTS: [u64; 4] = [1, 60, 3600, 86400];

/// Parses a human-entered duration token into total seconds.
///
/// - `"45"` is 45 seconds; non-numeric input without a colon is 0. Durations
///   are unsigned, so a negative token such as `"-5"` is 0 as well.
/// - `"3:45"`, `"1:02:03"` and `"1:00:00:00"` map right to left onto
///   seconds, minutes, hours and days.
/// - More than four components is malformed and yields 0.
/// - A non-numeric component counts as 0 without discarding the others.
pub fn parse_duration(token: &str) -> u64 {
    let token = token.trim();
    if !token.contains(':') {
        return parse_component(token);
    }

    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() > UNIT_WEIGHTS.len() {
        return 0;
    }

    parts
        .iter()
        .rev()
        .zip(UNIT_WEIGHTS)
        .fold(0u64, |total, (part, weight)| {
            total.saturating_add(parse_component(part).saturating_mul(weight))
        })
}

fn parse_component(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}
