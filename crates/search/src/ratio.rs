//! Normalized string similarity on a 0-100 scale.
//!
//! `ratio` is the indel similarity `200 * lcs / (len_a + len_b)`, where `lcs`
//! is the longest common subsequence in characters. The other scorers reshape
//! their inputs (best-matching window, sorted tokens) before applying it.

/// Whole-string similarity
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best similarity between the shorter string and any equally long window of
/// the longer one (including windows clipped at either end)
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let width = short.len();
    let mut best = 0.0_f64;

    for start in 0..=(long.len() - width) {
        best = best.max(ratio_chars(&short, &long[start..start + width]));
        if best >= 100.0 {
            return 100.0;
        }
    }

    // Windows hanging over either end of the longer string
    for clipped in 1..width {
        best = best
            .max(ratio_chars(&short, &long[..clipped]))
            .max(ratio_chars(&short, &long[long.len() - clipped..]));
    }

    best
}

/// [`ratio`] after sorting whitespace separated tokens
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// [`partial_ratio`] after sorting whitespace separated tokens
pub fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Longest common subsequence length, two-row dynamic programming
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
