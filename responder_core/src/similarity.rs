//! String similarity used by the fuzzy fallback
//!
//! `sequence_ratio` is the Ratcliff/Obershelp measure (the same score as
//! difflib's `SequenceMatcher.ratio`): twice the number of matched characters
//! divided by the total length of both strings.

/// Similarity score between `a` and `b` in `0.0..=1.0`.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_from_matches(matching_chars(&a, &b), a.len() + b.len())
}

/// Find the candidate closest to `word` whose ratio is at least `cutoff`.
///
/// Each candidate is scored as `sequence_ratio(candidate, word)`; block
/// matching is not symmetric, so the order matters. Equal scores resolve to
/// the candidate that compares greatest as a string.
pub fn closest_match<'a, I>(word: &str, candidates: I, cutoff: f64) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let word_chars: Vec<char> = word.chars().collect();
    let mut best: Option<(&'a str, f64)> = None;

    for candidate in candidates {
        let cand_chars: Vec<char> = candidate.chars().collect();
        let total = word_chars.len() + cand_chars.len();

        // Cheap upper bound before the full comparison
        let bound = ratio_from_matches(word_chars.len().min(cand_chars.len()), total);
        if bound < cutoff || best.is_some_and(|(_, s)| bound < s) {
            continue;
        }

        let score = ratio_from_matches(matching_chars(&cand_chars, &word_chars), total);
        let better = match best {
            None => true,
            Some((b, s)) => score > s || (score == s && candidate > b),
        };
        if score >= cutoff && better {
            best = Some((candidate, score));
        }
    }

    best
}

fn ratio_from_matches(matches: usize, total_len: usize) -> f64 {
    if total_len == 0 {
        return 1.0;
    }
    (2.0 * matches as f64) / total_len as f64
}

/// Number of characters in the matching blocks of `a` and `b`: take the
/// longest common block, then recurse on the pieces left and right of it.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Longest common contiguous block as `(start_in_a, start_in_b, len)`,
/// preferring the earliest start in `a`, then in `b`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        for j in 0..b.len() {
            curr[j + 1] = if a[i] == b[j] { prev[j] + 1 } else { 0 };
            let len = curr[j + 1];
            if len > best.2 {
                best = (i + 1 - len, j + 1 - len, len);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}
