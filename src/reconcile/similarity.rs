/// Collapse whitespace runs to one space and trim the ends.
pub fn token_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Edit distance in Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, left) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, right) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(left != *right);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Normalized edit-distance ratio of the whitespace-insensitive, lowercased
/// token text of `a` and `b`, in [0, 1]. Two empty texts are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = token_text(a).to_lowercase();
    let b = token_text(b).to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let distance = levenshtein(&a, &b);
    longest.saturating_sub(distance) as f64 / longest as f64
}
