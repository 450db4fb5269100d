/// Normalise free text to the title case the dataset stores categories in:
/// each whitespace-separated word gets an upper-case first letter and a
/// lower-case remainder; runs of whitespace collapse to one space.
pub fn capitalise_words(value: &str) -> String {
    value
        .split_whitespace()
        .map(capitalise)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalise_words() {
        assert_eq!(capitalise_words("south asian"), "South Asian");
        assert_eq!(capitalise_words("CAUCASIAN"), "Caucasian");
        assert_eq!(capitalise_words("  targeted   therapy "), "Targeted Therapy");
        assert_eq!(capitalise_words(""), "");
    }

    #[test]
    fn test_capitalise_keeps_punctuation() {
        assert_eq!(capitalise_words("african-american"), "African-american");
    }
}
