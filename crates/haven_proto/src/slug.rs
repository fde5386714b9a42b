//! Channel/DM name -> archive path slugging.

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_safe_characters_untouched() {
        assert_eq!(slugify("general-chat_1"), "general-chat_1");
    }

    #[test]
    fn replaces_unsafe_characters() {
        assert_eq!(slugify("dev/ops #1!"), "dev_ops__1_");
    }

    #[test]
    fn empty_string_stays_empty() {
        assert_eq!(slugify(""), "");
    }
}
