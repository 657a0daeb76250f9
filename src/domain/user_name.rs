use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 150;

/// A username accepted at signup: 1 to 150 letters, digits or `@.+-_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    pub fn parse(s: String) -> Result<UserName, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > MAX_GRAPHEMES;
        let contains_forbidden_characters = s
            .chars()
            .any(|c| !(c.is_alphanumeric() || "@.+-_".contains(c)));

        if is_empty_or_whitespace {
            Err("A username is required.".to_string())
        } else if is_too_long {
            Err(format!(
                "Usernames are limited to {} characters.",
                MAX_GRAPHEMES
            ))
        } else if contains_forbidden_characters {
            Err(format!(
                "{} is not a valid username. Use letters, digits and @/./+/-/_ only.",
                s
            ))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
