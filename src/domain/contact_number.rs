use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 15;

/// Customer phone number: digits, spaces and `+-()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNumber(String);

impl ContactNumber {
    pub fn parse(s: String) -> Result<ContactNumber, String> {
        let s = s.trim().to_string();
        if s.is_empty() {
            return Err("A number cannot be blank.".to_string());
        }
        if s.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(format!(
                "Numbers are limited to {} characters.",
                MAX_GRAPHEMES
            ));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_digit() || " +-()".contains(c))
        {
            return Err(format!("{} is not a valid number.", s));
        }
        Ok(Self(s))
    }

    /// Blank form input means "no number"; anything else must parse.
    pub fn parse_optional(s: Option<String>) -> Result<Option<ContactNumber>, String> {
        match s {
            Some(s) if !s.trim().is_empty() => Self::parse(s).map(Some),
            _ => Ok(None),
        }
    }
}

impl AsRef<str> for ContactNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
