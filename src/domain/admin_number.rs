use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 15;

/// Free-form staff reference stored on an admin profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminNumber(String);

impl AdminNumber {
    pub fn parse(s: String) -> Result<AdminNumber, String> {
        let s = s.trim().to_string();
        if s.is_empty() {
            return Err("An admin number cannot be blank.".to_string());
        }
        if s.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(format!(
                "Admin numbers are limited to {} characters.",
                MAX_GRAPHEMES
            ));
        }
        Ok(Self(s))
    }

    pub fn parse_optional(s: Option<String>) -> Result<Option<AdminNumber>, String> {
        match s {
            Some(s) if !s.trim().is_empty() => Self::parse(s).map(Some),
            _ => Ok(None),
        }
    }
}

impl AsRef<str> for AdminNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
