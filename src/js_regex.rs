use std::fmt;

/// Thin wrapper over `fancy_regex` so pattern errors stay inside the crate's
/// error type.
#[derive(Debug, Clone)]
pub(crate) struct Regex {
    backend: fancy_regex::Regex,
}

impl Regex {
    pub(crate) fn new(pattern: &str) -> Result<Self, RegexError> {
        let backend = fancy_regex::Regex::new(pattern).map_err(RegexError::from)?;
        Ok(Self { backend })
    }

    pub(crate) fn is_match(&self, input: &str) -> Result<bool, RegexError> {
        self.backend.is_match(input).map_err(RegexError::from)
    }

    pub(crate) fn as_str(&self) -> &str {
        self.backend.as_str()
    }
}

/// Builds the anchored pattern for a string made only of ASCII digits with a
/// length between `min` and `max` inclusive.
///
/// `[0-9]` is used instead of `\d` because the backend's `\d` is Unicode
/// aware while browser regexes only accept ASCII digits.
pub(crate) fn bounded_digits_pattern(min: usize, max: usize) -> String {
    format!("^[0-9]{{{min},{max}}}$")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegexError {
    message: String,
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RegexError {}

impl From<fancy_regex::Error> for RegexError {
    fn from(value: fancy_regex::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

impl From<RegexError> for crate::Error {
    fn from(value: RegexError) -> Self {
        crate::Error::Pattern(value.message)
    }
}
