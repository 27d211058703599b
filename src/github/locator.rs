//! Repository and token value types used when talking to GitHub.

use std::fmt;

use crate::discussion::error::DiscussionError;

/// A repository named as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    owner: String,
    name: String,
}

impl RepositorySlug {
    /// Parses an `owner/name` string.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::MissingRepository`] when the input is blank
    /// and [`DiscussionError::InvalidRepository`] when it does not have exactly
    /// two non-empty segments.
    ///
    /// # Example
    ///
    /// ```
    /// use pagethread::github::RepositorySlug;
    ///
    /// let slug = RepositorySlug::parse("octo/blog").expect("valid slug");
    /// assert_eq!(slug.owner(), "octo");
    /// assert_eq!(slug.name_with_owner(), "octo/blog");
    /// ```
    pub fn parse(input: &str) -> Result<Self, DiscussionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DiscussionError::MissingRepository);
        }
        let mut segments = trimmed.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                })
            }
            _ => Err(DiscussionError::InvalidRepository(trimmed.to_owned())),
        }
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns `owner/name`.
    #[must_use]
    pub fn name_with_owner(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Bearer token used for the discussions endpoint and the GraphQL API.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, DiscussionError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DiscussionError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PersonalAccessToken(<redacted>)")
    }
}
