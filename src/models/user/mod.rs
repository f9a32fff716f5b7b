// User module
// Signed-in calendar account

/// An account returned by the calendar provider after authentication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub email: String,
    pub name: String,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Short name for the profile panel: the display name, or the part of
    /// the address before '@' when the provider returned none.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return &self.name;
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_email_user() {
        assert_eq!(User::new("ana@example.com", "").display_name(), "ana");
        assert_eq!(User::new("ana@example.com", "Ana K").display_name(), "Ana K");
    }
}
