use std::fmt;

// =========================================================================
// Run-as identity
// =========================================================================

/// The account the service runs as (`User=` in the unit file).
/// Accepts either a user name or a numeric uid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User(pub String);

impl User {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for User {
    fn from(s: &str) -> Self {
        User(s.to_owned())
    }
}

impl From<String> for User {
    fn from(s: String) -> Self {
        User(s)
    }
}

impl From<u32> for User {
    fn from(id: u32) -> Self {
        User(id.to_string())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
