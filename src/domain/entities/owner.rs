//! Owner identity supplied by session resolution.

/// The user a link is created for.
///
/// Temporary (anonymous) users are still owners; they are just not
/// privileged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub temporary: bool,
}

impl Owner {
    /// A registered user.
    pub fn registered(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            temporary: false,
        }
    }

    /// A temporary user created for an anonymous caller.
    pub fn temporary(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            temporary: true,
        }
    }

    pub fn is_privileged(&self) -> bool {
        !self.temporary
    }

    /// Short label for logs and metrics.
    pub fn class(&self) -> &'static str {
        if self.temporary {
            "temporary"
        } else {
            "registered"
        }
    }
}
