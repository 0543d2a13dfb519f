//! Link entity representing a short key to URL mapping.

use chrono::{DateTime, Utc};

/// A persisted short link.
///
/// `passphrase_hash` gates redirect access when present. `calls` starts out
/// as `None` and is only advanced by the redirect path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub key: String,
    pub url: String,
    pub owner_id: String,
    pub passphrase_hash: Option<String>,
    pub call_limit: Option<i64>,
    pub calls: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }

    /// Returns true if the call counter has reached the call limit.
    pub fn is_exhausted(&self) -> bool {
        match self.call_limit {
            Some(limit) => self.calls.unwrap_or(0) >= limit,
            None => false,
        }
    }
}

/// Input data for inserting a new link.
///
/// The link service fills `key` per attempt; all other fields stay fixed
/// across key-collision retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub key: String,
    pub url: String,
    pub owner_id: String,
    pub passphrase_hash: Option<String>,
    pub call_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewLink {
    /// Materializes the stored record with an unset call counter.
    pub fn into_link(self) -> Link {
        Link {
            key: self.key,
            url: self.url,
            owner_id: self.owner_id,
            passphrase_hash: self.passphrase_hash,
            call_limit: self.call_limit,
            calls: None,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// Caller-facing view of a freshly created link.
///
/// Carries only whether a passphrase is set, never the passphrase or its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub key: String,
    pub url: String,
    pub has_passphrase: bool,
    pub call_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Link> for CreatedLink {
    fn from(link: Link) -> Self {
        Self {
            has_passphrase: link.passphrase_hash.is_some(),
            key: link.key,
            url: link.url,
            call_limit: link.call_limit,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_link() -> NewLink {
        NewLink {
            key: "abc12".to_string(),
            url: "https://example.com/".to_string(),
            owner_id: "owner-1".to_string(),
            passphrase_hash: None,
            call_limit: None,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    #[test]
    fn test_into_link_starts_without_calls() {
        let link = new_link().into_link();

        assert_eq!(link.key, "abc12");
        assert_eq!(link.owner_id, "owner-1");
        assert!(link.calls.is_none());
        assert!(!link.is_expired());
        assert!(!link.is_exhausted());
    }

    #[test]
    fn test_link_is_expired() {
        let mut link = new_link().into_link();
        link.expires_at = Some(Utc::now() - Duration::seconds(1));
        assert!(link.is_expired());
    }

    #[test]
    fn test_link_is_exhausted() {
        let mut link = new_link().into_link();
        link.call_limit = Some(2);
        link.calls = Some(1);
        assert!(!link.is_exhausted());

        link.calls = Some(2);
        assert!(link.is_exhausted());
    }

    #[test]
    fn test_created_link_hides_passphrase() {
        let mut new = new_link();
        new.passphrase_hash = Some("deadbeef".to_string());

        let created = CreatedLink::from(new.into_link());

        assert!(created.has_passphrase);
        assert_eq!(created.key, "abc12");
    }

    #[test]
    fn test_created_link_without_passphrase() {
        let created = CreatedLink::from(new_link().into_link());
        assert!(!created.has_passphrase);
    }
}
