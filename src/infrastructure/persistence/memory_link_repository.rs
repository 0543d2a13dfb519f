//! In-process link store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};

/// Mutex-guarded map from key to link.
///
/// The check-and-insert happens under one lock, so it gives the same
/// uniqueness guarantee as the database primary key. Data lives only as
/// long as the process.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, Link>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Storage("mutex poisoned".into())
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: &NewLink) -> Result<Link, StoreError> {
        let mut links = self.links.lock().map_err(poisoned)?;
        if links.contains_key(&new_link.key) {
            return Err(StoreError::KeyConflict);
        }

        let link = new_link.clone().into_link();
        links.insert(link.key.clone(), link.clone());
        Ok(link)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Link>, StoreError> {
        let links = self.links.lock().map_err(poisoned)?;
        Ok(links.get(key).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.links.lock().map(|_| ()).map_err(poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn new_link(key: &str) -> NewLink {
        NewLink {
            key: key.to_string(),
            url: "https://example.com/".to_string(),
            owner_id: "owner".to_string(),
            passphrase_hash: None,
            call_limit: Some(3),
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let repo = InMemoryLinkRepository::new();

        let link = repo.insert(&new_link("abc")).await.unwrap();
        assert!(link.calls.is_none());

        let found = repo.find_by_key("abc").await.unwrap().unwrap();
        assert_eq!(found, link);
        assert!(repo.find_by_key("ABC").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_len_survives_poisoned_lock() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        repo.insert(&new_link("abc")).await.unwrap();

        let poisoner = repo.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.links.lock().unwrap();
            panic!("poison");
        })
        .join();

        assert!(repo.links.is_poisoned());
        assert_eq!(repo.len(), 1);
        assert!(!repo.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_key_conflicts_without_overwrite() {
        let repo = InMemoryLinkRepository::new();
        repo.insert(&new_link("dup")).await.unwrap();

        let mut other = new_link("dup");
        other.url = "https://other.example/".to_string();

        assert_eq!(repo.insert(&other).await, Err(StoreError::KeyConflict));
        assert_eq!(
            repo.find_by_key("dup").await.unwrap().unwrap().url,
            "https://example.com/"
        );
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_single_winner() {
        let repo = Arc::new(InMemoryLinkRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.insert(&new_link("race")).await })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_ping() {
        let repo = InMemoryLinkRepository::new();
        assert!(repo.ping().await.is_ok());
        assert!(repo.is_empty());
    }
}
