//! Bindings between chat users and upstream profiles.
//!
//! The mapping is a bijection: binding a user to a profile drops any
//! earlier binding of either side. Bindings live for the process
//! lifetime only.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::info;
use turncall_types::{ChatUserId, ProfileId};

#[derive(Debug, Default)]
struct Bindings {
    by_user: BTreeMap<ChatUserId, ProfileId>,
    by_profile: BTreeMap<ProfileId, ChatUserId>,
}

/// Process-wide chat user <-> profile mapping.
#[derive(Debug, Default)]
pub struct UserMappings {
    inner: RwLock<Bindings>,
}

impl UserMappings {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `user` to `profile`, replacing earlier bindings of either.
    ///
    /// Returns the profile `user` was bound to before, if any.
    pub async fn bind(&self, user: ChatUserId, profile: ProfileId) -> Option<ProfileId> {
        let mut inner = self.inner.write().await;

        let previous = inner.by_user.remove(&user);
        if let Some(old_profile) = &previous {
            inner.by_profile.remove(old_profile);
        }
        if let Some(old_user) = inner.by_profile.remove(&profile) {
            inner.by_user.remove(&old_user);
        }

        info!(user = %user, profile = %profile, "profile bound");
        inner.by_user.insert(user.clone(), profile.clone());
        inner.by_profile.insert(profile, user);
        previous
    }

    /// Remove the binding of `user`.
    pub async fn unbind(&self, user: &ChatUserId) -> Option<ProfileId> {
        let mut inner = self.inner.write().await;
        let profile = inner.by_user.remove(user)?;
        inner.by_profile.remove(&profile);
        Some(profile)
    }

    /// Profile bound to `user`.
    pub async fn profile_for(&self, user: &ChatUserId) -> Option<ProfileId> {
        self.inner.read().await.by_user.get(user).cloned()
    }

    /// Chat user bound to `profile`.
    pub async fn user_for(&self, profile: &ProfileId) -> Option<ChatUserId> {
        self.inner.read().await.by_profile.get(profile).cloned()
    }

    /// Number of bindings.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_user.len()
    }

    /// Whether there are no bindings.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_user.is_empty()
    }
}
