//! Cross-task handle to one client.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::api::{Order, StoreApi, UserProfile};
use crate::client::{Confirm, StoreClient};
use crate::error::ClientError;

/// Cloneable handle that serialises actions on a [`StoreClient`].
///
/// The lock is fair and held for the whole action, including the awaited
/// request. Two checkouts racing on the same handle therefore place at most
/// one order: the second sees the emptied cart.
pub struct SharedClient<A> {
    inner: Arc<Mutex<StoreClient<A>>>,
}

impl<A> Clone for SharedClient<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> std::fmt::Debug for SharedClient<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedClient").finish_non_exhaustive()
    }
}

impl<A: StoreApi> SharedClient<A> {
    #[must_use]
    pub fn new(client: StoreClient<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Wait for exclusive access.
    pub async fn lock(&self) -> MutexGuard<'_, StoreClient<A>> {
        self.inner.lock().await
    }

    /// See [`StoreClient::login`].
    ///
    /// # Errors
    ///
    /// Returns the login error.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        self.lock().await.login(username, password).await
    }

    /// See [`StoreClient::logout`].
    pub async fn logout(&self) {
        self.lock().await.logout();
    }

    /// See [`StoreClient::checkout`].
    ///
    /// # Errors
    ///
    /// Returns the checkout error.
    pub async fn checkout<C: Confirm>(&self, confirm: C) -> Result<Option<Order>, ClientError> {
        self.lock().await.checkout(confirm).await
    }
}
