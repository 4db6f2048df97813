//! Thread-safe in-process token cache with a single-flight refresh guard.
//!
//! The cache holds at most one [`AccessToken`]. Readers take a cheap `RwLock` snapshot;
//! refreshers serialize on an async mutex so concurrent callers that all observed an expired
//! token wait for the first exchange instead of each minting their own.

// crates.io
use async_lock::MutexGuard as AsyncMutexGuard;
// self
use crate::{_prelude::*, token::AccessToken};

/// Single-slot token cache owned by one client instance.
pub struct TokenCache {
	slot: RwLock<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
	leeway: Duration,
}
impl TokenCache {
	/// Creates an empty cache that uses tokens right up to their expiry instant.
	pub fn new() -> Self {
		Self::with_leeway(Duration::ZERO)
	}

	/// Creates an empty cache that treats tokens as expired `leeway` before their expiry.
	///
	/// Negative values are clamped to zero.
	pub fn with_leeway(leeway: Duration) -> Self {
		Self {
			slot: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
			leeway: if leeway.is_negative() { Duration::ZERO } else { leeway },
		}
	}

	/// Returns the configured expiry leeway.
	pub fn leeway(&self) -> Duration {
		self.leeway
	}

	/// Returns the cached token when it is still usable at `now`.
	///
	/// A leeway that pushes `now` past the representable range makes every token unusable.
	pub fn usable_at(&self, now: OffsetDateTime) -> Option<AccessToken> {
		let horizon = now.checked_add(self.leeway)?;

		self.slot.read().as_ref().filter(|token| token.is_active_at(horizon)).cloned()
	}

	/// Returns the cached token regardless of its expiry.
	pub fn snapshot(&self) -> Option<AccessToken> {
		self.slot.read().clone()
	}

	/// Replaces the cached token.
	pub fn store(&self, token: AccessToken) {
		*self.slot.write() = Some(token);
	}

	/// Drops the cached token, returning it.
	pub fn invalidate(&self) -> Option<AccessToken> {
		self.slot.write().take()
	}

	/// Waits for exclusive ownership of the refresh path.
	pub(crate) async fn refresh_lock(&self) -> AsyncMutexGuard<'_, ()> {
		self.refresh_guard.lock().await
	}
}
impl Default for TokenCache {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("cached", &self.slot.read().is_some())
			.field("leeway", &self.leeway)
			.finish()
	}
}
