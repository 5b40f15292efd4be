use parking_lot::Mutex;
use std::fmt::{self, Debug};
use tokio::sync::Notify;

/// A one-shot value that any number of tasks can wait for.
///
/// Only the first call to [`resolve`](Promise::resolve) has an effect.
pub struct Promise<T> {
	value: Mutex<Option<T>>,
	notify: Notify,
}

impl<T: Clone> Promise<T> {
	#[must_use]
	pub fn new() -> Promise<T> {
		Promise {
			value: Mutex::new(None),
			notify: Notify::new(),
		}
	}

	/// Resolves the promise and wakes all waiters.
	///
	/// Returns `false` and drops `value` if the promise was already resolved.
	pub fn resolve(&self, value: T) -> bool {
		{
			let mut slot = self.value.lock();
			if slot.is_some() {
				return false;
			}
			*slot = Some(value);
		}
		self.notify.notify_waiters();
		true
	}

	#[must_use]
	pub fn is_resolved(&self) -> bool {
		self.value.lock().is_some()
	}

	/// Returns the resolved value without waiting.
	#[must_use]
	pub fn peek(&self) -> Option<T> {
		self.value.lock().clone()
	}

	/// Waits until the promise is resolved and returns a clone of its value.
	pub async fn wait(&self) -> T {
		loop {
			let notified = self.notify.notified();
			tokio::pin!(notified);
			// register before checking, so a resolve in between is not missed
			notified.as_mut().enable();

			if let Some(value) = self.peek() {
				return value;
			}
			notified.await;
		}
	}
}

impl<T: Clone> Default for Promise<T> {
	fn default() -> Self {
		Promise::new()
	}
}

impl<T: Debug> Debug for Promise<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Promise").field("value", &*self.value.lock()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::{sync::Arc, time::Duration};

	const NUM_CONCURRENT: usize = 256;

	#[tokio::test]
	async fn resolve_accepts_ok_and_err() {
		let p = Promise::<Result<(), String>>::new();
		assert!(p.resolve(Ok(())));
		assert_eq!(p.wait().await, Ok(()));

		let p = Promise::<Result<(), String>>::new();
		assert!(p.resolve(Err("error".into())));
		assert_eq!(p.wait().await, Err("error".into()));
	}

	#[tokio::test]
	async fn ignores_resolutions_after_the_first() {
		let p = Promise::<Result<(), String>>::new();
		assert!(p.resolve(Ok(())));
		assert!(!p.resolve(Err("error".into())));
		assert_eq!(p.wait().await, Ok(()));
		assert_eq!(p.peek(), Some(Ok(())));
	}

	#[tokio::test]
	async fn wait_blocks_until_resolved() {
		let p = Arc::new(Promise::<u32>::new());
		let resolver = Arc::clone(&p);
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(100)).await;
			resolver.resolve(7);
		});
		assert!(!p.is_resolved());
		assert_eq!(p.wait().await, 7);
		assert!(p.is_resolved());
	}

	#[tokio::test]
	async fn wait_returns_previously_resolved_values() {
		let p = Promise::new();
		p.resolve("done");
		assert_eq!(p.wait().await, "done");
		assert_eq!(p.wait().await, "done");
		assert_eq!(p.wait().await, "done");
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn many_tasks_wait_on_a_single_resolve() {
		let p = Arc::new(Promise::<Result<u8, String>>::new());
		let waiters: Vec<_> = (0..NUM_CONCURRENT)
			.map(|_| {
				let p = Arc::clone(&p);
				tokio::spawn(async move { p.wait().await })
			})
			.collect();

		tokio::time::sleep(Duration::from_millis(100)).await;
		p.resolve(Err("error".into()));

		for result in futures::future::join_all(waiters).await {
			assert_eq!(result.unwrap(), Err("error".into()));
		}
	}
}
