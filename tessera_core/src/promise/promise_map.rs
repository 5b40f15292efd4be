use super::Promise;
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};

/// Outcome of [`PromiseMap::get_or_create`].
pub enum PromiseEntry<T> {
	/// No promise existed; the caller owns the work and must resolve and remove it.
	Created(Arc<Promise<T>>),
	/// A promise is already in flight; the caller should wait on it.
	Existing(Arc<Promise<T>>),
}

impl<T> PromiseEntry<T> {
	#[must_use]
	pub fn is_created(&self) -> bool {
		matches!(self, PromiseEntry::Created(_))
	}

	#[must_use]
	pub fn promise(&self) -> &Arc<Promise<T>> {
		match self {
			PromiseEntry::Created(p) | PromiseEntry::Existing(p) => p,
		}
	}
}

/// Thread-safe mapping from a key to its in-flight promise.
pub struct PromiseMap<T> {
	promises: Mutex<HashMap<String, Arc<Promise<T>>>>,
}

impl<T: Clone> PromiseMap<T> {
	#[must_use]
	pub fn new() -> PromiseMap<T> {
		PromiseMap {
			promises: Mutex::new(HashMap::new()),
		}
	}

	/// Returns the promise for `key`, creating it in the same critical section if absent.
	pub fn get_or_create(&self, key: &str) -> PromiseEntry<T> {
		let mut promises = self.promises.lock();
		if let Some(promise) = promises.get(key) {
			return PromiseEntry::Existing(Arc::clone(promise));
		}
		let promise = Arc::new(Promise::new());
		promises.insert(key.to_owned(), Arc::clone(&promise));
		PromiseEntry::Created(promise)
	}

	/// Removes `key`, but only while it still maps to `promise`.
	pub fn remove(&self, key: &str, promise: &Arc<Promise<T>>) -> bool {
		let mut promises = self.promises.lock();
		match promises.get(key) {
			Some(current) if Arc::ptr_eq(current, promise) => {
				promises.remove(key);
				true
			}
			_ => false,
		}
	}

	#[must_use]
	pub fn contains(&self, key: &str) -> bool {
		self.promises.lock().contains_key(key)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.promises.lock().len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.promises.lock().is_empty()
	}
}

impl<T: Clone> Default for PromiseMap<T> {
	fn default() -> Self {
		PromiseMap::new()
	}
}
