use anyhow::{Result, anyhow};
use futures::FutureExt;
use std::{
	any::Any,
	future::Future,
	panic::AssertUnwindSafe,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
};
use tessera_core::{
	Blob,
	promise::{Promise, PromiseEntry, PromiseMap},
};

/// Outcome of one generation, shared by every caller that waited for it.
pub type GenerationResult = Result<Arc<Blob>, Arc<anyhow::Error>>;

/// Counters since the coordinator was created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorStats {
	/// Calls to [`GenerationCoordinator::coordinate`].
	pub total: u64,
	/// Calls that waited for a generation already in flight.
	pub coalesced: u64,
	/// Calls that started a generation.
	pub generated: u64,
}

/// Ensures at most one generation per fingerprint is in flight.
pub struct GenerationCoordinator {
	promises: Arc<PromiseMap<GenerationResult>>,
	total: AtomicU64,
	coalesced: AtomicU64,
	generated: AtomicU64,
}

impl GenerationCoordinator {
	#[must_use]
	pub fn new() -> GenerationCoordinator {
		GenerationCoordinator {
			promises: Arc::new(PromiseMap::new()),
			total: AtomicU64::new(0),
			coalesced: AtomicU64::new(0),
			generated: AtomicU64::new(0),
		}
	}

	/// Returns the result of the generation for `fingerprint`.
	///
	/// If none is in flight, `generate` is called and its future is spawned as
	/// a separate task, so dropping this call does not cancel it for other
	/// waiters. Otherwise `generate` is not called and the result of the
	/// running generation is awaited.
	pub async fn coordinate<F, Fut>(&self, fingerprint: &str, generate: F) -> GenerationResult
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<Blob>> + Send + 'static,
	{
		self.total.fetch_add(1, Ordering::Relaxed);

		let promise = match self.promises.get_or_create(fingerprint) {
			PromiseEntry::Existing(promise) => {
				self.coalesced.fetch_add(1, Ordering::Relaxed);
				log::debug!("join generation of '{fingerprint}'");
				return promise.wait().await;
			}
			PromiseEntry::Created(promise) => promise,
		};

		self.generated.fetch_add(1, Ordering::Relaxed);
		log::debug!("start generation of '{fingerprint}'");

		let in_flight = InFlight {
			promises: Arc::clone(&self.promises),
			fingerprint: fingerprint.to_owned(),
			promise: Arc::clone(&promise),
		};
		let future = generate();
		let handle = tokio::spawn(async move {
			let result = match AssertUnwindSafe(future).catch_unwind().await {
				Ok(Ok(blob)) => Ok(Arc::new(blob)),
				Ok(Err(err)) => Err(Arc::new(err)),
				Err(panic) => Err(Arc::new(anyhow!("generation panicked: {}", panic_message(panic.as_ref())))),
			};
			in_flight.finish(result)
		});

		match handle.await {
			Ok(result) => result,
			// the task was cancelled; its guard has resolved the promise
			Err(_) => promise.wait().await,
		}
	}

	#[must_use]
	pub fn is_in_flight(&self, fingerprint: &str) -> bool {
		self.promises.contains(fingerprint)
	}

	#[must_use]
	pub fn in_flight(&self) -> usize {
		self.promises.len()
	}

	#[must_use]
	pub fn stats(&self) -> CoordinatorStats {
		CoordinatorStats {
			total: self.total.load(Ordering::Relaxed),
			coalesced: self.coalesced.load(Ordering::Relaxed),
			generated: self.generated.load(Ordering::Relaxed),
		}
	}
}

impl Default for GenerationCoordinator {
	fn default() -> Self {
		GenerationCoordinator::new()
	}
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
	if let Some(message) = panic.downcast_ref::<&str>() {
		*message
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message.as_str()
	} else {
		"unknown panic"
	}
}

/// Owns an in-flight entry. Resolves the promise and then removes it, also
/// when the generation task is dropped before finishing.
struct InFlight {
	promises: Arc<PromiseMap<GenerationResult>>,
	fingerprint: String,
	promise: Arc<Promise<GenerationResult>>,
}

impl InFlight {
	fn finish(self, result: GenerationResult) -> GenerationResult {
		self.promise.resolve(result.clone());
		result
	}
}

impl Drop for InFlight {
	fn drop(&mut self) {
		if !self.promise.is_resolved() {
			log::warn!("generation of '{}' was abandoned", self.fingerprint);
			self
				.promise
				.resolve(Err(Arc::new(anyhow!("generation of '{}' was abandoned", self.fingerprint))));
		}
		self.promises.remove(&self.fingerprint, &self.promise);
	}
}
