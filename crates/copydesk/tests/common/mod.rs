//! Common test utilities and fixtures.

#![allow(dead_code)]

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use copydesk::{Desk, ManualClock, MemoryBackend, Storage, StorageError};

/// Day every scenario starts on. A Monday.
pub const START: (i32, u32, u32) = (2024, 6, 10);

pub fn start_day() -> NaiveDate {
    let (y, m, d) = START;
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A desk on a fresh memory backend with a manual clock.
pub struct Fixture {
    pub desk: Desk,
    pub storage: Arc<MemoryBackend>,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_backend(MemoryBackend::new())
    }

    pub fn with_backend(backend: MemoryBackend) -> Self {
        let storage = Arc::new(backend);
        let clock = Arc::new(ManualClock::on(start_day()));
        let desk = Desk::new(storage.clone()).with_clock(clock.clone());
        Self {
            desk,
            storage,
            clock,
        }
    }

    /// Advance one millisecond so the next record gets a fresh id.
    pub fn tick(&self) {
        self.clock.tick();
    }
}

/// A memory backend whose reads can be switched to fail.
#[derive(Default)]
pub struct FlakyBackend {
    inner: MemoryBackend,
    failing: AtomicBool,
}

impl FlakyBackend {
    pub fn fail_reads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Storage for FlakyBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("read interrupted")));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys()
    }
}

/// A desk over a [`FlakyBackend`].
pub fn flaky_desk() -> (Desk, Arc<FlakyBackend>, Arc<ManualClock>) {
    let storage = Arc::new(FlakyBackend::default());
    let clock = Arc::new(ManualClock::on(start_day()));
    let desk = Desk::new(storage.clone()).with_clock(clock.clone());
    (desk, storage, clock)
}
