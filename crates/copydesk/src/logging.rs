//! Conditional logging macros for library-level tracing.
//!
//! With the `logging` feature these forward to `tracing`; without it they
//! expand to nothing, so the library never forces a subscriber on its host.
//! Because of that, call them only as statements (`debug!(..);`), never as
//! a `match` arm or a block's tail expression.
//!
//! Every public desk operation reports failure as `false` or `None`, so the
//! log is the only place the cause shows up. Events carry the storage key
//! as `key`, and the underlying error as `error` where there is one:
//!
//! - `error`: a backend read or write failed and the operation had no
//!   effect (collection write skipped, streak not persisted).
//! - `warn`: stored data did not parse (corrupt blob, a record kept raw,
//!   a garbled streak value) or an insert was refused as a duplicate.
//! - `info`: store opened, legacy clips read, desk reset.
//! - `debug`: records written or evicted, streak advanced, product picked.
//! - `trace`: single blob parses and store version checks.
//!
//! ```rust,ignore
//! use crate::logging::{debug, warn};
//!
//! debug!(key = %key, op = "insert", count = 3, "collection written");
//! warn!(key = %key, error = %err, "overwriting corrupt collection");
//! ```

/// Very detailed internal steps (individual key reads and writes).
#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { tracing::trace!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

/// Operation details (record saved, streak advanced).
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Lifecycle events (backend opened, data migrated, desk reset).
#[cfg(feature = "logging")]
macro_rules! log_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

/// Handled anomalies (corrupt blob, unreadable record kept raw, duplicate).
#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// Failures converted into a `false`/`None` result.
#[cfg(feature = "logging")]
macro_rules! log_error {
    ($($arg:tt)*) => { tracing::error!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

pub(crate) use log_debug as debug;
pub(crate) use log_error as error;
pub(crate) use log_info as info;
pub(crate) use log_trace as trace;
pub(crate) use log_warn as warn;
