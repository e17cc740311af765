//! Dashboard extras: the product spotlight and the first-visit flag.

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::backend::{Storage, StorageError};
use crate::blob::Blob;
use crate::clock::Clock;
use crate::keys::{Keys, names};
use crate::logging::{debug, error, warn};

const DAY_FORMAT: &str = "%Y-%m-%d";
const VISITED: &str = "true";

/// Dashboard state, borrowed from a [`Desk`](crate::Desk).
pub struct Dashboard<'a> {
    product: Blob<'a>,
    picked_on: Blob<'a>,
    first_visit: Blob<'a>,
    clock: &'a dyn Clock,
    catalog: &'a [String],
}

impl<'a> Dashboard<'a> {
    pub(crate) fn new(
        storage: &'a dyn Storage,
        clock: &'a dyn Clock,
        keys: &Keys,
        catalog: &'a [String],
    ) -> Self {
        Self {
            product: Blob::new(storage, keys.key(names::PRODUCT_OF_DAY)),
            picked_on: Blob::new(storage, keys.key(names::PRODUCT_TIMESTAMP)),
            first_visit: Blob::new(storage, keys.key(names::FIRST_VISIT)),
            clock,
            catalog,
        }
    }

    /// Today's spotlight product.
    ///
    /// The first call on a given day picks a catalog product at random and
    /// remembers it; later calls that day return the same product. `None`
    /// when the catalog is empty.
    pub fn product_of_day(&self) -> Option<String> {
        self.product_of_day_with(&mut rand::rng())
    }

    fn product_of_day_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let today = self.clock.today();
        if let Some(product) = self.cached_for(today) {
            return Some(product);
        }

        let product = self.catalog.choose(rng)?.clone();
        match self.remember(&product, today) {
            Ok(()) => {
                debug!(product = %product, day = %today, "picked product of the day");
            }
            Err(err) => {
                error!(error = %err, "failed to store product of the day");
            }
        }
        Some(product)
    }

    fn cached_for(&self, today: NaiveDate) -> Option<String> {
        let read = self
            .picked_on
            .read()
            .and_then(|day| Ok((day, self.product.read()?)));
        match read {
            Ok((Some(day), Some(product))) if !product.is_empty() => {
                let picked = NaiveDate::parse_from_str(day.trim(), DAY_FORMAT).ok()?;
                (picked == today).then_some(product)
            }
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "failed to read product of the day");
                None
            }
        }
    }

    fn remember(&self, product: &str, today: NaiveDate) -> Result<(), StorageError> {
        self.product.write(product)?;
        self.picked_on.write(&today.format(DAY_FORMAT).to_string())
    }

    /// Whether the operator has never been marked as visited.
    pub fn is_first_visit(&self) -> bool {
        match self.first_visit.read() {
            Ok(flag) => flag.as_deref() != Some(VISITED),
            Err(err) => {
                error!(error = %err, "failed to read first-visit flag");
                true
            }
        }
    }

    /// Record that the operator has visited.
    pub fn mark_visited(&self) -> bool {
        match self.first_visit.write(VISITED) {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, "failed to store first-visit flag");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::clock::ManualClock;

    fn catalog() -> Vec<String> {
        ["Vanilla Cream", "Choco Love", "Cherry Kiss"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn clock() -> ManualClock {
        ManualClock::on(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
    }

    #[test]
    fn test_product_of_day_is_stable_within_a_day() {
        let storage = MemoryBackend::new();
        let clock = clock();
        let keys = Keys::default();
        let products = catalog();
        let dashboard = Dashboard::new(&storage, &clock, &keys, &products);

        let first = dashboard.product_of_day().unwrap();
        assert!(products.contains(&first));
        clock.advance(chrono::TimeDelta::hours(6));
        for _ in 0..10 {
            assert_eq!(dashboard.product_of_day().as_ref(), Some(&first));
        }
        assert_eq!(storage.get("rockma_productTimestamp").unwrap().as_deref(), Some("2024-06-10"));
    }

    #[test]
    fn test_product_of_day_repicks_on_new_day() {
        let storage = MemoryBackend::new();
        let clock = clock();
        let keys = Keys::default();
        let products = catalog();
        let dashboard = Dashboard::new(&storage, &clock, &keys, &products);

        storage.set("rockma_productOfDay", "Retired Product").unwrap();
        storage.set("rockma_productTimestamp", "2024-06-09").unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let picked = dashboard.product_of_day_with(&mut rng).unwrap();
        assert!(products.contains(&picked));
        assert_eq!(storage.get("rockma_productOfDay").unwrap(), Some(picked));
        assert_eq!(storage.get("rockma_productTimestamp").unwrap().as_deref(), Some("2024-06-10"));
    }

    #[test]
    fn test_empty_catalog_has_no_spotlight() {
        let storage = MemoryBackend::new();
        let clock = clock();
        let keys = Keys::default();
        let dashboard = Dashboard::new(&storage, &clock, &keys, &[]);
        assert_eq!(dashboard.product_of_day(), None);
        assert_eq!(storage.get("rockma_productOfDay").unwrap(), None);
    }

    #[test]
    fn test_first_visit_flag() {
        let storage = MemoryBackend::new();
        let clock = clock();
        let keys = Keys::default();
        let dashboard = Dashboard::new(&storage, &clock, &keys, &[]);
        assert!(dashboard.is_first_visit());
        assert!(dashboard.mark_visited());
        assert!(!dashboard.is_first_visit());
        assert_eq!(storage.get("rockma_firstVisit").unwrap().as_deref(), Some("true"));
    }
}
