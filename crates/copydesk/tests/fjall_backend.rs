//! Durability tests for the fjall backend.

#![cfg(feature = "fjall")]

use std::sync::Arc;

use copydesk::{ContentKind, Desk, FjallBackend, ManualClock, Metadata, Storage, Timeframe};
use tempfile::TempDir;

mod common;

fn open_desk(dir: &TempDir, clock: Arc<ManualClock>) -> anyhow::Result<Desk> {
    let backend = FjallBackend::open(dir.path())?;
    Ok(Desk::new(Arc::new(backend)).with_clock(clock))
}

#[test]
fn test_state_survives_reopen() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = Arc::new(ManualClock::on(common::start_day()));

    {
        let desk = open_desk(&dir, clock.clone())?;
        assert!(desk.drafts().save(ContentKind::Translation, "Hola", Metadata::new()));
        assert!(desk.record_copy("Hola", "Translation", Some("Instagram"), None));
        assert_eq!(desk.streak().touch(), 1);
    }

    clock.advance_days(1);
    let desk = open_desk(&dir, clock.clone())?;
    assert_eq!(desk.drafts().list()[0].content, "Hola");
    assert!(!desk.record_copy("Hola", "Translation", Some("Instagram"), None));
    assert_eq!(desk.streak().touch(), 2);
    assert_eq!(desk.analytics().platform_distribution(Timeframe::Month)[0].name, "Instagram");
    Ok(())
}

#[test]
fn test_raw_backend_operations() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let backend = FjallBackend::open(dir.path())?;

    assert_eq!(backend.get("missing")?, None);
    backend.set("rockma_firstVisit", "true")?;
    backend.set("rockma_streakCount", "3")?;
    assert_eq!(backend.get("rockma_firstVisit")?.as_deref(), Some("true"));
    assert_eq!(backend.keys()?.len(), 2);

    backend.remove("rockma_firstVisit")?;
    backend.remove("rockma_firstVisit")?;
    assert_eq!(backend.get("rockma_firstVisit")?, None);
    assert_eq!(backend.keys()?, vec!["rockma_streakCount".to_string()]);
    Ok(())
}

#[test]
fn test_reset_on_disk() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = Arc::new(ManualClock::on(common::start_day()));
    let desk = open_desk(&dir, clock.clone())?;
    desk.dashboard().mark_visited();
    desk.favorites().save("keep?", ContentKind::RawIdea, Metadata::new());
    assert!(desk.reset());
    drop(desk);

    let desk = open_desk(&dir, clock)?;
    assert!(desk.dashboard().is_first_visit());
    assert!(desk.favorites().is_empty());
    Ok(())
}
