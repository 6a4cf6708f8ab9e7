use logkv::{Store, StoreConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Persistence Example ===");

    // Session 1: write values, then close.
    {
        let store = Store::open("persisted_store", StoreConfig::default())?;
        store.put("session", b"first")?;
        store.put("counter", b"42")?;
        store.put("name", b"Test Store")?;
        println!("✓ Values written: session, counter, name");
        store.close()?;
    }

    // Session 2: reopen, confirm recovery, then overwrite one key.
    {
        let store = Store::open("persisted_store", StoreConfig::default())?;
        assert_eq!(store.get("session")?.as_slice(), b"first", "Session value should persist");
        assert_eq!(store.get("counter")?.as_slice(), b"42", "Counter value should persist");
        assert_eq!(store.get("name")?.as_slice(), b"Test Store", "Name value should persist");
        println!("✓ All data recovered correctly from session 1");

        store.put("counter", b"43")?;
        println!("✓ Counter updated to 43 (old value is shadowed, not removed)");
        store.close()?;
    }

    // Session 3: verify the overwrite survived another reopen.
    {
        let store = Store::open("persisted_store", StoreConfig::default())?;
        assert_eq!(store.get("session")?.as_slice(), b"first", "Session should still persist");
        assert_eq!(store.get("counter")?.as_slice(), b"43", "Counter should reflect the update");
        assert_eq!(store.get("name")?.as_slice(), b"Test Store", "Name should still persist");
        println!("✓ Session, updated counter, and unchanged name verified across reopen");
        store.close()?;
    }

    Ok(())
}
