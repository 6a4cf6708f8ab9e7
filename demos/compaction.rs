//! Demonstrates background compaction triggering automatically once enough
//! segments pile up — there is no manual "compact now" call in the public
//! API; writing enough data is what triggers it.

use logkv::{Store, StoreConfig};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Compaction Example ===\n");

    let config = StoreConfig::default().with_segment_size(4096);
    let store = Store::open("compaction_example", config)?;

    println!("Writing 50 keys, 10 versions each...");
    for round in 0..10 {
        for i in 0..50 {
            let key = format!("key_{}", i);
            let value = format!("value_{}_{}", i, round);
            store.put(&key, value.as_bytes())?;
        }
        println!("  Round {} completed", round + 1);
    }

    let sample = store.get("key_0")?;
    assert_eq!(sample.as_slice(), b"value_0_9", "Key should have the value from the last round");

    let stats_before = store.stats()?;
    println!("\nRight after writing: {}", stats_before);

    // Compaction runs on a background thread once three segments have
    // accumulated; give it a moment to finish before checking again.
    std::thread::sleep(Duration::from_millis(500));

    let stats_after = store.stats()?;
    println!("After letting compaction settle: {}", stats_after);

    for i in 0..50 {
        let key = format!("key_{}", i);
        let expected = format!("value_{}_9", i);
        let value = store.get(&key)?;
        assert_eq!(value.as_slice(), expected.as_bytes(), "Key value should survive compaction");
    }
    println!("\n✓ All 50 keys verified - data integrity preserved through compaction");

    store.close()?;
    Ok(())
}
