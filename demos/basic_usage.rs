//! Basic usage example for the store.

use logkv::{Store, StoreConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Basic Usage: logkv ===");

    let store = Store::open("example_store", StoreConfig::default())?;

    store.put("user:1:name", b"Alice")?;
    store.put("user:1:email", b"alice@example.com")?;
    store.put("user:2:name", b"Bob")?;
    store.put("user:2:email", b"bob@example.com")?;

    let name = store.get("user:1:name")?;
    assert_eq!(name.as_slice(), b"Alice", "Should retrieve Alice's name");
    println!("✓ User 1 name: {}", String::from_utf8_lossy(&name));

    let email = store.get("user:1:email")?;
    assert_eq!(email.as_slice(), b"alice@example.com", "Should retrieve Alice's email");
    println!("✓ User 1 email: {}", String::from_utf8_lossy(&email));

    // Overwrite a key: the old value is shadowed, never removed.
    store.put("user:2:email", b"bob.new@example.com")?;
    let updated_email = store.get("user:2:email")?;
    assert_eq!(updated_email.as_slice(), b"bob.new@example.com");
    println!("✓ User 2 email updated to {}", String::from_utf8_lossy(&updated_email));

    let bob_name = store.get("user:2:name")?;
    assert_eq!(bob_name.as_slice(), b"Bob", "Bob's name should still exist");

    let stats = store.stats()?;
    println!("Store stats: {}", stats);

    store.close()?;
    Ok(())
}
