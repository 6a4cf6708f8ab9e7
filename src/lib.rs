//! An append-only, segmented log key-value store.
//!
//! ```no_run
//! use logkv::{Store, StoreConfig};
//!
//! let store = Store::open("./db", StoreConfig::default())?;
//! store.put("hello", b"world")?;
//! assert_eq!(store.get("hello")?.as_slice(), b"world");
//! store.close()?;
//! # Ok::<(), logkv::StoreError>(())
//! ```

mod store;

pub use store::config::{FsyncPolicy, StoreConfig};
pub use store::error::{Result, StoreError};
pub use store::stats::StoreStats;
pub use store::Store;
