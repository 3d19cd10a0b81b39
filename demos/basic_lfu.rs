//! LFU cache with key-ordered tie-breaking.
//!
//! Run with: cargo run --example basic_lfu

use boundkit::error::ConfigError;
use boundkit::policy::lfu::BoundedLfuCache;

fn main() -> Result<(), ConfigError> {
    let cache: BoundedLfuCache<&str, i32> = BoundedLfuCache::new(3)?;

    cache.set("b", 2);
    cache.set("a", 1);
    cache.set("c", 3);

    cache.get(&"c");
    cache.get(&"c");
    cache.get(&"b");

    for key in ["a", "b", "c"] {
        println!("{key}: frequency {:?}", cache.frequency(&key));
    }

    cache.set("d", 4);
    println!("contains a? {}", cache.contains(&"a"));

    cache.set("e", 5);
    println!("contains d? {}", cache.contains(&"d"));
    Ok(())
}

// Expected output:
// a: frequency Some(1)
// b: frequency Some(2)
// c: frequency Some(3)
// contains a? false
// contains d? false
//
// Explanation: "a" has the lowest counter when "d" arrives. When "e" arrives,
// "d" is alone at counter 1 and is evicted.
