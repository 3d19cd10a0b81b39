use boundkit::error::ConfigError;
use boundkit::policy::lru::BoundedLruCache;

fn main() -> Result<(), ConfigError> {
    let cache: BoundedLruCache<u32, String> = BoundedLruCache::new(2)?;

    cache.set(1, "alpha".to_string());
    cache.set(2, "beta".to_string());

    if let Some(value) = cache.get(&1) {
        println!("hit 1: {value}");
    }

    cache.set(3, "gamma".to_string());

    println!("contains 2? {}", cache.contains(&2));
    println!("recency: {:?}", cache.keys_by_recency());
    Ok(())
}

// Expected output:
// hit 1: alpha
// contains 2? false
// recency: [3, 1]
//
// Explanation: capacity=2; after get(&1), key 1 is MRU and key 2 is LRU.
// Setting key 3 evicts key 2.
