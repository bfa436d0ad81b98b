use std::time::Duration;

/// Process-wide knobs that are not part of the server action itself: the
/// hasher work factor and the credential store deadline.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub hash_memory_cost: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
    pub store_timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(
        hash_memory_cost: u32,
        hash_iterations: u32,
        hash_parallelism: u32,
        store_timeout: Duration,
    ) -> Self {
        Self {
            hash_memory_cost,
            hash_iterations,
            hash_parallelism,
            store_timeout,
        }
    }
}

impl Default for GlobalArgs {
    fn default() -> Self {
        // Argon2id defaults from the argon2 crate, 5s store deadline
        Self {
            hash_memory_cost: 19456,
            hash_iterations: 2,
            hash_parallelism: 1,
            store_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(65536, 3, 4, Duration::from_secs(10));
        assert_eq!(args.hash_memory_cost, 65536);
        assert_eq!(args.hash_iterations, 3);
        assert_eq!(args.hash_parallelism, 4);
        assert_eq!(args.store_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_global_args_default() {
        let args = GlobalArgs::default();
        assert_eq!(args.hash_memory_cost, 19456);
        assert_eq!(args.hash_iterations, 2);
        assert_eq!(args.hash_parallelism, 1);
        assert_eq!(args.store_timeout, Duration::from_secs(5));
    }
}
