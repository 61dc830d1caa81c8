//! Property tests for the cache, the retry policy and the fund lifecycle.

use private_markets::cache::TtlCache;
use private_markets::error::RepositoryError;
use private_markets::models::FundStatus;
use private_markets::resilience::RetryPolicy;
use private_markets::state_machine::FundTransitionGuard;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

const LONG_TTL: Duration = Duration::from_secs(3600);

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("runtime")
}

fn status_strategy() -> impl Strategy<Value = FundStatus> {
    prop::sample::select(FundStatus::ALL.to_vec())
}

/// Keys spread over the three service namespaces
fn namespaced_keys_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        (
            prop::sample::select(vec!["funds:", "investors:", "investments:"]),
            "[a-z0-9]{1,8}",
        )
            .prop_map(|(prefix, suffix)| format!("{prefix}{suffix}")),
        0..40,
    )
}

proptest! {
    /// Inserting N distinct keys into a cache of capacity M < N keeps exactly
    /// the last M and evicts the first N - M
    #[test]
    fn fifo_keeps_most_recent_keys(max_size in 1usize..20, extra in 1usize..40) {
        let cache = TtlCache::new(LONG_TTL, max_size, true);
        let total = max_size + extra;
        for i in 0..total {
            cache.set(&format!("k{i}"), i);
        }

        prop_assert_eq!(cache.len(), max_size);
        for i in 0..extra {
            let key = format!("k{i}");
            prop_assert!(cache.get(&key).is_none());
        }
        for i in extra..total {
            prop_assert_eq!(cache.get(&format!("k{i}")), Some(i));
        }
    }

    /// Overwriting keys never changes the size and never evicts
    #[test]
    fn overwrite_never_evicts(
        max_size in 1usize..20,
        overwrites in prop::collection::vec(any::<prop::sample::Index>(), 1..30),
    ) {
        let cache = TtlCache::new(LONG_TTL, max_size, true);
        for i in 0..max_size {
            cache.set(&format!("k{i}"), 0usize);
        }

        for (round, index) in overwrites.iter().enumerate() {
            let i = index.index(max_size);
            cache.set(&format!("k{i}"), round + 1);
            prop_assert_eq!(cache.len(), max_size);
        }
        for i in 0..max_size {
            let key = format!("k{i}");
            prop_assert!(cache.get(&key).is_some());
        }
    }

    /// Prefix invalidation removes exactly the matching keys
    #[test]
    fn invalidate_removes_exact_prefix(keys in namespaced_keys_strategy()) {
        let cache = TtlCache::new(LONG_TTL, 1000, true);
        for key in &keys {
            cache.set(key, key.clone());
        }

        let expected = keys.iter().filter(|k| k.starts_with("funds:")).count();
        prop_assert_eq!(cache.invalidate(&["funds:"]), expected);

        for key in &keys {
            if key.starts_with("funds:") {
                prop_assert!(cache.get(key).is_none());
            } else {
                prop_assert_eq!(cache.get(key), Some(key.clone()));
            }
        }
    }

    /// An entry is fresh up to and including its TTL and absent afterwards
    #[test]
    fn ttl_boundary(ttl_ms in 1u64..10_000, elapsed_ms in 0u64..20_000) {
        let runtime = paused_runtime();
        let found = runtime.block_on(async {
            let cache = TtlCache::new(Duration::from_millis(ttl_ms), 10, true);
            cache.set("funds:1", 7u32);
            tokio::time::advance(Duration::from_millis(elapsed_ms)).await;
            cache.get("funds:1")
        });

        if elapsed_ms <= ttl_ms {
            prop_assert_eq!(found, Some(7));
        } else {
            prop_assert_eq!(found, None);
        }
    }

    /// A transition is allowed exactly when it does not move backwards
    #[test]
    fn lifecycle_is_forward_only(current in status_strategy(), requested in status_strategy()) {
        let rank = |status: FundStatus| FundStatus::ALL.iter().position(|s| *s == status);
        let allowed = FundTransitionGuard::can_transition(current, requested).is_ok();
        prop_assert_eq!(allowed, rank(requested) >= rank(current));
    }

    /// An always-failing transient operation runs exactly max_retries + 1 times
    #[test]
    fn retry_attempt_count(max_retries in 0u32..6) {
        let runtime = paused_runtime();
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(40),
            jitter: true,
        };

        let result: Result<(), RepositoryError> = runtime.block_on(policy.execute_transient(
            "always_failing",
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(RepositoryError::transient("connection refused"))
            },
        ));

        prop_assert!(result.is_err());
        prop_assert_eq!(calls.load(Ordering::SeqCst), max_retries + 1);
    }
}
