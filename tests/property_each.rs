// tests/property_each.rs

use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;

use flw::{each_limit, parallel, series, task, BoxTask, Context};
use flw_test_utils::builders::ConcurrencyProbe;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("build test runtime")
}

/// Step that yields `yields` times before appending `label` to `"trail"`.
fn trail_step(label: usize, yields: u8) -> BoxTask {
    task(move |ctx: Context| async move {
        for _ in 0..yields {
            tokio::task::yield_now().await;
        }
        ctx.update(|data| {
            let trail = data.entry("trail".to_string()).or_insert_with(|| json!([]));
            if let Some(items) = trail.as_array_mut() {
                items.push(json!(label));
            }
        });
        Ok(())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn each_output_follows_input_order(
        delays in proptest::collection::vec(0..4u64, 0..24),
        limit in 0..6usize,
    ) {
        let rt = runtime();
        let probe = ConcurrencyProbe::new();
        let tracked = probe.clone();
        let items: Vec<(usize, u64)> = delays.iter().copied().enumerate().collect();

        let results = rt.block_on(each_limit(items, limit, move |(index, delay)| {
            let probe = tracked.clone();
            async move {
                probe.enter();
                tokio::time::sleep(Duration::from_millis(delay)).await;
                probe.exit();
                Ok(index * 10)
            }
        }));

        let results = results.map_err(|e| TestCaseError::fail(e.to_string()))?;
        let expected: Vec<usize> = (0..delays.len()).map(|i| i * 10).collect();
        prop_assert_eq!(results, expected);
        prop_assert!(probe.max() <= limit.max(1));
    }

    #[test]
    fn series_completes_steps_in_list_order(
        yields in proptest::collection::vec(0..5u8, 0..16),
    ) {
        let rt = runtime();
        let steps: Vec<BoxTask> = yields
            .iter()
            .enumerate()
            .map(|(label, &n)| trail_step(label, n))
            .collect();

        let output = rt
            .block_on(series(steps).with_result_key("trail").run())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let trail = output.value_as::<Vec<usize>>().unwrap_or_default();
        prop_assert_eq!(trail, (0..yields.len()).collect::<Vec<_>>());
    }

    #[test]
    fn parallel_runs_every_step_exactly_once(
        yields in proptest::collection::vec(0..5u8, 0..16),
    ) {
        let rt = runtime();
        let steps: Vec<BoxTask> = yields
            .iter()
            .enumerate()
            .map(|(label, &n)| trail_step(label, n))
            .collect();

        let output = rt
            .block_on(parallel(steps).with_result_key("trail").run())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut trail = output.value_as::<Vec<usize>>().unwrap_or_default();
        trail.sort_unstable();
        prop_assert_eq!(trail, (0..yields.len()).collect::<Vec<_>>());
    }
}
