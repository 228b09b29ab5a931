// tests/compose.rs

mod common;
use crate::common::{init_tracing, with_timeout, TestResult};

use anyhow::ensure;
use serde_json::json;

use flw::{make, parallel, series, task, BoxTask, Context, FlowKind, FlwError};
use flw_test_utils::builders::{fail_with, set_value, stop_with};

fn write(key: &'static str) -> BoxTask {
    set_value(key, key)
}

/// Step that checks which earlier stages already ran, then writes `key`.
fn expect_then_write(
    key: &'static str,
    present: &'static [&'static str],
    absent: &'static [&'static str],
) -> BoxTask {
    task(move |ctx: Context| async move {
        for k in present {
            ensure!(ctx.get(k) == Some(json!(k)), "{key}: expected {k} to be set");
        }
        for k in absent {
            ensure!(!ctx.contains_key(k), "{key}: expected {k} to be unset");
        }
        ctx.set(key, key);
        Ok(())
    })
}

#[tokio::test]
async fn combination_flow_shares_one_context() -> TestResult {
    init_tracing();

    let output = with_timeout(
        series([
            make::parallel([write("pre_a"), write("pre_b")]),
            make::series([
                expect_then_write("work_a", &["pre_a", "pre_b"], &["post_a", "post_b"]),
                expect_then_write("work_b", &["pre_a", "pre_b"], &["post_a", "post_b"]),
            ]),
            make::parallel([
                expect_then_write("post_a", &["pre_a", "pre_b", "work_a", "work_b"], &[]),
                expect_then_write("post_b", &["pre_a", "pre_b", "work_a", "work_b"], &[]),
            ]),
        ])
        .run(),
    )
    .await?;
    let ctx = output.into_context().expect("expected context");

    for key in ["pre_a", "pre_b", "work_a", "work_b", "post_a", "post_b"] {
        assert_eq!(ctx.get(key), Some(json!(key)), "missing {key}");
    }
    Ok(())
}

#[tokio::test]
async fn made_series_runs_directly_on_new_context() -> TestResult {
    init_tracing();

    let made = make::series([write("pre_a"), write("pre_b")]);
    let ctx = Context::new();
    made.call(ctx.clone()).await?;

    assert_eq!(ctx.get("pre_a"), Some(json!("pre_a")));
    assert_eq!(ctx.get("pre_b"), Some(json!("pre_b")));
    Ok(())
}

#[tokio::test]
async fn made_flow_is_reusable() -> TestResult {
    init_tracing();

    let made = make::parallel([write("pre_a"), write("pre_b")]);

    let first = series([made.clone()]).run().await?;
    let second = series([made]).run().await?;

    let first = first.into_context().expect("expected context");
    let second = second.into_context().expect("expected context");
    assert!(!first.ptr_eq(&second));
    assert_eq!(first.clean(), second.clean());
    Ok(())
}

#[tokio::test]
async fn preconfigured_flow_runs_with_its_own_context_and_key() -> TestResult {
    init_tracing();

    let premade = Context::new();
    premade.set("premade", 1);

    let output = parallel([write("pre_a"), write("pre_b")])
        .with_context(premade.clone())
        .with_result_key("pre_b")
        .run()
        .await?;

    assert_eq!(output.into_value(), Some(json!("pre_b")));
    assert_eq!(premade.get("premade"), Some(json!(1)));
    assert_eq!(premade.get("pre_a"), Some(json!("pre_a")));
    Ok(())
}

#[tokio::test]
async fn nested_flow_uses_the_outer_context() -> TestResult {
    init_tracing();

    let unused = Context::new();
    let inner = series([write("inner")])
        .with_context(unused.clone())
        .with_result_key("inner")
        .into_task();

    let output = series([write("outer"), inner]).run().await?;
    let ctx = output.into_context().expect("expected context");

    assert_eq!(ctx.get("outer"), Some(json!("outer")));
    assert_eq!(ctx.get("inner"), Some(json!("inner")));
    assert!(unused.is_empty());
    Ok(())
}

#[tokio::test]
async fn nested_error_surfaces_with_root_cause() -> TestResult {
    init_tracing();

    let ctx = Context::new();
    let result = series([
        write("pre_a"),
        make::parallel([write("pre_b"), fail_with("someErrorOccured")]),
        write("never"),
    ])
    .with_context(ctx.clone())
    .run()
    .await;

    match result {
        Err(FlwError::TaskFailed {
            kind: FlowKind::Series,
            index,
            source,
        }) => {
            assert_eq!(index, 1);
            assert_eq!(source.root_cause().to_string(), "someErrorOccured");
            let inner = source
                .downcast_ref::<FlwError>()
                .expect("inner flow error preserved");
            assert_eq!(inner.index(), Some(1));
        }
        other => panic!("expected nested TaskFailed, got {other:?}"),
    }
    assert!(!ctx.contains_key("never"));
    Ok(())
}

#[tokio::test]
async fn stop_inside_nested_series_halts_outer_series() -> TestResult {
    init_tracing();

    let output = series([
        make::series([write("a"), stop_with(Some("inner stop")), write("b")]),
        write("c"),
    ])
    .run()
    .await?;
    let ctx = output.into_context().expect("expected context");

    assert_eq!(ctx.stopped().as_deref(), Some("inner stop"));
    assert!(ctx.contains_key("a"));
    assert!(!ctx.contains_key("b"));
    assert!(!ctx.contains_key("c"));
    Ok(())
}

#[tokio::test]
async fn deep_nesting_accumulates_everything() -> TestResult {
    init_tracing();

    let tree = make::parallel([
        make::series([write("a1"), make::parallel([write("a2"), write("a3")])]),
        make::series([make::series([write("b1")]), write("b2")]),
    ]);

    let output = series([tree]).run().await?;
    let ctx = output.into_context().expect("expected context");

    assert_eq!(ctx.keys(), vec!["a1", "a2", "a3", "b1", "b2"]);
    Ok(())
}

#[tokio::test]
async fn flow_builder_then_appends_steps() -> TestResult {
    init_tracing();

    let flow = series([write("first")]).then(write("second"));
    assert_eq!(flow.len(), 2);
    assert_eq!(flow.kind(), FlowKind::Series);

    let output = flow.with_result_key("second").run().await?;
    assert_eq!(output.into_value(), Some(json!("second")));
    Ok(())
}
