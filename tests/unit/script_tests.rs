//! Unit tests for the continuation-passing script builder.

use futures_util::FutureExt;
use percolate::coro::{drive, Script};

#[test]
fn done_settles_without_suspending() {
    let script: Script<(), &'static str, String> = Script::done("ready");
    assert_eq!(drive(script).now_or_never(), Some(Ok("ready")));
}

#[test]
fn fail_settles_without_suspending() {
    let script: Script<(), &'static str, String> = Script::fail("rejected".into());
    assert_eq!(drive(script).now_or_never(), Some(Err("rejected".into())));
}

#[tokio::test]
async fn continuations_chain_in_yield_order() {
    // Each link appends the value its suspension resolved to; the order of
    // the settled list is the order the suspensions were yielded.
    let script: Script<u32, Vec<u32>, String> = Script::suspend(async { Ok(1) }, |first| {
        let mut seen = vec![first.unwrap()];
        Script::suspend(async { Ok(2) }, move |second| {
            seen.push(second.unwrap());
            Script::suspend(async { Ok(3) }, move |third| {
                seen.push(third.unwrap());
                Script::done(seen)
            })
        })
    });
    assert_eq!(drive(script).await, Ok(vec![1, 2, 3]));
}

#[tokio::test]
async fn err_arm_is_the_local_catch_block() {
    let script: Script<u32, u32, String> =
        Script::suspend(async { Err("injected".into()) }, |outcome| match outcome {
            Ok(value) => Script::done(value),
            Err(err) => {
                assert_eq!(err, "injected");
                Script::done(0)
            }
        });
    assert_eq!(drive(script).await, Ok(0));
}

#[tokio::test]
async fn passthrough_continuation_propagates_failure() {
    let script: Script<u32, u32, String> =
        Script::suspend(async { Err("fatal".into()) }, |outcome| match outcome {
            Ok(value) => Script::done(value),
            Err(err) => Script::fail(err),
        });
    assert_eq!(drive(script).await, Err("fatal".into()));
}

#[tokio::test]
async fn fresh_scripts_share_no_state_across_invocations() {
    let build = || {
        Script::<u32, u32, String>::suspend(async { Ok(5) }, |outcome| match outcome {
            Ok(value) => Script::done(value * 2),
            Err(err) => Script::fail(err),
        })
    };
    assert_eq!(drive(build()).await, Ok(10));
    assert_eq!(drive(build()).await, Ok(10));
}
