//! Integration tests for detached driver sessions.

use std::time::Duration;

use percolate::coro::{DriverSession, Script};

#[tokio::test]
async fn abandoned_session_still_drives_to_settlement() {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<&'static str>(1);
    let script: Script<(), (), String> = Script::suspend(
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(())
        },
        move |_| {
            let _ = tx.try_send("settled");
            Script::done(())
        },
    );

    // Dropping the outward handle abandons it, not the run.
    drop(DriverSession::spawn(script));

    let observed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("abandoned computation should still settle")
        .expect("channel should stay open");
    assert_eq!(observed, "settled");
}

#[tokio::test]
async fn independent_sessions_run_isolated() {
    let build = |base: u32| {
        Script::<u32, u32, String>::suspend(
            async move {
                tokio::time::sleep(Duration::from_millis(u64::from(base) % 7)).await;
                Ok(base)
            },
            |outcome| match outcome {
                Ok(value) => Script::suspend(async move { Ok(value * 10) }, move |doubled| {
                    match doubled {
                        Ok(scaled) => Script::done(scaled + value),
                        Err(err) => Script::fail(err),
                    }
                }),
                Err(err) => Script::fail(err),
            },
        )
    };

    let sessions: Vec<DriverSession<u32, String>> =
        (1..=4).map(|base| DriverSession::spawn(build(base))).collect();

    let mut outcomes = Vec::new();
    for session in sessions {
        outcomes.push(session.outcome().await.expect("session settles"));
    }
    assert_eq!(outcomes, vec![11, 22, 33, 44]);
}
