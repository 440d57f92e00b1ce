//! Protocol violations abort loudly and are never reported as failed
//! settlements.

use percolate::coro::{drive, DriverSession, ProtocolViolation, Script, Step, Stepwise};

#[test]
#[should_panic]
fn resume_before_start_panics() {
    let mut script: Script<i32, i32, String> = Script::done(1);
    let _ = script.resume_with_value(1);
}

#[test]
#[should_panic]
fn advance_twice_panics() {
    let mut script: Script<i32, i32, String> = Script::done(1);
    let _ = script.advance();
    let _ = script.advance();
}

#[test]
#[should_panic]
fn resume_after_settlement_panics() {
    let mut script: Script<i32, i32, String> = Script::done(1);
    let _ = script.advance();
    let _ = script.resume_with_value(1);
}

#[tokio::test]
#[should_panic]
async fn continuation_returning_driven_script_panics() {
    let mut stray: Script<i32, i32, String> = Script::suspend(async { Ok(1) }, |outcome| {
        match outcome {
            Ok(value) => Script::done(value),
            Err(err) => Script::fail(err),
        }
    });
    // Driving the stray by hand leaves it mid-run; handing it back from a
    // continuation is a contract breach.
    let _ = stray.advance();
    let script = Script::suspend(async { Ok(2) }, move |_| stray);
    let _ = drive(script).await;
}

/// Stands in for any computation driven off-protocol by a buggy harness.
struct RaisesViolation;

impl Stepwise for RaisesViolation {
    type Resume = i32;
    type Output = i32;
    type Error = String;

    fn advance(&mut self) -> Step<i32, i32, String> {
        Step::suspend(async { Ok(1) })
    }

    fn resume_with_value(&mut self, _value: i32) -> Step<i32, i32, String> {
        ProtocolViolation::ResumeAfterSettlement.raise()
    }

    fn resume_with_failure(&mut self, failure: String) -> Step<i32, i32, String> {
        Step::failure(failure)
    }
}

#[tokio::test]
#[should_panic]
async fn session_re_raises_violation_instead_of_reporting_defect() {
    let session = DriverSession::spawn(RaisesViolation);
    let _ = session.outcome().await;
}

#[test]
fn violation_messages_name_the_breach() {
    assert_eq!(
        ProtocolViolation::ResumeBeforeStart.to_string(),
        "stepwise computation resumed before it was advanced"
    );
    assert_eq!(
        ProtocolViolation::ResumeAfterSettlement.to_string(),
        "stepwise computation resumed after it settled"
    );
    assert_eq!(
        ProtocolViolation::AdvanceAfterStart.to_string(),
        "stepwise computation advanced twice"
    );
    assert_eq!(
        ProtocolViolation::ScriptReused.to_string(),
        "continuation returned a script that was already driven"
    );
}
