//! Behavioural tests for the bot lifecycle.

use std::cell::RefCell;

use herald_config::WorkspaceId;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::lifecycle::{LifecycleError, LifecycleState};

use super::support::{self, TestWorld};

type StepResult = Result<(), String>;

#[fixture]
fn world() -> RefCell<TestWorld> {
    support::world()
}

fn parse_count(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|error| format!("invalid count '{raw}': {error}"))
}

#[given("a healthy configuration loader")]
fn given_healthy_loader(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_healthy_loader();
}

#[given("a configuration file without credentials")]
fn given_failing_loader(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_failing_loader();
}

#[given("the platform refuses module {module} in workspace {workspace}")]
fn given_refused_module(
    world: &RefCell<TestWorld>,
    module: String,
    workspace: String,
) -> StepResult {
    let workspace = workspace
        .trim()
        .parse()
        .map(WorkspaceId::new)
        .map_err(|error| format!("invalid workspace '{workspace}': {error}"))?;
    let module = match module.trim() {
        "diagnostics" => "diagnostics",
        "tracker" => "tracker",
        other => return Err(format!("unknown command module '{other}'")),
    };
    world.borrow().platform.refuse_registration(module, workspace);
    Ok(())
}

#[when("the bot runs in the background")]
fn when_bot_runs(world: &RefCell<TestWorld>) {
    world.borrow_mut().start();
}

#[when("shutdown is signalled")]
fn when_shutdown_signalled(world: &RefCell<TestWorld>) {
    let mut world = world.borrow_mut();
    world.shutdown.trigger();
    world.join();
}

#[when("the bot is brought up")]
fn when_brought_up(world: &RefCell<TestWorld>) -> StepResult {
    world
        .borrow_mut()
        .bring_up()
        .map_err(|error| format!("bring-up failed: {error}"))
}

#[when("the bot is shut down")]
fn when_shut_down(world: &RefCell<TestWorld>) -> StepResult {
    world.borrow_mut().shut_down()
}

#[then("the run completes successfully")]
fn then_run_succeeds(world: &RefCell<TestWorld>) -> StepResult {
    match world.borrow().outcome() {
        Some(Ok(())) => Ok(()),
        other => Err(format!("expected a clean run, got {other:?}")),
    }
}

#[then("the run fails with a configuration error")]
fn then_run_fails_on_configuration(world: &RefCell<TestWorld>) -> StepResult {
    match world.borrow().outcome() {
        Some(Err(LifecycleError::Bootstrap(_))) => Ok(()),
        other => Err(format!("expected a configuration error, got {other:?}")),
    }
}

#[then("the session was opened {opens} times and closed {closes} times")]
fn then_session_calls(world: &RefCell<TestWorld>, opens: String, closes: String) -> StepResult {
    let world = world.borrow();
    let expected = (parse_count(&opens)?, parse_count(&closes)?);
    let actual = (world.platform.opens(), world.platform.closes());
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected (opens, closes) {expected:?}, got {actual:?}"))
    }
}

#[then("the platform was never contacted")]
fn then_platform_untouched(world: &RefCell<TestWorld>) {
    let calls = world.borrow().platform.calls();
    assert!(calls.is_empty(), "unexpected platform calls: {calls:?}");
}

#[then("the lifecycle ends disposed")]
fn then_lifecycle_disposed(world: &RefCell<TestWorld>) {
    let states = world.borrow().reporter.states();
    assert_eq!(states.last(), Some(&LifecycleState::Disposed), "{states:?}");
}

#[then("{count} registrations were attempted")]
fn then_registrations_attempted(world: &RefCell<TestWorld>, count: String) -> StepResult {
    let expected = parse_count(&count)?;
    let world = world.borrow();
    let report = world.report().ok_or("no registration report")?;
    if report.attempted() == expected {
        Ok(())
    } else {
        Err(format!("expected {expected} attempts, got {}", report.attempted()))
    }
}

#[then("{count} registrations failed")]
fn then_registrations_failed(world: &RefCell<TestWorld>, count: String) -> StepResult {
    let expected = parse_count(&count)?;
    let world = world.borrow();
    let report = world.report().ok_or("no registration report")?;
    if report.failures().len() == expected {
        Ok(())
    } else {
        Err(format!(
            "expected {expected} failures, got {:?}",
            report.failures()
        ))
    }
}

#[then("the bot is running")]
fn then_bot_running(world: &RefCell<TestWorld>) -> StepResult {
    let state = world.borrow().controller().map(|controller| controller.state());
    match state {
        Some(LifecycleState::Running) => Ok(()),
        other => Err(format!("expected the bot to be running, got {other:?}")),
    }
}

#[then("shutting down again is rejected")]
fn then_second_shutdown_rejected(world: &RefCell<TestWorld>) -> StepResult {
    match world.borrow_mut().shut_down() {
        Err(message) if message.contains("cannot move from disposed") => Ok(()),
        other => Err(format!("expected the second shutdown to be rejected, got {other:?}")),
    }
}

#[scenario(path = "tests/features/lifecycle_run.feature")]
fn lifecycle_run(world: RefCell<TestWorld>) -> Result<(), String> {
    let _ = world;
    Ok(())
}

#[scenario(path = "tests/features/configuration_failure.feature")]
fn configuration_failure(world: RefCell<TestWorld>) -> Result<(), String> {
    let _ = world;
    Ok(())
}

#[scenario(path = "tests/features/command_registration.feature")]
fn command_registration(world: RefCell<TestWorld>) -> Result<(), String> {
    let _ = world;
    Ok(())
}

#[scenario(path = "tests/features/repeated_shutdown.feature")]
fn repeated_shutdown(world: RefCell<TestWorld>) -> Result<(), String> {
    let _ = world;
    Ok(())
}
