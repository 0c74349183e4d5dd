//! Scenario bindings for the session feature file.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::scenario;

use super::TestWorld;

/// Fixture providing the shared BDD world.
#[fixture]
fn world() -> RefCell<TestWorld> {
    super::world()
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Valid content is formatted"
)]
fn formats_valid_content(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Syntax errors block formatting"
)]
fn syntax_errors_block_formatting(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Debug formatting returns the formatter IR"
)]
fn debug_formatting_returns_ir(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Blocked debug formatting returns no IR"
)]
fn blocked_debug_formatting(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "A failed diagnostic pull still closes the file"
)]
fn failed_pull_closes_file(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Linting reports syntax and lint diagnostics"
)]
fn linting_reports_diagnostics(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "A failing printer is freed without output"
)]
fn failing_printer_is_freed(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Operations after shutdown are rejected"
)]
fn operations_after_shutdown(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Shutting down twice is rejected"
)]
fn double_shutdown(world: RefCell<TestWorld>) {
    drop(world);
}
