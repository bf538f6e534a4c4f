//! Wall-clock benchmark for a full month's solve against a large roster.
//!
//! Run with: cargo run --release --bin bench

use std::time::Instant;

use imaging_roster::demand::build_demands;
use imaging_roster::fixtures::{fixture_month, generate_employees, shift_catalog, FixtureSize};
use imaging_roster::solver::solve_schedule;

fn main() {
    let employees = generate_employees(FixtureSize::Large);
    let shifts = shift_catalog();
    let month = fixture_month();
    let demands = build_demands(month, &shifts).expect("fixture catalog is well-formed");

    println!("Benchmark: monthly roster solve");
    println!("  Employees: {}", employees.len());
    println!("  Demand lines: {}", demands.len());
    println!();

    let start = Instant::now();
    let result = solve_schedule(&employees, &shifts, &demands, None).expect("valid fixture inputs");
    let elapsed = start.elapsed();

    println!("Results:");
    println!("  Feasible: {}", result.feasible);
    println!("  Assignments: {}", result.assignments.len());
    println!("  Time: {:.2?}", elapsed);
}
