//! Performance benchmarks for the payroll engine.
//!
//! Covers the bare engine over rosters of 10, 100 and 1000 employees and a
//! full HTTP round trip through `/payroll/calculate`.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{PayrollInputs, generate_payroll};
use payroll_engine::config::{ConfigLoader, PayrollPolicy};
use payroll_engine::models::{
    Employee, Loan, LoanStatus, LoanType, OvertimeRecord, OvertimeStatus, PayPeriod,
};

use axum::{body::Body, http::Request};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tower::ServiceExt;

/// Builds a roster with salaries spread across every contribution band,
/// one approved overtime record per employee and a loan for every third.
fn create_roster(size: usize) -> (Vec<Employee>, Vec<OvertimeRecord>, Vec<Loan>) {
    let date = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
    let mut employees = Vec::with_capacity(size);
    let mut overtime = Vec::with_capacity(size);
    let mut loans = Vec::new();

    for i in 0..size {
        let id = format!("emp_{:04}", i);
        employees.push(Employee {
            id: id.clone(),
            name: format!("Employee {}", i),
            role: "Laborer".to_string(),
            department: "Construction".to_string(),
            monthly_salary: Decimal::new(3_000 + (i as i64 * 997) % 120_000, 0),
        });
        overtime.push(OvertimeRecord {
            id: format!("ot_{:04}", i),
            employee_id: id.clone(),
            date,
            hours: Decimal::new(25, 1),
            rate_multiplier: Decimal::new(125, 2),
            reason: String::new(),
            status: OvertimeStatus::Approved,
        });
        if i % 3 == 0 {
            loans.push(Loan {
                id: format!("loan_{:04}", i),
                employee_id: id,
                loan_type: LoanType::Company,
                total_amount: Decimal::new(20_000, 0),
                remaining_balance: Decimal::new(15_000, 0),
                monthly_amortization: Decimal::new(1_000, 0),
                start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                status: LoanStatus::Active,
            });
        }
    }

    (employees, overtime, loans)
}

/// Benchmark: engine over growing rosters.
fn bench_generate_payroll(c: &mut Criterion) {
    let policy = PayrollPolicy::default();
    let period = PayPeriod::parse("2025-11-16", "2025-11-30").unwrap();

    let mut group = c.benchmark_group("generate_payroll");

    for size in [10usize, 100, 1000] {
        let (employees, overtime, loans) = create_roster(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("employees", size), &size, |b, _| {
            b.iter(|| {
                let inputs = PayrollInputs::new(&employees, &overtime, &loans);
                black_box(generate_payroll(&inputs, &period, &policy).unwrap())
            })
        });
    }

    group.finish();
}

/// Benchmark: `/payroll/calculate` round trip for 100 employees.
fn bench_calculate_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/ph_2025").expect("Failed to load config");
    let router = create_router(AppState::new(config));

    let (employees, overtime, loans) = create_roster(100);
    let body = serde_json::json!({
        "period_start": "2025-11-16",
        "period_end": "2025-11-30",
        "employees": employees,
        "overtime": overtime,
        "loans": loans
    })
    .to_string();

    let mut group = c.benchmark_group("http");
    group.throughput(Throughput::Elements(100));
    group.bench_function("calculate_100", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll/calculate")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_generate_payroll, bench_calculate_endpoint);
criterion_main!(benches);
