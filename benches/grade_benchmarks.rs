//! Performance benchmarks for the grade engine.
//!
//! Covers the per-record grade computation, the aggregations over a large
//! set of stored records, and one round trip through the HTTP router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;

use axum::{body::Body, http::Request};
use chrono::Utc;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use tower::ServiceExt;

use grade_engine::api::{AppState, create_router};
use grade_engine::calculation::{
    CourseCatalog, StudentDirectory, calculate_gpa, compute_grade, course_averages, top_students,
};
use grade_engine::config::ConfigLoader;
use grade_engine::gradebook::Gradebook;
use grade_engine::models::{Enrollment, EnrollmentKey, EnrollmentStatus, Scores, Semester};

const COURSES: usize = 40;
const STUDENTS: usize = 500;

fn score(seed: usize) -> Decimal {
    Decimal::new((seed * 37 % 101) as i64, 1)
}

fn catalog() -> CourseCatalog {
    CourseCatalog::from_entries((0..COURSES).map(|i| {
        (
            format!("MH{:05}", i),
            format!("Course {}", i),
            (i % 4 + 1) as u32,
        )
    }))
}

fn directory() -> StudentDirectory {
    StudentDirectory::from_entries(
        (0..STUDENTS).map(|i| (format!("SV{:05}", i), format!("Student {}", i))),
    )
}

/// Builds `count` graded records spread over the students and courses.
fn records(count: usize) -> Vec<Enrollment> {
    let semester: Semester = "HK1-2024".parse().expect("valid semester");
    (0..count)
        .map(|i| {
            let key = EnrollmentKey {
                student_id: format!("SV{:05}", i % STUDENTS),
                course_id: format!("MH{:05}", i % COURSES),
                class_id: "LOP01".to_string(),
                semester,
            };
            let scores = Scores::new(Some(score(i)), Some(score(i + 1)), Some(score(i + 2)));
            Enrollment::new(key, scores, Utc::now())
        })
        .collect()
}

fn bench_compute_grade(c: &mut Criterion) {
    let a = Some(Decimal::from_str("7.33").unwrap());
    let b = Some(Decimal::from_str("8.5").unwrap());
    let cc = Some(Decimal::from_str("9.25").unwrap());

    c.bench_function("compute_grade", |bench| {
        bench.iter(|| {
            black_box(compute_grade(
                black_box(a),
                black_box(b),
                black_box(cc),
                EnrollmentStatus::Normal,
            ))
        })
    });
}

fn bench_aggregations(c: &mut Criterion) {
    let catalog = catalog();
    let directory = directory();

    let mut group = c.benchmark_group("aggregations");
    for count in [1_000usize, 10_000] {
        let records = records(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("calculate_gpa", count), &records, |b, records| {
            b.iter(|| black_box(calculate_gpa(records, &catalog)))
        });
        group.bench_with_input(BenchmarkId::new("course_averages", count), &records, |b, records| {
            b.iter(|| black_box(course_averages(records, &catalog, 5)))
        });
        group.bench_with_input(BenchmarkId::new("top_students", count), &records, |b, records| {
            b.iter(|| black_box(top_students(records, &catalog, &directory, 5, "Unknown")))
        });
    }
    group.finish();
}

fn bench_compute_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    let gradebook = Gradebook::from_config(&config).expect("Failed to seed catalog");
    let router = create_router(AppState::new(gradebook));
    let body = serde_json::json!({"score_a": "7.5", "score_b": "7", "score_c": "6.5"}).to_string();

    c.bench_function("compute_endpoint", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/grades/compute")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_compute_grade,
    bench_aggregations,
    bench_compute_endpoint
);
criterion_main!(benches);
