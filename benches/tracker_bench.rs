//! Benchmarks for the tracker's derived views
//!
//! Run with: cargo bench

use chrono::{Days, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use symptom_tracker::tracker::*;

fn tracker_with_days(days: u64) -> Tracker {
    let start = NaiveDate::from_ymd_opt(2023, 3, 16).unwrap();
    let mut tracker = Tracker::starting_on(TrackerOptions::default(), start);

    for i in 0..days {
        let date = start.checked_add_days(Days::new(i)).unwrap();
        for (n, symptom) in Symptom::all().iter().enumerate() {
            let value = Rating::clamped(((i as i64) + n as i64 * 3) % 11);
            tracker.update_draft_field(DraftUpdate::Rating(*symptom, value));
        }
        tracker.update_draft_field(DraftUpdate::Stool(i % 2 == 0));
        tracker.update_draft_field(DraftUpdate::Date(date));
        tracker.submit_entry_on(start);
    }
    tracker
}

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit");
    group.throughput(Throughput::Elements(365));

    group.bench_function("submit_365_days", |b| {
        b.iter(|| black_box(tracker_with_days(365)))
    });

    group.finish();
}

fn bench_chart(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart");
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();

    for window in ChartWindow::all() {
        let mut tracker = tracker_with_days(365);
        tracker.set_chart_window(*window);

        group.bench_function(format!("series_{}", window), |b| {
            b.iter(|| tracker.derive_chart_series_at(black_box(now)))
        });

        group.bench_function(format!("view_{}", window), |b| {
            b.iter(|| tracker.chart_view_at(black_box(now)))
        });
    }

    group.finish();
}

fn bench_calendar(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar");
    let tracker = tracker_with_days(365);
    let month = DisplayMonth::new(2023, 9).unwrap();

    group.throughput(Throughput::Elements(GRID_CELLS as u64));
    group.bench_function("cells_365_records", |b| {
        b.iter(|| derive_cells(black_box(month), WeekStart::Sunday, tracker.records()))
    });

    group.finish();
}

criterion_group!(benches, bench_submit, bench_chart, bench_calendar);
criterion_main!(benches);
