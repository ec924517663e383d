use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use cashbook_core::EntryId;
use cashbook_ledger::{CashEntry, EntryDraft, EntryFilter, aggregate, filter, running_balances};
use rust_decimal::Decimal;

fn build_entries(n: usize) -> Vec<CashEntry> {
    (0..n)
        .map(|i| {
            let day = (i % 28) + 1;
            let month = (i / 28) % 12 + 1;
            let statement = if i % 7 == 0 { "Supplier invoice" } else { "Cash sale" };
            let draft = EntryDraft::new(format!("2024-{month:02}-{day:02}"), statement)
                .with_notes(format!("ref {i}"))
                .with_primary(Decimal::new(i as i64 * 125, 2), Decimal::new(i as i64 * 40, 2));
            CashEntry::from_draft(EntryId::new(), draft)
        })
        .collect()
}

fn bench_filter_and_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_then_aggregate");

    for size in [1_000usize, 10_000, 100_000] {
        let entries = build_entries(size);
        let f = EntryFilter::new()
            .with_search("invoice")
            .from_date("2024-03-01")
            .to_date("2024-09-30");

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| {
                let selected = filter(black_box(entries), black_box(&f));
                aggregate(selected)
            })
        });
    }

    group.finish();
}

fn bench_running_balances(c: &mut Criterion) {
    let entries = build_entries(10_000);
    c.bench_function("running_balances_10k", |b| {
        b.iter(|| running_balances(black_box(&entries)))
    });
}

criterion_group!(benches, bench_filter_and_aggregate, bench_running_balances);
criterion_main!(benches);
