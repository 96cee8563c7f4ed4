use criterion::{Criterion, criterion_group, criterion_main};
use sales_advisor::documents::documents_from;
use sales_advisor::records::{read_customers, read_sales_reps, SalesData};
use std::fmt::Write;
use std::hint::black_box;

fn sales_reps_csv(rows: usize) -> String {
    let mut csv = String::from("rep_id,customers,monthly_revenue,target,conversion_rate\n");
    for i in 0..rows {
        let _ = writeln!(
            csv,
            "REP_{},{},{},{},0.{:02}",
            i,
            i % 40,
            100_000 + i * 17,
            150_000 + i * 11,
            i % 100
        );
    }
    csv
}

fn customers_csv(rows: usize) -> String {
    let mut csv = String::from("customer_id,avg_monthly_sales\n");
    for i in 0..rows {
        let _ = writeln!(csv, "CUST_{},{}.5", i, 1_000 + i * 3);
    }
    csv
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let reps = sales_reps_csv(1_000);
    let customers = customers_csv(5_000);

    c.bench_function("load_records", |b| {
        b.iter(|| {
            read_sales_reps(black_box(reps.as_bytes()), "bench").expect("valid reps");
            read_customers(black_box(customers.as_bytes()), "bench").expect("valid customers");
        })
    });

    let data = SalesData {
        sales_reps: read_sales_reps(reps.as_bytes(), "bench").expect("valid reps"),
        customers: read_customers(customers.as_bytes(), "bench").expect("valid customers"),
    };
    c.bench_function("format_documents", |b| {
        b.iter(|| documents_from(black_box(&data)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
