//! Property-style tests for the filter partition and the aggregation engine
//!
//! These drive the store and the report computation directly, without the
//! HTTP layer, over generated row sets.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::collections::HashSet;

use payables::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A spread of invoices across months, years, companies and payment states
async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();

    let mut companies = Vec::new();
    for (name, tax_id) in [("ACME", "111"), ("Globex", "222"), ("Initech", "333")] {
        let company = store
            .create_company(Company::new(name.to_string(), tax_id.to_string()))
            .await
            .unwrap();
        companies.push(company);
    }

    // Due dates walk through the year; every third invoice is paid, amounts
    // vary by index to avoid accidental ties.
    let mut barcode = 0u32;
    for month in 1..=12u32 {
        for (i, company) in companies.iter().enumerate() {
            barcode += 1;
            let due = date(2024, month, (i as u32 * 7 + 1).min(28));
            let paid_on = (barcode % 3 == 0).then(|| date(2024, month, 28));
            let amount = Decimal::from(barcode * 10 + i as u32);
            store
                .create_invoice(Invoice::new(
                    format!("invoice {}", barcode),
                    amount,
                    due,
                    paid_on,
                    format!("bc-{:04}", barcode),
                    company.id,
                ))
                .await
                .unwrap();
        }
    }

    // Out-of-year rows that must never leak into a 2024 report
    let outsider = store
        .create_company(Company::new("Umbrella".to_string(), "444".to_string()))
        .await
        .unwrap();
    for (barcode, due) in [("old-1", date(2023, 12, 31)), ("new-1", date(2025, 1, 1))] {
        store
            .create_invoice(Invoice::new(
                "out of range".to_string(),
                dec!(100000),
                due,
                None,
                barcode.to_string(),
                outsider.id,
            ))
            .await
            .unwrap();
    }

    store
}

#[tokio::test]
async fn status_filters_partition_the_full_invoice_set() {
    let store = seeded_store().await;
    let today = date(2024, 6, 15);

    let all = store
        .filter_invoices(&InvoiceFilter::default(), today)
        .await
        .unwrap();

    let mut seen = HashSet::new();
    let mut partitioned = 0usize;
    for status in [StatusFilter::Paid, StatusFilter::Overdue, StatusFilter::Open] {
        let filter = InvoiceFilter {
            status: Some(status),
            ..InvoiceFilter::default()
        };
        let rows = store.filter_invoices(&filter, today).await.unwrap();
        partitioned += rows.len();
        for row in rows {
            assert!(
                seen.insert(row.invoice.id),
                "invoice matched more than one status filter"
            );
        }
    }

    assert_eq!(partitioned, all.len(), "no invoice is omitted");
}

#[tokio::test]
async fn monthly_totals_sum_to_the_filtered_year_total() {
    let store = seeded_store().await;
    let today = date(2024, 6, 15);

    let rows = store
        .filter_invoices(&InvoiceFilter::for_year(2024), today)
        .await
        .unwrap();
    let year_total: Decimal = rows.iter().map(|r| r.invoice.amount).sum();

    let FinancialReport::Year { monthly, .. } = compute_yearly_report(&rows, 2024) else {
        panic!("expected a populated report");
    };

    let monthly_total: Decimal = monthly.values().map(|m| m.total_value).sum();
    let monthly_count: u64 = monthly.values().map(|m| m.count).sum();

    assert_eq!(monthly_total, year_total);
    assert_eq!(monthly_count as usize, rows.len());
    assert_eq!(monthly.len(), 12, "the seed covers every month");
}

#[tokio::test]
async fn paid_counts_match_payment_date_nullity() {
    let store = seeded_store().await;
    let today = date(2024, 6, 15);

    let rows = store
        .filter_invoices(&InvoiceFilter::for_year(2024), today)
        .await
        .unwrap();
    let paid_rows = rows.iter().filter(|r| r.invoice.is_paid()).count() as u64;

    let FinancialReport::Year { monthly, .. } = compute_yearly_report(&rows, 2024) else {
        panic!("expected a populated report");
    };

    let paid_total: u64 = monthly.values().map(|m| m.paid_count).sum();
    assert_eq!(paid_total, paid_rows);
}

#[tokio::test]
async fn ranking_is_capped_and_excludes_companies_without_rows_in_the_year() {
    let store = seeded_store().await;
    let today = date(2024, 6, 15);

    let rows = store
        .filter_invoices(&InvoiceFilter::for_year(2024), today)
        .await
        .unwrap();

    let FinancialReport::Year { top_suppliers, .. } = compute_yearly_report(&rows, 2024) else {
        panic!("expected a populated report");
    };

    assert!(top_suppliers.len() <= 5);
    assert!(
        !top_suppliers.contains_key("Umbrella"),
        "companies with no 2024 invoices never rank, whatever their totals elsewhere"
    );

    let totals: Vec<Decimal> = top_suppliers.values().copied().collect();
    for pair in totals.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn month_scoped_rows_feed_the_export_with_the_same_count() {
    let store = seeded_store().await;
    let today = date(2024, 6, 15);

    let rows = store
        .filter_invoices(&InvoiceFilter::for_month(2024, 3), today)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3, "one invoice per company in March");

    let file = write_report(&rows, 2024, Some(3)).unwrap();
    assert_eq!(file.filename, "Financial_Report_3_2024.xlsx");
    assert!(!file.bytes.is_empty());
}
