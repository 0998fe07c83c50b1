//! Spreadsheet export of filtered invoice rows
//!
//! The workbook is built entirely in memory; the caller receives the byte
//! buffer and the download filename and is responsible for delivering both
//! as a file attachment.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::error::ApiError;
use super::invoice::InvoiceRow;

/// Worksheet name used for every export
pub const SHEET_NAME: &str = "Report";

/// MIME type of the produced workbook
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Fixed column order: company, description, amount, due date, payment date,
/// status label, barcode
const HEADERS: [&str; 7] = [
    "Company",
    "Description",
    "Amount",
    "Due Date",
    "Payment Date",
    "Status",
    "Barcode",
];

/// An in-memory export artifact
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Render the row set into an XLSX workbook.
///
/// The `Status` column is derived per row ("Paid" when a payment date is
/// set, "Pending" otherwise) and never stored. An empty row set still
/// produces a well-formed workbook with the header row intact.
pub fn write_report(
    rows: &[InvoiceRow],
    year: i32,
    month: Option<u32>,
) -> Result<ExportFile, ApiError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, &row.company_name)?;
        worksheet.write_string(r, 1, &row.invoice.description)?;
        match row.invoice.amount.to_f64() {
            Some(amount) => worksheet.write_number(r, 2, amount)?,
            None => worksheet.write_string(r, 2, row.invoice.amount.to_string())?,
        };
        worksheet.write_string(r, 3, row.invoice.due_date.to_string())?;
        let paid_on = row
            .invoice
            .paid_on
            .map(|d| d.to_string())
            .unwrap_or_default();
        worksheet.write_string(r, 4, paid_on)?;
        worksheet.write_string(r, 5, status_label(row))?;
        worksheet.write_string(r, 6, &row.invoice.barcode)?;
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(ExportFile {
        bytes,
        filename: export_filename(year, month),
    })
}

/// `Financial_Report_{month}_{year}.xlsx` for a monthly export,
/// `Annual_Report_{year}.xlsx` for a whole year
pub fn export_filename(year: i32, month: Option<u32>) -> String {
    match month {
        Some(month) => format!("Financial_Report_{}_{}.xlsx", month, year),
        None => format!("Annual_Report_{}.xlsx", year),
    }
}

fn status_label(row: &InvoiceRow) -> &'static str {
    if row.invoice.is_paid() { "Paid" } else { "Pending" }
}

impl From<XlsxError> for ApiError {
    fn from(err: XlsxError) -> Self {
        ApiError::internal(format!("failed to build workbook: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::io::Cursor;
    use uuid::Uuid;

    use crate::core::invoice::Invoice;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(company: &str, barcode: &str, paid_on: Option<NaiveDate>) -> InvoiceRow {
        InvoiceRow {
            invoice: Invoice::new(
                "services".to_string(),
                dec!(125.50),
                date(2024, 3, 10),
                paid_on,
                barcode.to_string(),
                Uuid::new_v4(),
            ),
            company_name: company.to_string(),
        }
    }

    fn read_sheet(bytes: Vec<u8>) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).expect("valid workbook");
        workbook.worksheet_range(SHEET_NAME).expect("report sheet")
    }

    #[test]
    fn filename_follows_the_monthly_and_annual_conventions() {
        assert_eq!(export_filename(2024, Some(3)), "Financial_Report_3_2024.xlsx");
        assert_eq!(export_filename(2024, None), "Annual_Report_2024.xlsx");
    }

    #[test]
    fn empty_row_set_still_produces_a_valid_workbook() {
        let file = write_report(&[], 2024, None).unwrap();
        assert_eq!(file.filename, "Annual_Report_2024.xlsx");

        let range = read_sheet(file.bytes);
        assert_eq!(range.height(), 1, "header row only");
        assert_eq!(range.width(), HEADERS.len());
        assert_eq!(
            range.get_value((0, 0)),
            Some(&Data::String("Company".to_string()))
        );
    }

    #[test]
    fn exported_rows_round_trip_with_matching_status_labels() {
        let rows = vec![
            row("ACME", "0001", None),
            row("Globex", "0002", Some(date(2024, 3, 12))),
            row("Initech", "0003", None),
        ];

        let file = write_report(&rows, 2024, Some(3)).unwrap();
        assert_eq!(file.filename, "Financial_Report_3_2024.xlsx");

        let range = read_sheet(file.bytes);
        assert_eq!(range.height(), rows.len() + 1);

        for (i, input) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            let expected = if input.invoice.is_paid() { "Paid" } else { "Pending" };
            assert_eq!(
                range.get_value((r, 5)),
                Some(&Data::String(expected.to_string())),
                "status label must match payment-date nullity"
            );
            assert_eq!(
                range.get_value((r, 0)),
                Some(&Data::String(input.company_name.clone()))
            );
            assert_eq!(
                range.get_value((r, 6)),
                Some(&Data::String(input.invoice.barcode.clone()))
            );
        }
    }

    #[test]
    fn amounts_and_dates_land_in_their_columns() {
        let rows = vec![row("ACME", "0001", Some(date(2024, 3, 12)))];
        let file = write_report(&rows, 2024, Some(3)).unwrap();
        let range = read_sheet(file.bytes);

        assert_eq!(range.get_value((1, 2)), Some(&Data::Float(125.5)));
        assert_eq!(
            range.get_value((1, 3)),
            Some(&Data::String("2024-03-10".to_string()))
        );
        assert_eq!(
            range.get_value((1, 4)),
            Some(&Data::String("2024-03-12".to_string()))
        );
    }
}
