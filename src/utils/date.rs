use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Compact date used in export file names, e.g. 2025-03-17 → "250317".
pub fn yymmdd(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// Date as printed under "Date Issued" on the invoice.
pub fn issued(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
