//! Tabular rendering of the rental reports for the HTML report page.

use serde::{Deserialize, Serialize};

use crate::models::rental::{ActiveRental, Apartment, DailyIncome, Debtor};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Free,
    Active,
    Debts,
    Income,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Free,
        ReportKind::Active,
        ReportKind::Debts,
        ReportKind::Income,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Free => "Free apartments",
            ReportKind::Active => "Active rentals",
            ReportKind::Debts => "Tenants in debt",
            ReportKind::Income => "Daily income",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ReportKind::Free => "free",
            ReportKind::Active => "active",
            ReportKind::Debts => "debts",
            ReportKind::Income => "income",
        }
    }
}

pub trait ReportRow {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn status_text<T: Serialize>(status: &T) -> String {
    match serde_json::to_value(status) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

impl ReportRow for Apartment {
    const COLUMNS: &'static [&'static str] = &["id", "number", "status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.number.clone(),
            status_text(&self.status),
        ]
    }
}

impl ReportRow for ActiveRental {
    const COLUMNS: &'static [&'static str] = &[
        "full_name",
        "id",
        "apartment_id",
        "tenant_id",
        "status",
        "start_date",
        "end_date",
        "apartment",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.id.to_string(),
            self.apartment_id.to_string(),
            self.tenant_id.to_string(),
            status_text(&self.status),
            self.start_date.to_string(),
            self.end_date.map(|d| d.to_string()).unwrap_or_default(),
            self.apartment.clone(),
        ]
    }
}

impl ReportRow for Debtor {
    const COLUMNS: &'static [&'static str] = &["full_name", "amount", "status", "paid_on"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            format!("{:.2}", self.amount),
            status_text(&self.status),
            self.paid_on.to_string(),
        ]
    }
}

impl ReportRow for DailyIncome {
    const COLUMNS: &'static [&'static str] = &["day", "total"];

    fn cells(&self) -> Vec<String> {
        vec![self.day.to_string(), format!("{:.2}", self.total)]
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn from_rows<T: ReportRow>(records: &[T]) -> Self {
        ReportTable {
            columns: T::COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: records.iter().map(|r| r.cells()).collect(),
        }
    }
}
