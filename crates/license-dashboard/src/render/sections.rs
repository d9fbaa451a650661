//! Section renderers.
//!
//! Pure functions: each maps a collection to a `<tbody>` fragment, with a
//! single full-width placeholder row for an empty collection. Rows come out
//! in input order and every text field is escaped.

use crate::domain::{
    ClientUsage, EditionCount, ExpiringLicense, ModuleUsage, SummaryStats, TrendPoint,
};

use super::html::{escape_html, row, table_body, Cell};
use super::targets::Slot;

/// Placeholder for empty two-column tables
pub const NO_DATA_MESSAGE: &str = "No data";

/// Column counts per table
pub const TWO_COLUMNS: usize = 2;
pub const EXPIRING_COLUMNS: usize = 4;

/// Top clients: `NAME (CODE)` | count.
pub fn render_top_clients(clients: &[ClientUsage]) -> String {
    table_body(clients, TWO_COLUMNS, NO_DATA_MESSAGE, |client| {
        let label = if client.code.is_empty() {
            escape_html(&client.name)
        } else {
            format!("{} ({})", escape_html(&client.name), escape_html(&client.code))
        };
        let count = client.count.to_string();
        row(&[Cell::text(&label), Cell::right(&count)])
    })
}

/// Top modules: module | count.
pub fn render_top_modules(modules: &[ModuleUsage]) -> String {
    table_body(modules, TWO_COLUMNS, NO_DATA_MESSAGE, |module| {
        let name = escape_html(&module.module);
        let count = module.count.to_string();
        row(&[Cell::text(&name), Cell::right(&count)])
    })
}

/// Placeholder for an empty expiring-licenses table.
pub fn no_expiring_message(horizon_days: u32) -> String {
    format!("No license expires in the next {horizon_days} days")
}

/// Expiring licenses: name | client | expiry date | days-left badge.
pub fn render_expiring_licenses(licenses: &[ExpiringLicense], horizon_days: u32) -> String {
    table_body(
        licenses,
        EXPIRING_COLUMNS,
        &no_expiring_message(horizon_days),
        |lic| {
            let name = escape_html(&lic.name);
            let client = escape_html(&lic.client);
            let date = escape_html(&lic.expiry_date);
            let badge = format!(
                "<span class=\"badge badge-warning\">{} days</span>",
                lic.days_left
            );
            row(&[
                Cell::text(&name),
                Cell::text(&client),
                Cell::text(&date),
                Cell::text(&badge),
            ])
        },
    )
}

/// Edition breakdown: edition | count.
pub fn render_editions(editions: &[EditionCount]) -> String {
    table_body(editions, TWO_COLUMNS, NO_DATA_MESSAGE, |edition| {
        let name = escape_html(&edition.edition);
        let count = edition.count.to_string();
        row(&[Cell::text(&name), Cell::right(&count)])
    })
}

/// Monthly trend: label (or month) | count.
pub fn render_trends(points: &[TrendPoint]) -> String {
    table_body(points, TWO_COLUMNS, NO_DATA_MESSAGE, |point| {
        let label = if point.label.is_empty() {
            escape_html(&point.month)
        } else {
            escape_html(&point.label)
        };
        let count = point.count.to_string();
        row(&[Cell::text(&label), Cell::right(&count)])
    })
}

/// The four scalar counters. A missing summary shows zeros.
pub fn render_summary(stats: Option<&SummaryStats>) -> [(Slot, String); 4] {
    let stats = stats.copied().unwrap_or_default();
    [
        (Slot::StatTotal, stats.total.to_string()),
        (Slot::StatActive, stats.active.to_string()),
        (Slot::StatExpired, stats.expired.to_string()),
        (Slot::StatExpiring, stats.expiring_soon.to_string()),
    ]
}

/// Error banner for a failed load cycle.
pub fn render_error_banner(message: &str) -> String {
    format!(
        "<div class=\"alert alert-danger\" role=\"alert\">Failed to load license statistics: {}</div>",
        escape_html(message)
    )
}
