//! Roster page models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::employee::Employee;

/// Number of pages shown on each side of the current page in the navigation window
pub const PAGE_WINDOW: u32 = 2;

/// One roster row: employee fields plus values derived at query time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterItem {
    #[serde(flatten)]
    pub employee: Employee,
    pub total_hours: Decimal,
    pub clocked_in: bool,
    /// hourly_rate × total_hours
    pub earnings: Decimal,
}

/// One page of the roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPage {
    pub items: Vec<RosterItem>,
    /// 1-indexed
    pub page: u32,
    pub per_page: u32,
    /// Number of matching employees across all pages
    pub total: u64,
    /// Total page count, never below 1
    #[serde(rename = "pages")]
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    /// First page of the navigation window
    pub start_page: u32,
    /// Last page of the navigation window
    pub end_page: u32,
}

impl RosterPage {
    /// Build a page from already-sliced items.
    ///
    /// `per_page` must be positive; callers validate it.
    pub fn new(items: Vec<RosterItem>, total: u64, page: u32, per_page: u32) -> Self {
        let total_pages = total_pages(total, per_page);
        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
            has_prev: page > 1,
            has_next: page < total_pages,
            start_page: page.saturating_sub(PAGE_WINDOW).max(1),
            end_page: page.saturating_add(PAGE_WINDOW).min(total_pages),
        }
    }
}

/// `ceil(total / per_page)`, at least 1
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 1;
    }
    let pages = total.div_ceil(per_page as u64);
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}
