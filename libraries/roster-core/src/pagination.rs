//! Page arithmetic over a locally held collection.
//!
//! Pages are 1-based. Slices for consecutive pages partition the collection
//! without gaps or overlap; a page past the end is empty rather than an error.

use crate::error::{Result, RosterError};

/// Number of records per page when paging the local snapshot.
pub const PAGE_SIZE: usize = 6;

/// Number of remote pages fetched to seed the local snapshot.
pub const BOOTSTRAP_PAGES: u32 = 2;

/// Number of pages needed to show `total` records, `ceil(total / per_page)`.
///
/// An empty collection has zero pages.
pub fn total_pages(total: usize, per_page: usize) -> u32 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page) as u32
}

/// Borrow the slice of `items` shown on `page`.
///
/// # Errors
///
/// Returns `InvalidInput` for page 0 or a zero page size.
pub fn page_slice<T>(items: &[T], page: u32, per_page: usize) -> Result<&[T]> {
    if page == 0 {
        return Err(RosterError::invalid_input("page numbers start at 1"));
    }
    if per_page == 0 {
        return Err(RosterError::invalid_input("page size must be positive"));
    }

    let start = (page as usize - 1).saturating_mul(per_page);
    if start >= items.len() {
        return Ok(&[]);
    }
    let end = start.saturating_add(per_page).min(items.len());
    Ok(&items[start..end])
}
