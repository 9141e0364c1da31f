/// Paged listing of users
use crate::error::Result;
use crate::pagination::{page_slice, total_pages, PAGE_SIZE};
use crate::types::User;
use serde::{Deserialize, Serialize};

/// One page of the directory, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    /// Records on this page, in collection order
    pub users: Vec<User>,

    /// 1-based page number
    pub page: u32,

    /// Page size used to cut the collection
    pub per_page: usize,

    /// Size of the whole collection
    pub total: usize,

    /// `ceil(total / per_page)`
    pub total_pages: u32,
}

impl UserPage {
    /// Cut `page` out of a locally held snapshot using the fixed page size.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for page 0.
    pub fn from_snapshot(snapshot: &[User], page: u32) -> Result<Self> {
        let users = page_slice(snapshot, page, PAGE_SIZE)?.to_vec();
        Ok(Self {
            users,
            page,
            per_page: PAGE_SIZE,
            total: snapshot.len(),
            total_pages: total_pages(snapshot.len(), PAGE_SIZE),
        })
    }

    /// True when there are no records on this page
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
