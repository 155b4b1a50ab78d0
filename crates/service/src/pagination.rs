//! Page parameters shared by the admin list endpoints.

use serde::Deserialize;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// `?page=&per_page=` as sent by clients. `page` is 1-based; out-of-range
/// values are clamped rather than rejected.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: DEFAULT_PER_PAGE } }
}

impl Pagination {
    /// 0-based index for SeaORM's `fetch_page`; page 0 reads as page 1.
    pub fn index(&self) -> u64 {
        u64::from(self.page.max(1) - 1)
    }

    pub fn size(&self) -> u64 {
        u64::from(self.per_page.clamp(1, MAX_PER_PAGE))
    }
}
