use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// One page of a listing plus the total number of rows across all pages.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PageResp<T> {
    pub content: Vec<T>,
    pub total: u64,
}
