//! Shared building blocks for the workspace: logging setup and response types.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn page_resp_serializes_content_and_total() {
        let page = types::PageResp { content: vec![1, 2], total: 7 };
        let v = serde_json::to_value(&page).unwrap();
        assert_eq!(v["total"], 7);
        assert_eq!(v["content"].as_array().map(|a| a.len()), Some(2));
    }
}
