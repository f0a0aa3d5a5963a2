use crate::models::PaginationMeta;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Extract `_meta.currentPage/totalPages/totalCount` from a list envelope.
///
/// Absent or non-numeric fields read as zero, so this never fails.
pub fn parse_pagination_meta(response: &Value) -> PaginationMeta {
    meta_from(response.get("_meta"))
}

/// Serde hook for `Page::meta`, applying the same zero defaults as
/// `parse_pagination_meta`.
pub(crate) fn deserialize_pagination_meta<'de, D>(
    deserializer: D,
) -> Result<PaginationMeta, D::Error>
where
    D: Deserializer<'de>,
{
    let meta = Value::deserialize(deserializer)?;
    Ok(meta_from(Some(&meta)))
}

fn meta_from(meta: Option<&Value>) -> PaginationMeta {
    PaginationMeta {
        current_page: read_count(meta, "currentPage"),
        total_pages: read_count(meta, "totalPages"),
        total_count: read_count(meta, "totalCount"),
    }
}

fn read_count(meta: Option<&Value>, key: &str) -> u64 {
    meta.and_then(|m| m.get(key))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}
