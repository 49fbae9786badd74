use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Slices a fully filtered collection into one page. `total` counts matches
/// before slicing; `total_pages = ceil(total / limit)`.
pub fn paginate<T>(items: Vec<T>, page: Option<u32>, limit: Option<u32>) -> Paginated<T> {
    let page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
    let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
    let total = items.len() as u64;
    let total_pages = total.div_ceil(limit as u64) as u32;
    let offset = ((page - 1) * limit) as usize;

    let data = items
        .into_iter()
        .skip(offset)
        .take(limit as usize)
        .collect();

    Paginated {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_slice_length() {
        let items: Vec<u32> = (0..23).collect();
        let page = paginate(items, Some(3), Some(10));
        assert_eq!(page.data, vec![20, 21, 22]);
        assert!(page.data.len() <= 10);
        assert_eq!(page.pagination.total, 23);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn defaults_when_unset() {
        let items: Vec<u32> = (0..25).collect();
        let page = paginate(items, None, None);
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, 10);
        assert_eq!(page.data.len(), 10);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let items: Vec<u32> = (0..5).collect();
        let page = paginate(items, Some(4), Some(10));
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn exact_multiple_total_pages() {
        let items: Vec<u32> = (0..20).collect();
        let page = paginate(items, Some(1), Some(10));
        assert_eq!(page.pagination.total_pages, 2);
    }
}
