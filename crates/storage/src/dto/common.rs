use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    100
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!("page_size must be between 1 and {}", MAX_PAGE_SIZE));
        }
        Ok(())
    }

    /// Rows to skip; widened so any `u32` page and size fit.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = (total_items.max(0) as u64).div_ceil(page_size.max(1) as u64) as u32;
        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, page_size: u32, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, page_size, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_validation() {
        let params = PaginationParams {
            page: 3,
            page_size: 50,
        };
        assert!(params.validate().is_ok());
        assert_eq!(params.offset(), 100);

        let too_large = PaginationParams {
            page: 1,
            page_size: MAX_PAGE_SIZE + 1,
        };
        assert!(too_large.validate().is_err());
    }

    #[test]
    fn test_offset_of_far_page_does_not_overflow() {
        let params = PaginationParams {
            page: 10_000_000,
            page_size: MAX_PAGE_SIZE,
        };
        assert!(params.validate().is_ok());
        assert_eq!(params.offset(), 4_999_999_500);

        let last = PaginationParams {
            page: u32::MAX,
            page_size: MAX_PAGE_SIZE,
        };
        assert_eq!(last.offset(), (u64::from(u32::MAX) - 1) * 500);
        assert!(i64::try_from(last.offset()).is_ok());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(PaginationMeta::new(1, 100, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(1, 100, 100).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 100, 101).total_pages, 2);
    }
}
