use serde::Serialize;

use crate::{Error, Result};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 100;

/// A validated page window. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	page: u32,
	limit: u32,
}
impl PageRequest {
	pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self> {
		let page = match page {
			None => DEFAULT_PAGE,
			Some(value) if value >= 1 && value <= i64::from(u32::MAX) => value as u32,
			Some(_) => {
				return Err(Error::InvalidRequest {
					message: "page must be greater than or equal to 1.".to_string(),
				});
			},
		};
		let limit = match limit {
			None => DEFAULT_LIMIT,
			Some(value) if (1..=i64::from(MAX_LIMIT)).contains(&value) => value as u32,
			Some(_) => {
				return Err(Error::InvalidRequest {
					message: format!("limit must be between 1 and {MAX_LIMIT}."),
				});
			},
		};

		Ok(Self { page, limit })
	}

	pub fn page(&self) -> u32 {
		self.page
	}

	pub fn limit(&self) -> u32 {
		self.limit
	}

	pub fn offset(&self) -> i64 {
		(i64::from(self.page) - 1) * i64::from(self.limit)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
	pub current_page: u32,
	/// Rows actually present in the window, not the requested limit.
	pub items_per_page: u64,
	pub total_items: u64,
	pub total_pages: u64,
}
impl PageMeta {
	pub fn new(request: PageRequest, items_on_page: u64, total_items: u64) -> Self {
		Self {
			current_page: request.page,
			items_per_page: items_on_page,
			total_items,
			total_pages: total_pages(total_items, request.limit),
		}
	}
}

pub fn total_pages(total_items: u64, limit: u32) -> u64 {
	total_items.div_ceil(u64::from(limit.max(1)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_apply_when_absent() {
		let request = PageRequest::new(None, None).expect("defaults are valid");

		assert_eq!(request.page(), 1);
		assert_eq!(request.limit(), 50);
		assert_eq!(request.offset(), 0);
	}

	#[test]
	fn offset_skips_previous_pages() {
		let request = PageRequest::new(Some(3), Some(20)).expect("valid window");

		assert_eq!(request.offset(), 40);
	}

	#[test]
	fn rejects_out_of_range_inputs() {
		for (page, limit) in [(Some(0), None), (Some(-4), None), (None, Some(0)), (None, Some(101))]
		{
			assert!(
				matches!(PageRequest::new(page, limit), Err(Error::InvalidRequest { .. })),
				"Expected page={page:?} limit={limit:?} to be rejected."
			);
		}

		assert!(PageRequest::new(None, Some(100)).is_ok());
	}

	#[test]
	fn total_pages_is_ceiling_division() {
		assert_eq!(total_pages(0, 50), 0);
		assert_eq!(total_pages(1, 50), 1);
		assert_eq!(total_pages(50, 50), 1);
		assert_eq!(total_pages(51, 50), 2);
		assert_eq!(total_pages(1_000, 7), 143);
	}

	#[test]
	fn meta_reports_rows_on_final_partial_page() {
		let request = PageRequest::new(Some(3), Some(10)).expect("valid window");
		let meta = PageMeta::new(request, 5, 25);

		assert_eq!(meta, PageMeta {
			current_page: 3,
			items_per_page: 5,
			total_items: 25,
			total_pages: 3,
		});
	}

	#[test]
	fn windows_cover_every_row_exactly_once() {
		for total in [0_u64, 1, 49, 50, 51, 99, 100, 101, 257] {
			for limit in [1_i64, 7, 50, 100] {
				let pages = total_pages(total, limit as u32);
				let mut covered = Vec::new();

				for page in 1..=pages {
					let request =
						PageRequest::new(Some(page as i64), Some(limit)).expect("valid window");
					let start = request.offset() as u64;
					let end = (start + u64::from(request.limit())).min(total);

					covered.extend(start..end);
				}

				assert_eq!(covered, (0..total).collect::<Vec<_>>(), "total={total} limit={limit}");
			}
		}
	}
}
