//! Query parameter parsing for the paged list endpoint.

use rocket_okapi::okapi::schemars::JsonSchema;

use crate::error::ApiError;

/// Raw paging query parameters.
///
/// Both arrive as strings and stay that way until [`parse`] runs, so a
/// missing, non-numeric, zero, or negative value all fail the same check
/// instead of silently falling back to a default.
///
/// [`parse`]: PageParams::parse
#[derive(Debug, Clone, JsonSchema, rocket::form::FromForm)]
pub struct PageParams {
    pub page: Option<String>,
    #[field(name = "perPage")]
    pub per_page: Option<String>,
}

impl PageParams {
    pub fn parse(&self) -> Result<(i64, i64), ApiError> {
        match (
            parse_positive(self.page.as_deref()),
            parse_positive(self.per_page.as_deref()),
        ) {
            (Some(page), Some(per_page)) => Ok((page, per_page)),
            _ => Err(ApiError::BadRequest(
                "Invalid page parameter format detected".to_string(),
            )),
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.parse::<i64>().ok())
        .filter(|value| *value > 0)
}

/// Number of pages needed to show `total` records at `per_page` per page.
/// Zero records or a zero page size is zero pages; a partial page counts as
/// a full one.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total == 0 || per_page == 0 {
        return 0;
    }
    if total < per_page {
        return 1;
    }
    // `i64::div_ceil` is unstable on stable Rust (int_roundings); this is
    // the same computation.
    let d = total / per_page;
    let r = total % per_page;
    if (r > 0 && per_page > 0) || (r < 0 && per_page < 0) {
        d + 1
    } else {
        d
    }
}
