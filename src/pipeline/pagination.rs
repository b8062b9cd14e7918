// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

pub const DEFAULT_LIMIT: usize = 20;

/// Pagination parameters as they arrive on the query string.
///
/// Offsets are the canonical convention, `page` (1-based) is accepted as a
/// separately named alternative but never together with `offset`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub page: Option<usize>,
}

/// Which parameter the client paginated with, cursors are echoed in the same terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStyle {
    Offset,
    Page,
}

/// Resolved pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: usize,
    pub offset: usize,
    pub style: PageStyle,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            style: PageStyle::Offset,
        }
    }
}

impl PageParams {
    pub fn offset(limit: usize, offset: usize) -> Self {
        Self {
            limit,
            offset,
            style: PageStyle::Offset,
        }
    }
}

impl TryFrom<PageQuery> for PageParams {
    type Error = ProxyError;

    fn try_from(query: PageQuery) -> Result<Self, Self::Error> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        // A zero limit would hand out a `next` cursor that never moves
        if limit == 0 {
            return Err(ProxyError::BadRequest(
                "`limit` must be at least 1".to_string(),
            ));
        }

        match (query.offset, query.page) {
            (Some(_), Some(_)) => Err(ProxyError::BadRequest(
                "Use either `offset` or `page`, not both".to_string(),
            )),
            (_, Some(0)) => Err(ProxyError::BadRequest(
                "`page` starts at 1".to_string(),
            )),
            (_, Some(page)) => Ok(Self {
                limit,
                offset: (page - 1).saturating_mul(limit),
                style: PageStyle::Page,
            }),
            (offset, None) => Ok(Self::offset(limit, offset.unwrap_or(0))),
        }
    }
}

/// Where the neighbouring page starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    pub offset: usize,
    pub limit: usize,
}

/// The slice of a collection a response covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationWindow {
    pub start_index: usize,
    pub end_index: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageCursor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageCursor>,
}

impl PaginationWindow {
    /// Computes the window `[offset, offset + limit)` clamped to `total`
    pub fn compute(limit: usize, offset: usize, total: usize) -> Self {
        let start_index = offset.min(total);
        let end_index = offset.saturating_add(limit).min(total);

        let next = (end_index < total).then(|| PageCursor {
            page: None,
            offset: offset.saturating_add(limit),
            limit,
        });

        let prev = (start_index > 0).then(|| PageCursor {
            page: None,
            offset: offset.saturating_sub(limit),
            limit,
        });

        Self {
            start_index,
            end_index,
            total,
            next,
            prev,
        }
    }

    /// Same as [`PaginationWindow::compute`], with page numbers on the cursors
    /// when the request was made in pages
    pub fn for_request(params: &PageParams, total: usize) -> Self {
        let mut window = Self::compute(params.limit, params.offset, total);

        if params.style == PageStyle::Page {
            let page = current_page(params);
            if let Some(next) = window.next.as_mut() {
                next.page = Some(page + 1);
            }
            if let Some(prev) = window.prev.as_mut() {
                prev.page = Some(page.saturating_sub(1).max(1));
            }
        }

        window
    }

    /// The part of `items` the window covers
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end_index.min(items.len());
        let start = self.start_index.min(end);
        &items[start..end]
    }
}

fn current_page(params: &PageParams) -> usize {
    match params.limit {
        0 => 1,
        limit => params.offset / limit + 1,
    }
}
