//! Blog post listings.

use super::{Page, Repository};
use crate::error::AppError;
use crate::model::{BlogStatus, BLOG_POSTS};
use crate::sql::{Criteria, OrderBy, PageRequest, SortOrder};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// Query parameters accepted by `GET /blog-posts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogFilter {
    pub keyword: Option<String>,
    #[serde(alias = "category_id")]
    pub category_id: Option<Uuid>,
    #[serde(alias = "author_id")]
    pub author_id: Option<Uuid>,
    pub status: Option<BlogStatus>,
    #[serde(alias = "sort_by")]
    pub sort_by: Option<String>,
    #[serde(alias = "sort_order")]
    pub sort_order: Option<SortOrder>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl BlogFilter {
    pub fn to_criteria(&self) -> Criteria {
        let mut c = Criteria::new();
        if let Some(kw) = &self.keyword {
            c = c.contains(BLOG_POSTS.search_columns, kw);
        }
        if let Some(id) = self.category_id {
            c = c.eq("category_id", id.to_string());
        }
        if let Some(id) = self.author_id {
            c = c.eq("author_id", id.to_string());
        }
        c.eq("status", self.status.unwrap_or(BlogStatus::Published).as_str())
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn order_by(&self) -> OrderBy {
        OrderBy::new(
            BLOG_POSTS.resolve_sort(self.sort_by.as_deref()),
            self.sort_order.unwrap_or_default(),
        )
    }
}

pub async fn find_filtered(repo: &Repository<'_>, filter: &BlogFilter) -> Result<Page<Value>, AppError> {
    repo.find_with_pagination(&filter.to_criteria(), filter.page_request(), &filter.order_by())
        .await
}
