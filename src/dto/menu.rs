use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, MenuItem};

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    pub items: Vec<MenuItem>,
    pub categories: Vec<Category>,
}

/// Landing-page payload: the featured picks plus the category list.
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeResponse {
    pub featured_items: Vec<MenuItem>,
    pub categories: Vec<Category>,
}
