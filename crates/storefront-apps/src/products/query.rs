//! Product listing query
//!
//! Parsed strictly: unknown keys and values of the wrong type are rejected.
//! Applying the query filters in a fixed order (sale, category, price range,
//! search), then sorts and finally paginates.

use crate::error::{AppError, AppResult};
use crate::models::{Category, Product};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_db::{Connection, ConnectionExt, DatabaseResult};
use storefront_serializers::{Data, ErrorEntry, ErrorKind, SchemaModel};
use validator::Validate;

const ALL_CATEGORIES: &str = "all";

/// Category filter: one identifier, `"all"`, or identifiers joined by `-`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryFilter {
	Id(i64),
	Named(String),
}

impl Default for CategoryFilter {
	fn default() -> Self {
		CategoryFilter::Named(ALL_CATEGORIES.to_string())
	}
}

impl CategoryFilter {
	/// Requested category identifiers; `None` means every category
	pub fn ids(&self) -> Option<Vec<i64>> {
		match self {
			CategoryFilter::Id(id) => Some(vec![*id]),
			CategoryFilter::Named(name) if name == ALL_CATEGORIES => None,
			CategoryFilter::Named(list) => Some(
				list.split('-')
					.filter_map(|id| id.trim().parse().ok())
					.collect(),
			),
		}
	}
}

fn check_category(category: &CategoryFilter) -> Result<(), validator::ValidationError> {
	let CategoryFilter::Named(name) = category else {
		return Ok(());
	};
	let is_id_list = !name.is_empty()
		&& name
			.split('-')
			.all(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()));
	if name == ALL_CATEGORIES || is_id_list {
		Ok(())
	} else {
		Err(validator::ValidationError::new("category"))
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
	Price,
	PriceDesc,
	Name,
	NameDesc,
	#[default]
	Date,
	DateDesc,
}

fn default_page_size() -> i64 {
	10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProductsQuery {
	#[serde(default)]
	#[validate(custom(
		function = "check_category",
		message = "Category must be an integer or the string \"all\""
	))]
	pub category: CategoryFilter,
	#[serde(default)]
	pub search: Option<String>,
	#[serde(default)]
	pub sort_by: SortBy,
	/// Offset of the first product returned
	#[serde(default)]
	#[validate(range(min = 0, message = "start cannot be negative"))]
	pub start: i64,
	/// Page size
	#[serde(default = "default_page_size")]
	#[validate(range(min = 0, message = "products cannot be negative"))]
	pub products: i64,
	#[serde(default)]
	pub low_price: Option<i64>,
	#[serde(default)]
	pub high_price: Option<i64>,
	#[serde(default)]
	pub sale: bool,
}

impl Default for ProductsQuery {
	fn default() -> Self {
		Self {
			category: CategoryFilter::default(),
			search: None,
			sort_by: SortBy::default(),
			start: 0,
			products: default_page_size(),
			low_price: None,
			high_price: None,
			sale: false,
		}
	}
}

impl ProductsQuery {
	/// Parse raw query parameters
	///
	/// # Examples
	///
	/// ```
	/// use serde_json::json;
	/// use storefront_apps::products::{ProductsQuery, SortBy};
	///
	/// let raw = json!({"category": "1-3", "sort_by": "price_desc"});
	/// let query = ProductsQuery::parse(raw.as_object().unwrap()).unwrap();
	/// assert_eq!(query.category.ids(), Some(vec![1, 3]));
	/// assert_eq!(query.sort_by, SortBy::PriceDesc);
	/// assert_eq!(query.products, 10);
	/// ```
	pub fn parse(raw: &Data) -> AppResult<Self> {
		let normalized = SchemaModel::of::<ProductsQuery>()
			.validate(raw, &[])
			.map_err(AppError::InvalidQuery)?;
		serde_json::from_value(Value::Object(normalized)).map_err(|e| {
			AppError::InvalidQuery(vec![ErrorEntry::new(
				None,
				e.to_string(),
				Value::Null,
				ErrorKind::SchemaError,
				&[],
			)])
		})
	}

	/// Run the query against the stored products
	pub fn apply(&self, conn: &dyn Connection) -> DatabaseResult<Vec<Product>> {
		let mut products = conn.all::<Product>()?;

		if self.sale {
			products.retain(|p| p.is_sale);
		}

		if let Some(requested) = self.category.ids() {
			let mut known = Vec::with_capacity(requested.len());
			for id in requested {
				if conn.exists::<Category>(id)? {
					known.push(id);
				}
			}
			// Unknown categories are ignored; none known means no filter
			if !known.is_empty() {
				products.retain(|p| known.contains(&p.category_id));
			}
		}

		if let Some(low) = self.low_price {
			products.retain(|p| p.price >= low as f64);
		}
		if let Some(high) = self.high_price {
			products.retain(|p| p.price <= high as f64);
		}

		if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
			let needle = search.to_lowercase();
			products.retain(|p| {
				p.name.to_lowercase().contains(&needle)
					|| p.description
						.as_deref()
						.is_some_and(|d| d.to_lowercase().contains(&needle))
			});
		}

		match self.sort_by {
			SortBy::Price => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
			SortBy::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
			SortBy::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
			SortBy::NameDesc => products.sort_by(|a, b| b.name.cmp(&a.name)),
			SortBy::Date => products.sort_by_key(|p| p.created_at),
			SortBy::DateDesc => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
		}

		let start = usize::try_from(self.start).unwrap_or(0);
		let take = usize::try_from(self.products).unwrap_or(0);
		tracing::debug!(
			sort_by = ?self.sort_by,
			start,
			take,
			matched = products.len(),
			"applied products query"
		);
		Ok(products.into_iter().skip(start).take(take).collect())
	}
}
