//! Catalog: categories, products and the product listing query

mod query;
mod serializers;

pub use query::{CategoryFilter, ProductsQuery, SortBy};
pub use serializers::{
	CategorySerializer, CreateCategorySerializer, CreateProductSerializer,
	DeleteCategorySerializer, GetProductSerializer, ProductSerializer, UpdateProductSerializer,
	all_categories, list_products,
};
