//! Domain objects parsed from Product service responses.

use serde::{Deserialize, Serialize};

/// A product as served by the v2/v3 API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Absolute discount on the unit price.
    pub discount: f64,
    /// Average review rating.
    pub rating: f64,
    /// Units in stock.
    pub stock: i64,
    /// Owning category.
    pub category_id: i64,
    /// Owning brand.
    pub brand_id: i64,
}

/// A product as served by the legacy v1 API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyProduct {
    /// Product identifier.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Brand name, denormalized.
    pub brand: String,
    /// Category name, denormalized.
    pub category: String,
    /// Unit price.
    pub price: f64,
    /// Absolute discount on the unit price.
    pub discount: f64,
    /// Average review rating.
    pub rating: f64,
    /// Units in stock.
    pub stock: i64,
}

/// Field set accepted by the create-product endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Absolute discount on the unit price.
    pub discount: f64,
    /// Average review rating.
    pub rating: f64,
    /// Units in stock.
    pub stock: i64,
    /// Owning category.
    pub category_id: i64,
    /// Owning brand.
    pub brand_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_deserializes_from_factory_shape() {
        let value = json!({
            "id": 1,
            "name": "product0",
            "description": "A test product.",
            "price": 442.95,
            "discount": 241.93,
            "rating": 5.0,
            "stock": 123,
            "category_id": 1,
            "brand_id": 1
        });

        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.name, "product0");
        assert_eq!(product.price, 442.95);
    }

    #[test]
    fn test_legacy_product_uses_denormalized_names() {
        let value = json!({
            "id": 1,
            "title": "Saddle timber kettle ridge",
            "description": "Nothing in particular.",
            "brand": "Wilson Inc",
            "category": "kitchen",
            "price": 19.99,
            "discount": 0.0,
            "rating": 4.5,
            "stock": 7
        });

        let product: LegacyProduct = serde_json::from_value(value).unwrap();
        assert_eq!(product.brand, "Wilson Inc");
        assert_eq!(product.category, "kitchen");
    }
}
