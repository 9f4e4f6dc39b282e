//! The product catalog.
//!
//! The catalog is a fixed table of ten products compiled into the binary.
//! Nothing mutates it after construction; filtering and searching are done
//! by callers (see [`crate::views::browse::ProductFilter`]).

use serde::Serialize;
use steam_tracker_core::{Category, CategoryFilter, Price, ProductId};

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: Category,
    pub in_stock: bool,
    /// Absolute URL of the product photo.
    pub image: String,
    pub description: String,
}

/// Read-only product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The storefront's built-in product table.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            product(
                "1",
                "Crystal Growing Kit",
                2499,
                Category::Science,
                true,
                "https://images.unsplash.com/photo-1530973428-5bf2db2e4d71?w=500&q=80",
                "Grow vibrant crystals in 7 different colors.",
            ),
            product(
                "2",
                "Robot Building Arm",
                4999,
                Category::Technology,
                true,
                "https://images.unsplash.com/photo-1561557944-6e7860d1a7eb?w=500&q=80",
                "Programmable robotic arm with 4 degrees of freedom.",
            ),
            product(
                "3",
                "Wooden Bridge Builder",
                3450,
                Category::Engineering,
                true,
                "https://m.media-amazon.com/images/I/71Ugxyis8BL._AC_SX342_SY445_QL70_FMwebp_.jpg",
                "Learn structural engineering by building wooden bridges.",
            ),
            product(
                "4",
                "Digital Art Tablet",
                5999,
                Category::Arts,
                true,
                "https://images.unsplash.com/photo-1513542789411-b6a5d4f31634?w=500&q=80",
                "Create digital masterpieces with this kid-friendly tablet.",
            ),
            product(
                "5",
                "Math Puzzle Cube",
                1299,
                Category::Math,
                true,
                "https://images.unsplash.com/photo-1509228468518-180dd4864904?w=500&q=80",
                "Challenge your mind with 3D math puzzles.",
            ),
            product(
                "6",
                "Solar System Model",
                2999,
                Category::Science,
                true,
                "https://m.media-amazon.com/images/I/71EM2oXXlQL._AC_SY300_SX300_QL70_FMwebp_.jpg",
                "Motorized solar system model with illuminated sun.",
            ),
            product(
                "7",
                "Coding Board Game",
                3999,
                Category::Technology,
                false,
                "https://images.unsplash.com/photo-1611996908543-130c1e9c96d2?w=500&q=80",
                "Learn logic and loops without screen time.",
            ),
            product(
                "8",
                "Hydraulic Claw",
                1999,
                Category::Engineering,
                true,
                "https://m.media-amazon.com/images/I/71AbbuT4FXL._AC_UL320_.jpg",
                "Build your own hydraulic claw from scratch.",
            ),
            product(
                "9",
                "Pottery Wheel Set",
                4499,
                Category::Arts,
                true,
                "https://m.media-amazon.com/images/I/712h0UqtYCL._AC_UL320_.jpg",
                "Mold and paint your own ceramic creations.",
            ),
            product(
                "10",
                "Fraction Pizza Game",
                1599,
                Category::Math,
                true,
                "https://images.unsplash.com/photo-1565299624946-b28f40a0ae38?w=500&q=80",
                "A delicious way to learn fractions.",
            ),
        ])
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Category filter options: "All" followed by each category present in
    /// the catalog, in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryFilter> {
        let mut options = vec![CategoryFilter::All];
        for product in &self.products {
            let option = CategoryFilter::Only(product.category);
            if !options.contains(&option) {
                options.push(option);
            }
        }
        options
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn product(
    id: &str,
    name: &str,
    cents: u32,
    category: Category,
    in_stock: bool,
    image: &str,
    description: &str,
) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_owned(),
        price: Price::from_cents(cents),
        category,
        in_stock,
        image: image.to_owned(),
        description: description.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_standard_catalog_has_ten_unique_products() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.products().len(), 10);

        let ids: HashSet<_> = catalog.products().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::standard();
        let kit = catalog.get(&ProductId::from("1")).unwrap();
        assert_eq!(kit.name, "Crystal Growing Kit");
        assert_eq!(kit.price.display(), "$24.99");

        assert!(catalog.get(&ProductId::from("99")).is_none());
    }

    #[test]
    fn test_only_coding_board_game_is_out_of_stock() {
        let catalog = Catalog::standard();
        let out: Vec<_> = catalog
            .products()
            .iter()
            .filter(|p| !p.in_stock)
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(out, vec!["7"]);
    }

    #[test]
    fn test_categories_in_first_appearance_order() {
        let labels: Vec<_> = Catalog::standard()
            .categories()
            .iter()
            .map(CategoryFilter::as_str)
            .collect();
        assert_eq!(
            labels,
            vec!["All", "Science", "Technology", "Engineering", "Arts", "Math"]
        );
    }
}
