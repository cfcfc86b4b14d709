//! Testing utilities and mock implementations.
//!
//! Provides a scripted `ShoppingSearcher` and item fixtures so the
//! collection and ingestion paths can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use petfood_core::testing::{fixtures, MockSearcher};
//!
//! let searcher = MockSearcher::new();
//! searcher.set_results("고양이 사료", vec![fixtures::priced_item("1", 25_000.0)]).await;
//! ```

mod mock_searcher;

pub use mock_searcher::MockSearcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::dictionary::BrandDictionary;
    use crate::searcher::{RawItem, CATALOG_PRODUCT_TYPE};

    /// Create a catalog listing in the cat food category with reasonable defaults.
    pub fn raw_item(product_id: &str, title: &str) -> RawItem {
        RawItem {
            title: title.to_string(),
            link: Some(format!("https://search.shopping.naver.com/catalog/{}", product_id)),
            image: Some(format!("https://shopping-phinf.pstatic.net/{}.jpg", product_id)),
            lprice: Some("25000".to_string()),
            hprice: None,
            mall_name: Some("네이버".to_string()),
            product_id: Some(product_id.to_string()),
            product_type: Some(CATALOG_PRODUCT_TYPE),
            maker: None,
            brand: None,
            category1: Some("생활/건강".to_string()),
            category2: Some("반려동물".to_string()),
            category3: Some("고양이 사료".to_string()),
            category4: Some("건식사료".to_string()),
        }
    }

    /// Create a catalog listing with the given lowest price.
    pub fn priced_item(product_id: &str, price: f64) -> RawItem {
        let mut item = raw_item(product_id, &format!("고양이 사료 {}", product_id));
        item.lprice = Some(format!("{}", price));
        item
    }

    /// Create a catalog listing carrying a brand field.
    pub fn branded_item(product_id: &str, brand: &str) -> RawItem {
        let mut item = raw_item(product_id, &format!("{} 고양이 사료", brand.trim()));
        item.brand = Some(brand.to_string());
        item
    }

    /// Create a small dictionary covering every brand group.
    pub fn brand_dictionary() -> BrandDictionary {
        let mut dictionary = BrandDictionary::default();
        dictionary.brands.overseas_premium = vec!["오리젠".to_string(), "아카나".to_string()];
        dictionary.brands.domestic = vec!["캐츠랑".to_string()];
        dictionary.brands.prescription = vec!["로얄캐닌".to_string()];
        dictionary.brands.general_name_correction = vec!["GO!".to_string()];
        dictionary
    }
}
