//! Query construction for brand-anchored searches.

use crate::dictionary::{BrandDictionary, BrandGroup};

/// Vocabulary the query templates are filled with.
#[derive(Debug, Clone)]
pub struct QueryVocabulary {
    /// Appended to brand names, e.g. `사료`.
    pub food_word: String,
    /// Generic category query placed before general-name brands, e.g. `고양이 사료`.
    pub category_query: String,
}

/// Build the search query for a brand.
///
/// Rules, in priority order:
/// 1. standalone groups search `"{brand} {food}"`;
/// 2. a paired manufacturer is prefixed: `"{manufacturer} {brand} {food}"`;
/// 3. general-name brands (group tag or single-word list) are searched as
///    `"{category query} {brand}"` so the common noun is disambiguated;
/// 4. anything else falls back to `"{brand} {food}"`.
pub fn build_query(
    brand: &str,
    group: &BrandGroup,
    dictionary: &BrandDictionary,
    vocabulary: &QueryVocabulary,
) -> String {
    let brand_only = || format!("{} {}", brand, vocabulary.food_word);

    if group.is_standalone() {
        return brand_only();
    }

    if let BrandGroup::ManufacturerPaired {
        manufacturer: Some(manufacturer),
    } = group
    {
        return format!("{} {} {}", manufacturer, brand, vocabulary.food_word);
    }

    if *group == BrandGroup::GeneralNameCorrection || dictionary.is_single_word(brand) {
        return format!("{} {}", vocabulary.category_query, brand);
    }

    brand_only()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> QueryVocabulary {
        QueryVocabulary {
            food_word: "사료".to_string(),
            category_query: "고양이 사료".to_string(),
        }
    }

    #[test]
    fn test_standalone_groups_use_brand_only() {
        let dict = BrandDictionary::default();
        let groups = [
            BrandGroup::Standalone,
            BrandGroup::OverseasPremium,
            BrandGroup::Domestic,
            BrandGroup::Asia,
            BrandGroup::Prescription,
        ];
        for brand in ["오리젠", "로얄캐닌", "GO!", "힐스 처방식"] {
            for group in &groups {
                assert_eq!(
                    build_query(brand, group, &dict, &vocabulary()),
                    format!("{} 사료", brand)
                );
            }
        }
    }

    #[test]
    fn test_standalone_wins_over_single_word_list() {
        let mut dict = BrandDictionary::default();
        dict.single_word_brands.push("NOW".to_string());
        assert_eq!(
            build_query("NOW", &BrandGroup::Domestic, &dict, &vocabulary()),
            "NOW 사료"
        );
    }

    #[test]
    fn test_manufacturer_pair() {
        let dict = BrandDictionary::default();
        let group = BrandGroup::ManufacturerPaired {
            manufacturer: Some("네슬레".to_string()),
        };
        assert_eq!(
            build_query("퓨리나 원", &group, &dict, &vocabulary()),
            "네슬레 퓨리나 원 사료"
        );
    }

    #[test]
    fn test_general_name_correction() {
        let dict = BrandDictionary::default();
        assert_eq!(
            build_query("GO!", &BrandGroup::GeneralNameCorrection, &dict, &vocabulary()),
            "고양이 사료 GO!"
        );
    }

    #[test]
    fn test_unpaired_manufacturer_group_falls_through() {
        let mut dict = BrandDictionary::default();
        let group = BrandGroup::ManufacturerPaired { manufacturer: None };

        // Not single-word: default brand-only query
        assert_eq!(build_query("무명", &group, &dict, &vocabulary()), "무명 사료");

        // Single-word list applies once no manufacturer is paired
        dict.single_word_brands.push("NOW".to_string());
        assert_eq!(build_query("NOW", &group, &dict, &vocabulary()), "고양이 사료 NOW");
    }
}
