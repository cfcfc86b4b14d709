//! The formula matcher itself.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::warn;

use super::{AgeClass, FoodCategory, ParsedAttributes, TypeTag};
use crate::dictionary::BrandDictionary;
use crate::text::normalize_text;

/// Known brands with their local name first and romanized aliases after.
const BRAND_ALIASES: &[(&str, &str)] = &[
    ("오리젠", r"오리젠|orijen"),
    ("아카나", r"아카나|acana"),
    ("고이", r"고이|\bgo!"),
    ("웰니스코어", r"웰니스\s*코어|wellness\s*core"),
    ("인스팅트", r"인스팅트|instinct"),
    ("어스본", r"어스본|earthborn"),
    ("솔리드골드", r"솔리드\s*골드|solid\s*gold"),
    ("캐츠란", r"캐츠란|catz\s*finefood"),
    ("테이스트오브더와일드", r"테이스트\s*오브\s*더\s*와일드|taste\s*of\s*the\s*wild"),
    ("카니러브", r"카니러브|carnilove"),
    ("애니몬다", r"애니몬다|animonda"),
    ("로얄캐닌", r"로얄\s*캐닌|royal\s*canin"),
    ("힐스", r"힐스|hill'?s"),
    ("퓨리나", r"퓨리나|purina"),
    ("스마트하트", r"스마트\s*하트|smart\s*heart"),
    ("아이엠에스", r"아이엠에스|\bims\b"),
    ("니베아", r"니베아|nivea"),
    ("비바", r"비바|biva"),
    ("나우프레쉬", r"나우\s*프레쉬|now\s*fresh"),
    ("뉴트로", r"뉴트로|nutro"),
    ("내추럴발란스", r"내추럴\s*발란스|natural\s*balance"),
    ("캐츠랑", r"캐츠랑|catsrang"),
    ("ANF", r"에이엔에프|\banf\b"),
];

const AGE_KEYWORDS: &[(AgeClass, &[&str])] = &[
    (AgeClass::Kitten, &["키튼", "kitten", "새끼", "유아", "어린"]),
    (AgeClass::Adult, &["성묘", "adult", "성년"]),
    (AgeClass::Senior, &["시니어", "senior", "노령", "노년"]),
];

const CATEGORY_KEYWORDS: &[(FoodCategory, &[&str])] = &[
    (FoodCategory::Dry, &["건식", "dry"]),
    (FoodCategory::Wet, &["습식", "wet", "캔", "파우치", "pouch"]),
    (
        FoodCategory::FreezeDried,
        &["동결건조", "프리즈드라이", "freeze dried", "freeze-dried"],
    ),
    (FoodCategory::Raw, &["생식", "raw"]),
];

const TYPE_KEYWORDS: &[(TypeTag, &[&str])] = &[
    (TypeTag::WeightControl, &["다이어트", "체중조절", "체중관리", "weight control"]),
    (TypeTag::Joint, &["관절", "joint"]),
    (TypeTag::Skin, &["피부", "skin", "모질"]),
    (TypeTag::Sensitive, &["저자극", "센서티브", "sensitive"]),
    (TypeTag::Hairball, &["헤어볼", "털뭉치", "hairball"]),
    (TypeTag::Urinary, &["요로", "비뇨", "urinary"]),
];

static SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+\.?\d*)\s*(kg|g|lb|oz)").unwrap());

#[derive(Debug, Clone)]
struct BrandRule {
    brand: String,
    pattern: Regex,
}

/// Rule-based extractor of {brand, age, category, type, size} from titles.
#[derive(Debug, Clone)]
pub struct FormulaMatcher {
    brand_rules: Vec<BrandRule>,
}

impl Default for FormulaMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaMatcher {
    /// Matcher with the built-in brand aliases only.
    pub fn new() -> Self {
        Self::with_brands(std::iter::empty::<String>())
    }

    /// Matcher whose brand rules follow the dictionary's iteration order.
    ///
    /// Dictionary brands with a built-in alias pattern use it; others match
    /// their name literally. Built-in brands missing from the dictionary are
    /// tried last.
    pub fn from_dictionary(dictionary: &BrandDictionary) -> Self {
        Self::with_brands(dictionary.brand_names())
    }

    fn with_brands<I>(brands: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut brand_rules: Vec<BrandRule> = Vec::new();

        for brand in brands {
            let brand = brand.as_ref().trim();
            if brand.is_empty() || brand_rules.iter().any(|r| r.brand == brand) {
                continue;
            }
            let alias = BRAND_ALIASES
                .iter()
                .find(|(name, _)| *name == brand)
                .map(|(_, pattern)| pattern.to_string())
                .unwrap_or_else(|| regex_lite::escape(brand));
            if let Some(rule) = Self::rule(brand, &alias) {
                brand_rules.push(rule);
            }
        }

        for (brand, pattern) in BRAND_ALIASES {
            if brand_rules.iter().any(|r| r.brand == *brand) {
                continue;
            }
            if let Some(rule) = Self::rule(brand, pattern) {
                brand_rules.push(rule);
            }
        }

        Self { brand_rules }
    }

    fn rule(brand: &str, pattern: &str) -> Option<BrandRule> {
        match Regex::new(&format!("(?i){}", pattern)) {
            Ok(pattern) => Some(BrandRule {
                brand: brand.to_string(),
                pattern,
            }),
            Err(e) => {
                warn!(brand = brand, error = %e, "Skipping invalid brand pattern");
                None
            }
        }
    }

    /// Parse a product title into its attributes.
    pub fn parse_product_name(&self, title: &str) -> ParsedAttributes {
        let name = normalize_text(title);
        let lower = name.to_lowercase();

        ParsedAttributes {
            brand: self.extract_brand(&name),
            age: first_keyword_match(&lower, AGE_KEYWORDS).unwrap_or_default(),
            category: first_keyword_match(&lower, CATEGORY_KEYWORDS).unwrap_or_default(),
            type_tag: first_keyword_match(&lower, TYPE_KEYWORDS),
            size: extract_size(&name),
            name,
        }
    }

    fn extract_brand(&self, name: &str) -> Option<String> {
        self.brand_rules
            .iter()
            .find(|rule| rule.pattern.is_match(name))
            .map(|rule| rule.brand.clone())
    }
}

fn first_keyword_match<T: Copy>(lower: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(value, _)| *value)
}

fn extract_size(name: &str) -> Option<String> {
    let caps = SIZE.captures(name)?;
    let amount = caps.get(1)?.as_str();
    let unit = caps.get(2)?.as_str().to_lowercase();
    Some(format!("{}{}", amount, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marked_up_title() {
        let matcher = FormulaMatcher::new();
        let parsed = matcher.parse_product_name("<b>오리젠</b> 고양이 성묘 사료 5.4kg");

        assert_eq!(parsed.name, "오리젠 고양이 성묘 사료 5.4kg");
        assert_eq!(parsed.brand.as_deref(), Some("오리젠"));
        assert_eq!(parsed.age, AgeClass::Adult);
        assert_eq!(parsed.category, FoodCategory::Dry);
        assert_eq!(parsed.size.as_deref(), Some("5.4kg"));
        assert_eq!(parsed.type_tag, None);
    }

    #[test]
    fn test_romanized_alias_case_insensitive() {
        let matcher = FormulaMatcher::new();
        let parsed = matcher.parse_product_name("ROYAL CANIN Indoor Adult 2KG");
        assert_eq!(parsed.brand.as_deref(), Some("로얄캐닌"));
        assert_eq!(parsed.size.as_deref(), Some("2kg"));
        assert_eq!(parsed.age, AgeClass::Adult);
    }

    #[test]
    fn test_age_category_and_type_keywords() {
        let matcher = FormulaMatcher::new();

        let kitten = matcher.parse_product_name("웰니스코어 키튼 파우치 85g");
        assert_eq!(kitten.brand.as_deref(), Some("웰니스코어"));
        assert_eq!(kitten.age, AgeClass::Kitten);
        assert_eq!(kitten.category, FoodCategory::Wet);
        assert_eq!(kitten.size.as_deref(), Some("85g"));

        let senior = matcher.parse_product_name("힐스 시니어 동결건조 헤어볼 케어");
        assert_eq!(senior.age, AgeClass::Senior);
        assert_eq!(senior.category, FoodCategory::FreezeDried);
        assert_eq!(senior.type_tag, Some(TypeTag::Hairball));

        let diet = matcher.parse_product_name("인스팅트 다이어트 3.2kg");
        assert_eq!(diet.type_tag, Some(TypeTag::WeightControl));
    }

    #[test]
    fn test_defaults_when_nothing_matches() {
        let matcher = FormulaMatcher::new();
        let parsed = matcher.parse_product_name("이름 없는 상품");
        assert_eq!(parsed.brand, None);
        assert_eq!(parsed.age, AgeClass::Adult);
        assert_eq!(parsed.category, FoodCategory::Dry);
        assert_eq!(parsed.type_tag, None);
        assert_eq!(parsed.size, None);
    }

    #[test]
    fn test_first_rule_in_order_wins() {
        let matcher = FormulaMatcher::new();
        // Both brands present; 오리젠 comes first in rule order
        let parsed = matcher.parse_product_name("아카나 vs 오리젠 비교");
        assert_eq!(parsed.brand.as_deref(), Some("오리젠"));
    }

    #[test]
    fn test_dictionary_order_and_literal_brands() {
        let mut dict = BrandDictionary::default();
        dict.brands.domestic = vec!["캐츠랑".to_string(), "뉴브랜드(주)".to_string()];
        dict.brands.overseas_premium = vec!["아카나".to_string()];
        let matcher = FormulaMatcher::from_dictionary(&dict);

        // Dictionary order puts 아카나 (overseas) before built-in 오리젠
        let parsed = matcher.parse_product_name("아카나 vs 오리젠 비교");
        assert_eq!(parsed.brand.as_deref(), Some("아카나"));

        // Literal names are escaped
        let parsed = matcher.parse_product_name("뉴브랜드(주) 참치 캔");
        assert_eq!(parsed.brand.as_deref(), Some("뉴브랜드(주)"));
        assert_eq!(parsed.category, FoodCategory::Wet);

        // Built-in alias still applies for a dictionary brand
        let parsed = matcher.parse_product_name("CATSRANG all life");
        assert_eq!(parsed.brand.as_deref(), Some("캐츠랑"));
    }

    #[test]
    fn test_go_alias_in_either_script() {
        let matcher = FormulaMatcher::new();

        let parsed = matcher.parse_product_name("고이 센서티브 치킨 3.6kg");
        assert_eq!(parsed.brand.as_deref(), Some("고이"));
        assert_eq!(parsed.type_tag, Some(TypeTag::Sensitive));
        assert_eq!(parsed.size.as_deref(), Some("3.6kg"));

        let parsed = matcher.parse_product_name("GO! SOLUTIONS Carnivore 1.4kg");
        assert_eq!(parsed.brand.as_deref(), Some("고이"));

        // "고양이" is not "고이"
        assert_eq!(matcher.parse_product_name("고양이 간식").brand, None);
    }

    #[test]
    fn test_restored_aliases() {
        let matcher = FormulaMatcher::new();
        let brand = |title: &str| matcher.parse_product_name(title).brand;

        assert_eq!(brand("Catz Finefood 파우치").as_deref(), Some("캐츠란"));
        assert_eq!(brand("IMS 캣 사료 2kg").as_deref(), Some("아이엠에스"));
        assert_eq!(brand("비바 캣 캔").as_deref(), Some("비바"));
        // Word boundary keeps "claims" from reading as IMS
        assert_eq!(brand("claims free shipping"), None);
    }

    #[test]
    fn test_decomposed_hangul_title() {
        use unicode_normalization::UnicodeNormalization;

        let matcher = FormulaMatcher::new();
        let title: String = "오리젠 키튼 1.8kg".nfd().collect();
        assert_ne!(title, "오리젠 키튼 1.8kg");

        let parsed = matcher.parse_product_name(&title);
        assert_eq!(parsed.name, "오리젠 키튼 1.8kg");
        assert_eq!(parsed.brand.as_deref(), Some("오리젠"));
        assert_eq!(parsed.age, AgeClass::Kitten);
    }

    #[test]
    fn test_size_units() {
        assert_eq!(extract_size("2 LB bag").as_deref(), Some("2lb"));
        assert_eq!(extract_size("3oz x 24").as_deref(), Some("3oz"));
        assert_eq!(extract_size("no size"), None);
    }
}
