//! 实体抽取
//!
//! NER 片段（按类型过滤）+ `$` 股票代码，去重并保持首次出现顺序

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entity_recognizer::{EntityKind, EntitySpan};

/// `$` 后跟 1 到 6 个字母或点，如 $AAPL、$BRK.B
static TICKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[A-Za-z.]{1,6}").expect("ticker pattern is valid"));

pub struct EntityExtractor {
    allowed: HashSet<EntityKind>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(["ORG", "PRODUCT", "PERSON"])
    }
}

impl EntityExtractor {
    /// 以类型标签列表构造允许集合
    pub fn new<I, S>(type_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: type_tags
                .into_iter()
                .map(|tag| EntityKind::from_tag(tag.as_ref()))
                .collect(),
        }
    }

    pub fn allows(&self, span: &EntitySpan) -> bool {
        self.allowed.contains(&span.kind())
    }

    /// NER 结果在前（模型顺序），股票代码在后（文本顺序），按字符串精确去重
    pub fn extract(&self, spans: &[EntitySpan], text: &str) -> Vec<String> {
        let named = spans
            .iter()
            .filter(|span| self.allows(span))
            .map(|span| span.text.trim().to_string())
            .filter(|surface| !surface.is_empty());

        dedupe_preserving_order(named.chain(extract_tickers(text)))
    }
}

/// 从左到右提取所有不重叠的股票代码
pub fn extract_tickers(text: &str) -> Vec<String> {
    TICKER_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn dedupe_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// 过滤串是实体名的子串（大小写不敏感）即保留
pub fn matches_filter(entity: &str, entity_filter: &str) -> bool {
    entity
        .to_lowercase()
        .contains(&entity_filter.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_seen_order() {
        let items = ["A", "B", "A", "C"].iter().map(|s| s.to_string());
        assert_eq!(dedupe_preserving_order(items), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_extract_tickers() {
        assert_eq!(
            extract_tickers("$AAPL up, $BRK.B flat, $TOOLONGX and $ alone, cost $5"),
            vec!["$AAPL", "$BRK.B", "$TOOLON"]
        );
        assert!(extract_tickers("").is_empty());
    }

    #[test]
    fn test_extract_filters_types_and_appends_tickers() {
        let extractor = EntityExtractor::default();
        let spans = vec![
            EntitySpan::new("Apple ", "ORG"),
            EntitySpan::new("Cupertino", "GPE"),
            EntitySpan::new("Tim Cook", "PERSON"),
            EntitySpan::new("Apple", "ORG"),
            EntitySpan::new("iPhone", "PRODUCT"),
            EntitySpan::new("  ", "ORG"),
        ];
        let text = "Apple in Cupertino: Tim Cook says iPhone demand lifts $AAPL and $AAPL.";
        assert_eq!(
            extractor.extract(&spans, text),
            vec!["Apple", "Tim Cook", "iPhone", "$AAPL", "$AAPL."]
        );
    }

    #[test]
    fn test_bert_style_tags() {
        let extractor = EntityExtractor::default();
        let spans = vec![
            EntitySpan::new("Elon Musk", "PER"),
            EntitySpan::new("Berlin", "LOC"),
        ];
        assert_eq!(extractor.extract(&spans, "Elon Musk in Berlin"), vec!["Elon Musk"]);

        let orgs_only = EntityExtractor::new(["ORG"]);
        assert!(orgs_only.extract(&spans, "Elon Musk in Berlin").is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(EntityExtractor::default().extract(&[], "").is_empty());
    }

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter("Apple Inc", "apple"));
        assert!(matches_filter("$AAPL", "aapl"));
        assert!(!matches_filter("Apple", "Apple Inc"));
    }
}
