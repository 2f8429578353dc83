//! 实体 -> 分句映射
//!
//! 匹配规则：小写后的实体名是小写分句的子串。按子串而非整词匹配，
//! 短实体名可能误中更长的词，这是已知的精度限制。

/// 有序映射：键按实体抽取顺序，值按分句在原文中的顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityClauseMap {
    entries: Vec<(String, Vec<String>)>,
}

impl EntityClauseMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, entity: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(e, _)| e == entity)
            .map(|(_, clauses)| clauses.as_slice())
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(e, _)| e.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(e, clauses)| (e.as_str(), clauses.as_slice()))
    }

    /// (实体, 分句) 对的总数
    pub fn pair_count(&self) -> usize {
        self.entries.iter().map(|(_, clauses)| clauses.len()).sum()
    }
}

/// 没有任何匹配分句的实体不出现在结果中
pub fn map_entities_to_clauses<S: AsRef<str>>(clauses: &[&str], entities: &[S]) -> EntityClauseMap {
    let lowered: Vec<String> = clauses.iter().map(|c| c.to_lowercase()).collect();

    let mut entries: Vec<(String, Vec<String>)> = Vec::new();
    for entity in entities {
        let entity = entity.as_ref();
        if entity.is_empty() || entries.iter().any(|(e, _)| e == entity) {
            continue;
        }
        let needle = entity.to_lowercase();
        let matched: Vec<String> = clauses
            .iter()
            .zip(&lowered)
            .filter(|(_, lower)| lower.contains(&needle))
            .map(|(clause, _)| clause.to_string())
            .collect();
        if !matched.is_empty() {
            entries.push((entity.to_string(), matched));
        }
    }
    EntityClauseMap { entries }
}
