use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::{EntityRecognizer, EntitySpan};

/// 基于词典的实体识别
///
/// 词典文件格式：`[{"text": "Apple", "type_tag": "ORG"}, ...]`
/// 大小写敏感、整词匹配；同一位置优先取更长的名称，重叠的片段只保留先出现的
pub struct GazetteerRecognizer {
    entries: Vec<EntitySpan>,
}

impl GazetteerRecognizer {
    pub fn new(entries: Vec<EntitySpan>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| EntitySpan::new(e.text.trim(), e.type_tag.trim()))
            .filter(|e| !e.text.is_empty())
            .collect();
        Self { entries }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read gazetteer {}", path.display()))?;
        let entries: Vec<EntitySpan> = serde_json::from_str(&content)
            .with_context(|| format!("invalid gazetteer json {}", path.display()))?;
        info!("加载实体词典: {} 条, 路径: {}", entries.len(), path.display());
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find_all(&self, text: &str) -> Vec<EntitySpan> {
        // (start, end, entry)
        let mut hits: Vec<(usize, usize, &EntitySpan)> = Vec::new();
        for entry in &self.entries {
            for (start, matched) in text.match_indices(entry.text.as_str()) {
                let end = start + matched.len();
                if is_word_boundary(text, start, end) {
                    hits.push((start, end, entry));
                }
            }
        }
        hits.sort_by(|a, b| a.0.cmp(&b.0).then((b.1 - b.0).cmp(&(a.1 - a.0))));

        let mut spans = Vec::new();
        let mut covered_until = 0;
        for (start, end, entry) in hits {
            if start < covered_until {
                continue;
            }
            covered_until = end;
            spans.push(EntitySpan::new(&text[start..end], entry.type_tag.as_str()));
        }
        spans
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map_or(false, is_word_char) && !after.map_or(false, is_word_char)
}

#[async_trait]
impl EntityRecognizer for GazetteerRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>> {
        Ok(self.find_all(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn recognizer() -> GazetteerRecognizer {
        GazetteerRecognizer::new(vec![
            EntitySpan::new("Apple", "ORG"),
            EntitySpan::new("Apple Inc", "ORG"),
            EntitySpan::new("Tata", "ORG"),
            EntitySpan::new("iPhone", "PRODUCT"),
            EntitySpan::new("  ", "ORG"),
        ])
    }

    #[tokio::test]
    async fn test_recognize_in_text_order() {
        let spans = recognizer()
            .recognize("Tata beat estimates while Apple Inc shipped the iPhone. Apple fell.")
            .await
            .unwrap();
        assert_eq!(
            spans,
            vec![
                EntitySpan::new("Tata", "ORG"),
                EntitySpan::new("Apple Inc", "ORG"),
                EntitySpan::new("iPhone", "PRODUCT"),
                EntitySpan::new("Apple", "ORG"),
            ]
        );
    }

    #[tokio::test]
    async fn test_whole_word_and_case_sensitive() {
        let spans = recognizer()
            .recognize("Pineapple and apple and Tatas are not matches")
            .await
            .unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_blank_entries_dropped() {
        assert_eq!(recognizer().len(), 4);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"text": "Samsung", "type_tag": "ORG"}}]"#).unwrap();

        let recognizer = GazetteerRecognizer::from_path(file.path()).unwrap();
        assert_eq!(recognizer.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        assert!(GazetteerRecognizer::from_path(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_from_path_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Samsung": "ORG"}}"#).unwrap();
        assert!(GazetteerRecognizer::from_path(file.path()).is_err());
    }
}
