//! 结果聚合
//!
//! 指定过滤实体时，在结果末尾追加一条 "AGGREGATED" 行，分数为所有匹配行的算术平均

use crate::types::SentimentRow;

/// 算术平均；空集合返回 None
pub fn mean_score(rows: &[SentimentRow]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let sum: f64 = rows.iter().map(|row| row.score).sum();
    Some(sum / rows.len() as f64)
}

/// 所有行（无论属于哪个实体）合并为一条，entity 取过滤串本身
pub fn aggregate_row(rows: &[SentimentRow], entity_filter: &str) -> Option<SentimentRow> {
    mean_score(rows).map(|mean| SentimentRow::aggregate_row(entity_filter, mean))
}

/// 过滤为空或没有匹配行时原样返回
pub fn with_aggregate(mut rows: Vec<SentimentRow>, entity_filter: Option<&str>) -> Vec<SentimentRow> {
    let Some(filter) = entity_filter.filter(|f| !f.is_empty()) else {
        return rows;
    };
    if let Some(row) = aggregate_row(&rows, filter) {
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RowLabel, SentimentLabel, AGGREGATED_CLAUSE};
    use approx::assert_abs_diff_eq;

    fn row(entity: &str, score: f64) -> SentimentRow {
        SentimentRow::clause_row(entity, "some clause", score)
    }

    #[test]
    fn test_mean_row_appended_last() {
        let rows = with_aggregate(vec![row("Apple", 0.8), row("Apple", 0.4)], Some("Apple"));
        assert_eq!(rows.len(), 3);

        let last = rows.last().unwrap();
        assert_abs_diff_eq!(last.score, 0.6, epsilon = 1e-12);
        assert_eq!(last.label, RowLabel::Mean(SentimentLabel::Positive));
        assert_eq!(last.label.to_string(), "MEAN-positive");
        assert_eq!(last.clause, AGGREGATED_CLAUSE);
        assert_eq!(last.entity, "Apple");
        assert!(rows[..2].iter().all(|r| !r.is_aggregate()));
    }

    #[test]
    fn test_mean_exactly_neutral() {
        let rows = with_aggregate(vec![row("Apple", 0.75), row("Apple", 0.25)], Some("Apple"));
        assert_eq!(rows.last().unwrap().label.to_string(), "MEAN-neutral");
    }

    #[test]
    fn test_pools_all_matching_entities() {
        // "app" 同时匹配 Apple 和 AppLovin，两者一起平均
        let rows = with_aggregate(
            vec![row("Apple", 0.9), row("AppLovin", 0.1), row("Apple", 0.2)],
            Some("app"),
        );
        let last = rows.last().unwrap();
        assert_eq!(last.entity, "app");
        assert_abs_diff_eq!(last.score, 0.4, epsilon = 1e-12);
        assert_eq!(last.label.to_string(), "MEAN-negative");
    }

    #[test]
    fn test_no_aggregate_without_rows_or_filter() {
        assert!(with_aggregate(Vec::new(), Some("Apple")).is_empty());

        let rows = with_aggregate(vec![row("Apple", 0.8)], None);
        assert_eq!(rows.len(), 1);

        let rows = with_aggregate(vec![row("Apple", 0.8)], Some(""));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_mean_score() {
        assert_eq!(mean_score(&[]), None);
        assert_abs_diff_eq!(mean_score(&[row("A", 0.3)]).unwrap(), 0.3);
    }
}
