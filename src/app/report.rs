//! 结果输出：对齐的文本表格或 JSON

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use entity_sentiment_ai::SentimentRow;
use entity_sentiment_core::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    pub entity_filter: Option<String>,
    pub analyzed_at: DateTime<Utc>,
    pub row_count: usize,
    pub rows: Vec<SentimentRow>,
}

const HEADERS: [&str; 4] = ["entity", "score", "label", "clause"];

impl SentimentReport {
    pub fn new(entity_filter: Option<&str>, rows: Vec<SentimentRow>) -> Self {
        Self {
            entity_filter: entity_filter.map(str::to_string),
            analyzed_at: Utc::now(),
            row_count: rows.len(),
            rows,
        }
    }

    pub fn render(&self, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Table => Ok(self.to_table()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// 列宽按内容自适应，最后一列不补空格
    pub fn to_table(&self) -> String {
        let cells: Vec<[String; 4]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.entity.clone(),
                    format!("{:.4}", row.score),
                    row.label.to_string(),
                    row.clause.clone(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &HEADERS.map(str::to_string), &widths);
        if cells.is_empty() {
            out.push_str("(no entities found)\n");
            return out;
        }
        for row in &cells {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let last = cells.len() - 1;
    for (i, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
        if i == last {
            let _ = writeln!(out, "{}", cell);
        } else {
            let pad = width - cell.chars().count();
            let _ = write!(out, "{}{}  ", cell, " ".repeat(pad));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_has_header_and_notice() {
        let table = SentimentReport::new(None, Vec::new()).to_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines, vec!["entity  score  label  clause", "(no entities found)"]);
    }

    #[test]
    fn test_columns_aligned() {
        let rows = vec![
            SentimentRow::clause_row("Apple", "Apple rose", 0.8),
            SentimentRow::aggregate_row("Apple", 0.8),
        ];
        let table = SentimentReport::new(Some("Apple"), rows).to_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "entity  score   label          clause");
        assert_eq!(lines[1], "Apple   0.8000  positive       Apple rose");
        assert_eq!(lines[2], "Apple   0.8000  MEAN-positive  AGGREGATED");
    }
}
