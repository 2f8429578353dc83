//! 分句
//!
//! 固定分隔符：逗号、分号、" and "、" but "、" while "、句点加空格。
//! 启发式切分，不是语法分析：缩写（"U.S. sales"）会被切开，没有后随空格的小数点不会。

use once_cell::sync::Lazy;
use regex::Regex;

static CLAUSE_DELIMITER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",|;| and | but | while |\. ").expect("clause delimiter pattern is valid")
});

/// 切分并去掉首尾空白；连续分隔符产生的空片段保留
pub fn split_into_clauses(text: &str) -> Vec<&str> {
    CLAUSE_DELIMITER_RE.split(text).map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_each_delimiter() {
        let clauses = split_into_clauses(
            "Apple rose, Samsung fell; Tata held and Infosys slipped but TCS gained while Wipro waited. Done",
        );
        assert_eq!(
            clauses,
            vec![
                "Apple rose",
                "Samsung fell",
                "Tata held",
                "Infosys slipped",
                "TCS gained",
                "Wipro waited",
                "Done"
            ]
        );
    }

    #[test]
    fn test_empty_fragments_preserved() {
        assert_eq!(split_into_clauses(",a,,b,"), vec!["", "a", "", "b", ""]);
        assert_eq!(split_into_clauses(""), vec![""]);
    }

    #[test]
    fn test_period_needs_trailing_space() {
        assert_eq!(split_into_clauses("Revenue grew 3.5 percent"), vec!["Revenue grew 3.5 percent"]);
        assert_eq!(
            split_into_clauses("U.S. sales dipped"),
            vec!["U.S", "sales dipped"]
        );
        assert_eq!(split_into_clauses("It ended."), vec!["It ended."]);
    }

    #[test]
    fn test_conjunctions_need_surrounding_spaces() {
        assert_eq!(
            split_into_clauses("Brandy butter sales while-you-wait"),
            vec!["Brandy butter sales while-you-wait"]
        );
        assert_eq!(split_into_clauses("Apple AND Samsung"), vec!["Apple AND Samsung"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "Apple market is growing rapidly while samsungs sees a drop in their year sales and Tata monthly sales are same as neutral.";
        assert_eq!(split_into_clauses(text), split_into_clauses(text));
        assert_eq!(
            split_into_clauses(text),
            vec![
                "Apple market is growing rapidly",
                "samsungs sees a drop in their year sales",
                "Tata monthly sales are same as neutral."
            ]
        );
    }
}
