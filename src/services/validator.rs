//! 结构校验服务 - 业务能力层
//!
//! 规范化之后、导出之前的结构完整性检查。纯函数，不修改输入，
//! 不抛错。所有检查无条件全部执行，互不短路，每条失败各自追加
//! 一条消息，由调用方决定是否凭非空错误列表阻断导出。
//!
//! 校验对象是规范 JSON 文档（而不是类型化结构），这样手工编辑过
//! 的导出文件也能被完整检查。

use serde_json::Value;

use crate::models::question::Question;

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

const CANONICAL_TAGS: &[&str] = &["MCQ", "FIB", "MATCH", "SUBJECTIVE", "TABLE", "COMPOSITE"];

/// 校验一份规范 JSON 文档
pub fn validate(doc: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    // 必备字段逐个检查
    for field in ["id", "metadata", "type", "data", "solution"] {
        if doc.get(field).map_or(true, Value::is_null) {
            errors.push(format!("缺少字段: {}", field));
        }
    }

    // 题型标签必须在封闭集合内
    let tag = doc.get("type").and_then(Value::as_str);
    match tag {
        Some(t) if CANONICAL_TAGS.contains(&t) => {}
        Some(t) => errors.push(format!("未知题型: {}", t)),
        None => {}
    }

    let data = doc.get("data").and_then(Value::as_object);

    // style 是规范化之后的硬性要求
    let has_style = data
        .and_then(|d| d.get("style"))
        .map_or(false, Value::is_object);
    if !has_style {
        errors.push("缺少 data.style".to_string());
    }

    match tag {
        Some("MCQ") => {
            if !non_empty_array(data.and_then(|d| d.get("options"))) {
                errors.push("MCQ 的 options 为空".to_string());
            }
        }
        Some("MATCH") => {
            if !non_empty_array(data.and_then(|d| d.get("pairs"))) {
                errors.push("MATCH 的 pairs 为空".to_string());
            }
        }
        Some("TABLE") => {
            let table = data.and_then(|d| d.get("table"));
            if table.map_or(true, |t| !t.is_object()) {
                errors.push("TABLE 缺少 data.table".to_string());
            }
            if !non_empty_array(table.and_then(|t| t.get("rows"))) {
                errors.push("TABLE 的 table.rows 为空".to_string());
            }
        }
        Some("COMPOSITE") => {
            let subs = data.and_then(|d| d.get("sub_questions"));
            if !non_empty_array(subs) {
                errors.push("COMPOSITE 的 sub_questions 为空".to_string());
            }
            if let Some(arr) = subs.and_then(Value::as_array) {
                for (i, sub) in arr.iter().enumerate() {
                    let sub_style = sub
                        .get("data")
                        .and_then(|d| d.get("style"))
                        .map_or(false, Value::is_object);
                    if !sub_style {
                        // 面向人的消息按 1 起计数
                        errors.push(format!("子题 {} 缺少 data.style", i + 1));
                    }
                }
            }
        }
        _ => {}
    }

    ValidationReport::from_errors(errors)
}

/// 校验类型化题目（序列化成规范 JSON 后复用文档校验）
pub fn validate_question(question: &Question) -> ValidationReport {
    match serde_json::to_value(question) {
        Ok(doc) => validate(&doc),
        Err(e) => ValidationReport::from_errors(vec![format!("题目无法序列化: {}", e)]),
    }
}

fn non_empty_array(v: Option<&Value>) -> bool {
    v.and_then(Value::as_array).map_or(false, |a| !a.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{
        MatchPair, McqOption, Question, QuestionData, QuestionType,
    };
    use crate::services::normalizer;
    use serde_json::json;

    #[test]
    fn test_normalized_question_passes() {
        let q = normalizer::normalize(json!({
            "type": "mcq",
            "prompt": "合法题目",
            "options": ["1", "2"]
        }));
        let report = validate_question(&q);
        assert!(report.valid, "错误: {:?}", report.errors);
    }

    #[test]
    fn test_missing_fields_each_reported() {
        let report = validate(&json!({}));
        assert!(!report.valid);
        for field in ["id", "metadata", "type", "data", "solution"] {
            assert!(
                report.errors.iter().any(|e| e.contains(field)),
                "缺少关于 {} 的错误",
                field
            );
        }
    }

    #[test]
    fn test_unknown_type_reported() {
        let report = validate(&json!({"type": "ESSAY"}));
        assert!(report.errors.iter().any(|e| e.contains("未知题型")));
    }

    #[test]
    fn test_empty_mcq_options_reported() {
        let mut q = Question::empty(QuestionType::Mcq);
        q.solution.text = "略".to_string();
        let report = validate_question(&q);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("options")));
    }

    #[test]
    fn test_empty_match_pairs_reported() {
        let q = Question::empty(QuestionType::Match);
        let report = validate_question(&q);
        assert!(report.errors.iter().any(|e| e.contains("pairs")));
    }

    #[test]
    fn test_table_without_rows_reported() {
        let report = validate(&json!({
            "id": "t1",
            "metadata": {},
            "type": "TABLE",
            "data": {"style": {}, "table": {"header": [], "rows": []}},
            "solution": {"text": ""}
        }));
        assert!(report.errors.iter().any(|e| e.contains("table.rows")));
    }

    #[test]
    fn test_composite_subquestion_style_one_message_each() {
        let doc = json!({
            "id": "c1",
            "metadata": {},
            "type": "COMPOSITE",
            "data": {
                "style": {},
                "sub_questions": [
                    {"type": "MCQ", "data": {"style": {}, "options": [{"id": "a", "text": "x"}]}},
                    {"type": "FIB", "data": {}},
                ]
            },
            "solution": {"text": ""}
        });
        let report = validate(&doc);
        assert!(!report.valid);
        // 第二个子题缺 style，消息按 1 起计数
        assert!(report.errors.iter().any(|e| e.contains("子题 2")));
        assert!(!report.errors.iter().any(|e| e.contains("子题 1")));
    }

    #[test]
    fn test_all_checks_run_without_short_circuit() {
        // type 未知时，字段缺失和 style 缺失仍然都报
        let report = validate(&json!({"type": "bogus"}));
        assert!(report.errors.len() >= 3);
    }

    #[test]
    fn test_valid_question_via_builders() {
        let mut q = Question::empty(QuestionType::Mcq);
        if let QuestionData::Mcq(ref mut d) = q.body {
            d.options.push(McqOption {
                id: "a".to_string(),
                text: "选项".to_string(),
            });
        }
        assert!(validate_question(&q).valid);

        let mut m = Question::empty(QuestionType::Match);
        if let QuestionData::Match(ref mut d) = m.body {
            d.pairs.push(MatchPair::default());
        }
        assert!(validate_question(&m).valid);
    }
}
