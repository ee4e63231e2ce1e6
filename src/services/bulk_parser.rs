//! 批量解析服务 - 业务能力层
//!
//! 把一段原始文本切成一个个题目对象并逐个规范化。输入可能是
//! JSON 数组、单个 JSON 对象，或若干拼接 / 按行分隔的 JSON 对象
//! （类 JSONL，但容忍对象内部换行）。
//!
//! 匹配顺序（先命中先用）：
//! 1. 去掉开头的 BOM 字符，去掉首尾空白
//! 2. 以 `[` 开头 → 整体按数组解析；失败则落到扫描
//! 3. 以 `{` 开头且不含 `\n{`（启发式：不像多个根对象）→
//!    整体按单对象解析；失败则落到扫描
//! 4. 逐字符扫描：跟踪转义、字符串、花括号深度，深度回到零即
//!    得到一个完整对象；单个对象解析失败只丢弃该片段并记录，
//!    批次继续
//!
//! 只有数组和单对象两条路径在其分支内是全有或全无的，扫描路径
//! 保证坏片段不拖垮整批。

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AppError, ParseError};
use crate::models::question::Question;
use crate::services::normalizer;
use crate::utils::logging::truncate_text;

/// 一个批次的解析结果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// 成功规范化的题目
    pub questions: Vec<Question>,
    /// 被丢弃的坏片段数量
    pub discarded: usize,
}

/// 解析一段原始文本，返回规范化后的题目和丢弃计数
pub fn parse_batch(content: &str) -> BatchOutcome {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content).trim();
    if text.is_empty() {
        return BatchOutcome::default();
    }

    if text.starts_with('[') {
        match serde_json::from_str::<Vec<Value>>(text) {
            Ok(items) => {
                debug!("按 JSON 数组解析成功，共 {} 条", items.len());
                return BatchOutcome {
                    questions: items.into_iter().map(normalizer::normalize).collect(),
                    discarded: 0,
                };
            }
            Err(e) => {
                warn!("整体数组解析失败，回退到逐对象扫描: {}", e);
            }
        }
    } else if text.starts_with('{') && !text.contains("\n{") {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                debug!("按单个 JSON 对象解析成功");
                return BatchOutcome {
                    questions: vec![normalizer::normalize(value)],
                    discarded: 0,
                };
            }
            Err(e) => {
                warn!("单对象解析失败，回退到逐对象扫描: {}", e);
            }
        }
    }

    scan_concatenated(text)
}

/// 逐字符扫描拼接对象流
fn scan_concatenated(text: &str) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    let mut buf = String::new();
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if depth == 0 {
            // 对象之间的分隔噪音（空白、逗号、数组残片）直接跳过
            if ch == '{' {
                depth = 1;
                buf.clear();
                buf.push(ch);
            }
            continue;
        }

        buf.push(ch);

        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    finish_buffer(&buf, &mut outcome);
                }
            }
            _ => {}
        }
    }

    // 流结束时还悬着的未闭合对象
    if depth > 0 && !buf.is_empty() {
        warn!(
            "输入结尾处有未闭合的对象片段，已丢弃: {}",
            truncate_text(&buf, 60)
        );
        outcome.discarded += 1;
    }

    outcome
}

fn finish_buffer(buf: &str, outcome: &mut BatchOutcome) {
    match serde_json::from_str::<Value>(buf) {
        Ok(value) => {
            outcome.questions.push(normalizer::normalize(value));
        }
        Err(e) => {
            let err = AppError::Parse(ParseError::JsonParseFailed {
                snippet: truncate_text(buf, 60),
                source: Box::new(e),
            });
            warn!("片段已丢弃: {}", err);
            outcome.discarded += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;

    #[test]
    fn test_json_array_input() {
        let content = r#"[
            {"type": "mcq", "prompt": "A?", "options": ["1"]},
            {"type": "fib", "prompt": "B ____"}
        ]"#;
        let outcome = parse_batch(content);
        assert_eq!(outcome.questions.len(), 2);
        assert_eq!(outcome.discarded, 0);
        assert_eq!(outcome.questions[0].question_type(), QuestionType::Mcq);
        assert_eq!(outcome.questions[1].question_type(), QuestionType::Fib);
    }

    #[test]
    fn test_single_object_input() {
        let content = r#"{"type": "mcq", "prompt": "单个对象", "options": ["x"]}"#;
        let outcome = parse_batch(content);
        assert_eq!(outcome.questions.len(), 1);
        assert_eq!(outcome.discarded, 0);
    }

    #[test]
    fn test_bom_and_whitespace_stripped() {
        let content = "\u{feff}  {\"type\": \"mcq\", \"options\": [\"x\"]}  ";
        let outcome = parse_batch(content);
        assert_eq!(outcome.questions.len(), 1);
    }

    #[test]
    fn test_concatenated_objects() {
        let content = r#"{"type": "mcq", "options": ["1"]}
{"type": "fib"}
{"type": "match"}"#;
        let outcome = parse_batch(content);
        assert_eq!(outcome.questions.len(), 3);
        assert_eq!(outcome.discarded, 0);
    }

    #[test]
    fn test_broken_middle_object_does_not_abort_batch() {
        // 第二个对象花括号配平但 JSON 非法
        let content = r#"{"type": "mcq", "options": ["1"]}
{"type": }
{"type": "fib"}"#;
        let outcome = parse_batch(content);
        assert_eq!(outcome.questions.len(), 2);
        assert_eq!(outcome.discarded, 1);
        assert_eq!(outcome.questions[0].question_type(), QuestionType::Mcq);
        assert_eq!(outcome.questions[1].question_type(), QuestionType::Fib);
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let content = r#"{"type": "mcq", "prompt": "集合 {1, 2} 与 \"引号\" 里的 }"}
{"type": "fib", "prompt": "第二题"}"#;
        let outcome = parse_batch(content);
        assert_eq!(outcome.questions.len(), 2);
        assert_eq!(outcome.discarded, 0);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let content = r#"{"type": "mcq", "prompt": "他说: \"{\" 不算开括号"}"#;
        // 单对象路径即可处理，但确认扫描路径也不误判
        let multi = format!("{}\n{}", content, r#"{"type": "fib"}"#);
        let outcome = parse_batch(&multi);
        assert_eq!(outcome.questions.len(), 2);
    }

    #[test]
    fn test_object_with_embedded_newlines() {
        // 对象内部换行不破坏扫描
        let content = "{\"type\": \"mcq\",\n \"options\": [\"1\"]}\n{\"type\": \"fib\"}";
        let outcome = parse_batch(content);
        assert_eq!(outcome.questions.len(), 2);
    }

    #[test]
    fn test_trailing_unclosed_object_discarded() {
        let content = r#"{"type": "mcq", "options": ["1"]}
{"type": "fib", "prompt": "没写完"#;
        let outcome = parse_batch(content);
        assert_eq!(outcome.questions.len(), 1);
        assert_eq!(outcome.discarded, 1);
    }

    #[test]
    fn test_broken_array_falls_back_to_scan() {
        // 数组整体解析失败后，扫描仍能捞出内部完好的对象
        let content = r#"[
            {"type": "mcq", "options": ["1"]},
            {"type": "fib"},
        ]"#;
        let outcome = parse_batch(content);
        assert_eq!(outcome.questions.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let outcome = parse_batch("   \n  ");
        assert!(outcome.questions.is_empty());
        assert_eq!(outcome.discarded, 0);
    }
}
