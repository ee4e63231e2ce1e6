//! 题目数据模型
//!
//! 规范化之后的唯一权威结构：`type` 标签决定 `data` 的变体形状，
//! 每个变体都强制携带自己的 style。内存结构即 JSON 序列化形状，
//! 没有独立的线上编码层。

use chrono::Local;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::metadata::Metadata;
use crate::models::style::{BaseStyle, CompositeStyle, OptionListStyle, TableStyle};

/// 六种规范题型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "MCQ")]
    Mcq,
    #[serde(rename = "FIB")]
    Fib,
    #[serde(rename = "MATCH")]
    Match,
    #[serde(rename = "SUBJECTIVE")]
    Subjective,
    #[serde(rename = "TABLE")]
    Table,
    #[serde(rename = "COMPOSITE")]
    Composite,
}

impl QuestionType {
    /// 获取规范标签
    pub fn tag(self) -> &'static str {
        match self {
            QuestionType::Mcq => "MCQ",
            QuestionType::Fib => "FIB",
            QuestionType::Match => "MATCH",
            QuestionType::Subjective => "SUBJECTIVE",
            QuestionType::Table => "TABLE",
            QuestionType::Composite => "COMPOSITE",
        }
    }

    /// 从规范标签解析（区分大小写的封闭集合）
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "MCQ" => Some(QuestionType::Mcq),
            "FIB" => Some(QuestionType::Fib),
            "MATCH" => Some(QuestionType::Match),
            "SUBJECTIVE" => Some(QuestionType::Subjective),
            "TABLE" => Some(QuestionType::Table),
            "COMPOSITE" => Some(QuestionType::Composite),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// 规范化后的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub body: QuestionData,
    pub solution: Solution,
}

impl Question {
    /// 创建指定题型的空题目，所有字段取默认值
    pub fn empty(question_type: QuestionType) -> Self {
        Self {
            id: generate_id(),
            metadata: Metadata::default(),
            body: QuestionData::default_for(question_type),
            solution: Solution::default(),
        }
    }

    /// 题型标签
    pub fn question_type(&self) -> QuestionType {
        self.body.question_type()
    }
}

/// 题目正文，以 `type` 为标签的多态 `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum QuestionData {
    #[serde(rename = "MCQ")]
    Mcq(McqData),
    #[serde(rename = "FIB")]
    Fib(FibData),
    #[serde(rename = "MATCH")]
    Match(MatchData),
    #[serde(rename = "SUBJECTIVE")]
    Subjective(SubjectiveData),
    #[serde(rename = "TABLE")]
    Table(TableData),
    #[serde(rename = "COMPOSITE")]
    Composite(CompositeData),
}

impl QuestionData {
    /// 构造指定题型的默认 data 结构
    ///
    /// 每次调用都现场构造新值，不共享任何默认对象
    pub fn default_for(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Mcq => QuestionData::Mcq(McqData::default()),
            QuestionType::Fib => QuestionData::Fib(FibData::default()),
            QuestionType::Match => QuestionData::Match(MatchData::default()),
            QuestionType::Subjective => QuestionData::Subjective(SubjectiveData::default()),
            QuestionType::Table => QuestionData::Table(TableData::default()),
            QuestionType::Composite => QuestionData::Composite(CompositeData::default()),
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionData::Mcq(_) => QuestionType::Mcq,
            QuestionData::Fib(_) => QuestionType::Fib,
            QuestionData::Match(_) => QuestionType::Match,
            QuestionData::Subjective(_) => QuestionType::Subjective,
            QuestionData::Table(_) => QuestionType::Table,
            QuestionData::Composite(_) => QuestionType::Composite,
        }
    }
}

/// 单选/多选题
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct McqData {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub options: Vec<McqOption>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default)]
    pub style: OptionListStyle,
}

/// 选择题选项
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct McqOption {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// 为缺失 id 的选项按数组顺序分配字母 id
pub fn option_id_for_index(index: usize) -> String {
    if index < 26 {
        ((b'a' + index as u8) as char).to_string()
    } else {
        format!("opt{}", index + 1)
    }
}

/// 填空题
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FibData {
    #[serde(default)]
    pub content: String,
    /// 词库（平铺字符串列表）
    #[serde(default)]
    pub options_pool: Vec<String>,
    #[serde(default)]
    pub style: OptionListStyle,
}

/// 连线题
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchData {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pairs: Vec<MatchPair>,
    #[serde(default)]
    pub style: BaseStyle,
}

/// 连线题配对
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchPair {
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub right: String,
}

/// 主观题
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubjectiveData {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub expected_length: ExpectedLength,
    #[serde(default)]
    pub style: BaseStyle,
}

/// 主观题期望答案长度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedLength {
    Short,
    Long,
}

impl Default for ExpectedLength {
    fn default() -> Self {
        ExpectedLength::Short
    }
}

/// 表格题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub content: String,
    pub table: TableGrid,
    #[serde(default)]
    pub style: TableStyle,
}

impl Default for TableData {
    fn default() -> Self {
        Self {
            content: String::new(),
            table: TableGrid::default(),
            style: TableStyle::default(),
        }
    }
}

/// 表格结构：表头 + 行优先的二维单元格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGrid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Default for TableGrid {
    fn default() -> Self {
        // 默认 2x2 网格，通用列名
        Self {
            header: vec!["Column 1".to_string(), "Column 2".to_string()],
            rows: vec![
                vec![String::new(), String::new()],
                vec![String::new(), String::new()],
            ],
        }
    }
}

/// 复合题
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositeData {
    #[serde(default)]
    pub common_content: String,
    #[serde(default)]
    pub sub_questions: Vec<SubQuestion>,
    #[serde(default)]
    pub style: CompositeStyle,
}

/// 子题：与顶层题目共享 type/data 形状，但没有自己的 solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestion {
    #[serde(flatten)]
    pub body: QuestionData,
}

/// 解答
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Solution {
    #[serde(default)]
    pub text: String,
}

/// 生成新题目 ID：本地时间戳 + 小随机后缀
///
/// 不做防碰撞，重复概率可接受
pub fn generate_id() -> String {
    let timestamp = Local::now().format("%Y%m%d%H%M%S%3f");
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("q{}{:03}", timestamp, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_question_carries_style() {
        let q = Question::empty(QuestionType::Mcq);
        match &q.body {
            QuestionData::Mcq(data) => {
                assert!(data.options.is_empty());
                assert!(!data.allow_multiple);
            }
            other => panic!("题型不符: {:?}", other),
        }
        assert!(!q.id.is_empty());
    }

    #[test]
    fn test_serde_shape_is_type_plus_data() {
        let q = Question::empty(QuestionType::Fib);
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["type"], "FIB");
        assert!(v["data"]["style"].is_object());
        assert_eq!(v["solution"]["text"], "");
    }

    #[test]
    fn test_default_table_is_two_by_two() {
        let grid = TableGrid::default();
        assert_eq!(grid.header.len(), 2);
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows[0].len(), 2);
    }

    #[test]
    fn test_option_id_assignment() {
        assert_eq!(option_id_for_index(0), "a");
        assert_eq!(option_id_for_index(3), "d");
        assert_eq!(option_id_for_index(26), "opt27");
    }

    #[test]
    fn test_canonical_roundtrip_through_json() {
        let mut q = Question::empty(QuestionType::Match);
        if let QuestionData::Match(ref mut data) = q.body {
            data.pairs.push(MatchPair {
                left: "水".to_string(),
                right: "H2O".to_string(),
            });
        }
        let text = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&text).unwrap();
        assert_eq!(q, back);
    }
}
