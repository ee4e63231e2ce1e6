//! 模式规范化服务 - 业务能力层
//!
//! 把任意世代的题目 JSON 收敛成规范结构。本服务采用宽松自动转换
//! 策略：旧世代输入一律静默转换，不存在拒绝模式。对任何对象形状的
//! 输入都是全函数，缺字段、错类型只会退化成默认值，不会失败。
//!
//! 世代检测顺序：
//! 1. 规范形状：有 `data` 字段且 `type` 是六个标签之一 → 仅补默认值
//! 2. 中期嵌套形状：同时有 `taxonomy` 和 `content` 子对象 → 结构转换
//! 3. 最老的扁平形状：其余一切 → 扁平字段转换

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::metadata::{Difficulty, Grade, Metadata, Pool, Section, Subject, Subpool};
use crate::models::question::{
    generate_id, option_id_for_index, CompositeData, ExpectedLength, FibData, MatchData,
    MatchPair, McqData, McqOption, Question, QuestionData, QuestionType, Solution, SubQuestion,
    SubjectiveData, TableData, TableGrid,
};
use crate::models::style::{BaseStyle, CompositeStyle, OptionListStyle, TableStyle};

/// 旧世代自由格式题型字符串 → 规范标签
///
/// sequencing / sorting 按特例归入 MCQ，不单独建模
static LEGACY_TYPE_MAP: phf::Map<&'static str, QuestionType> = phf::phf_map! {
    "mcq" => QuestionType::Mcq,
    "multiple_choice" => QuestionType::Mcq,
    "multi_select" => QuestionType::Mcq,
    "multiple_select" => QuestionType::Mcq,
    "multiple_response" => QuestionType::Mcq,
    "sequencing" => QuestionType::Mcq,
    "sorting" => QuestionType::Mcq,
    "short_answer" => QuestionType::Subjective,
    "long_answer" => QuestionType::Subjective,
    "labelling" => QuestionType::Subjective,
    "fill_blank" => QuestionType::Fib,
    "fill_in_blank" => QuestionType::Fib,
    "fib" => QuestionType::Fib,
    "match_columns" => QuestionType::Match,
    "matching" => QuestionType::Match,
    "match" => QuestionType::Match,
    "table" => QuestionType::Table,
    "composite" => QuestionType::Composite,
};

/// 会把 allow_multiple 置位的旧题型
const MULTI_SELECT_ALIASES: &[&str] = &["multi_select", "multiple_select", "multiple_response"];

/// 输入世代
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Generation {
    Canonical,
    Nested,
    Flat,
}

/// 把任意 JSON 值规范化成题目
///
/// 全函数：非对象输入当作空对象处理，产出全默认的 SUBJECTIVE 题目
pub fn normalize(raw: Value) -> Question {
    let obj = match raw {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    match detect_generation(&obj) {
        Generation::Canonical => from_canonical(&obj),
        Generation::Nested => from_nested(&obj),
        Generation::Flat => from_flat(&obj),
    }
}

fn detect_generation(obj: &Map<String, Value>) -> Generation {
    let has_known_type = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(QuestionType::from_tag)
        .is_some();
    if obj.contains_key("data") && has_known_type {
        return Generation::Canonical;
    }
    let nested = obj.get("taxonomy").map_or(false, Value::is_object)
        && obj.get("content").map_or(false, Value::is_object);
    if nested {
        return Generation::Nested;
    }
    Generation::Flat
}

// ========== 规范形状：仅补默认值 ==========

fn from_canonical(obj: &Map<String, Value>) -> Question {
    // 世代检测保证 type 在六标签集合内
    let question_type = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(QuestionType::from_tag)
        .unwrap_or(QuestionType::Subjective);

    let empty = Map::new();
    let metadata_src = obj
        .get("metadata")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    Question {
        id: id_or_generate(obj, &["id"]),
        metadata: parse_metadata(metadata_src),
        body: parse_body(question_type, obj.get("data").unwrap_or(&Value::Null)),
        solution: parse_solution(obj.get("solution")),
    }
}

/// 按题型宽松解析 data 载荷，逐字段补默认值
///
/// 顶层 data 和子题 data 共用这一入口
pub fn parse_body(question_type: QuestionType, data: &Value) -> QuestionData {
    let empty = Map::new();
    let obj = data.as_object().unwrap_or(&empty);
    match question_type {
        QuestionType::Mcq => QuestionData::Mcq(McqData {
            content: str_field(obj, "content"),
            options: canonical_options(obj.get("options")),
            allow_multiple: obj
                .get("allow_multiple")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            style: OptionListStyle::from_value(obj.get("style")),
        }),
        QuestionType::Fib => QuestionData::Fib(FibData {
            content: str_field(obj, "content"),
            options_pool: obj
                .get("options_pool")
                .and_then(Value::as_array)
                .map(|arr| arr.iter().map(cell_text).collect())
                .unwrap_or_default(),
            style: OptionListStyle::from_value(obj.get("style")),
        }),
        QuestionType::Match => QuestionData::Match(MatchData {
            content: str_field(obj, "content"),
            pairs: canonical_pairs(obj.get("pairs")),
            style: BaseStyle::from_value(obj.get("style")),
        }),
        QuestionType::Subjective => QuestionData::Subjective(SubjectiveData {
            content: str_field(obj, "content"),
            expected_length: expected_length_of(obj.get("expected_length")),
            style: BaseStyle::from_value(obj.get("style")),
        }),
        QuestionType::Table => QuestionData::Table(TableData {
            content: str_field(obj, "content"),
            table: normalize_table(obj),
            style: TableStyle::from_value(obj.get("style")),
        }),
        QuestionType::Composite => QuestionData::Composite(CompositeData {
            common_content: str_field(obj, "common_content"),
            sub_questions: obj
                .get("sub_questions")
                .and_then(Value::as_array)
                .map(|arr| arr.iter().map(normalize_sub).collect())
                .unwrap_or_default(),
            style: CompositeStyle::from_value(obj.get("style")),
        }),
    }
}

/// 子题规范化
///
/// 规范形状的子题是 {type, data}；其余形状整体走旧版转换，
/// 子题即便带了 solution 也会被丢弃
fn normalize_sub(v: &Value) -> SubQuestion {
    if let Some(m) = v.as_object() {
        let known_type = m
            .get("type")
            .and_then(Value::as_str)
            .and_then(QuestionType::from_tag);
        if let Some(question_type) = known_type {
            if m.contains_key("data") {
                let data = m.get("data").unwrap_or(&Value::Null);
                return SubQuestion {
                    body: parse_body(question_type, data),
                };
            }
        }
    }
    SubQuestion {
        body: normalize(v.clone()).body,
    }
}

// ========== 中期嵌套形状 ==========

fn from_nested(obj: &Map<String, Value>) -> Question {
    let empty = Map::new();
    let taxonomy = obj
        .get("taxonomy")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let content = obj
        .get("content")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let old_type = old_type_of(obj, content);
    let question_type = legacy_type(&old_type);

    let prompt = content.get("prompt");
    let stimulus = content.get("stimulus");
    let fused = fuse_content(prompt, stimulus);

    Question {
        id: id_or_generate(obj, &["id", "question_id"]),
        metadata: parse_metadata(taxonomy),
        body: legacy_body(question_type, content, stimulus, fused, &old_type),
        solution: parse_solution(
            obj.get("solution")
                .or_else(|| content.get("solution"))
                .or_else(|| content.get("answer")),
        ),
    }
}

// ========== 最老的扁平形状 ==========

fn from_flat(obj: &Map<String, Value>) -> Question {
    let old_type = old_type_of(obj, obj);
    let question_type = legacy_type(&old_type);

    let prompt = obj.get("prompt");
    let stimulus = obj.get("stimulus");
    let fused = fuse_content(prompt, stimulus);

    Question {
        id: id_or_generate(obj, &["id", "question_id"]),
        metadata: parse_metadata(obj),
        body: legacy_body(question_type, obj, stimulus, fused, &old_type),
        solution: parse_solution(obj.get("solution").or_else(|| obj.get("answer"))),
    }
}

fn old_type_of(obj: &Map<String, Value>, content: &Map<String, Value>) -> String {
    obj.get("type")
        .or_else(|| content.get("question_type"))
        .or_else(|| content.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// 旧题型字符串 → 规范标签，不认识的一律回退 SUBJECTIVE
fn legacy_type(old: &str) -> QuestionType {
    if let Some(question_type) = LEGACY_TYPE_MAP.get(old) {
        if matches!(old, "sequencing" | "sorting") {
            debug!("旧题型 {:?} 按特例归入 MCQ", old);
        }
        return *question_type;
    }
    if !old.is_empty() {
        debug!("未识别的旧题型 {:?}，回退到 SUBJECTIVE", old);
    }
    QuestionType::Subjective
}

/// 按题型从旧字段构造 data 载荷
fn legacy_body(
    question_type: QuestionType,
    src: &Map<String, Value>,
    stimulus: Option<&Value>,
    fused: String,
    old_type: &str,
) -> QuestionData {
    match question_type {
        QuestionType::Mcq => QuestionData::Mcq(McqData {
            content: fused,
            options: legacy_options(src.get("options")),
            allow_multiple: MULTI_SELECT_ALIASES.contains(&old_type),
            style: OptionListStyle::default(),
        }),
        QuestionType::Fib => QuestionData::Fib(FibData {
            content: fused,
            options_pool: legacy_word_bank(stimulus),
            style: OptionListStyle::default(),
        }),
        QuestionType::Match => QuestionData::Match(MatchData {
            content: fused,
            pairs: legacy_pairs(src, stimulus),
            style: BaseStyle::default(),
        }),
        QuestionType::Subjective => QuestionData::Subjective(SubjectiveData {
            content: fused,
            expected_length: if old_type == "long_answer" {
                ExpectedLength::Long
            } else {
                ExpectedLength::Short
            },
            style: BaseStyle::default(),
        }),
        QuestionType::Table => QuestionData::Table(TableData {
            content: fused,
            table: legacy_table(src, stimulus),
            style: TableStyle::default(),
        }),
        QuestionType::Composite => QuestionData::Composite(CompositeData {
            common_content: fused,
            sub_questions: src
                .get("sub_questions")
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .map(|sub| SubQuestion {
                            body: normalize(sub.clone()).body,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            style: CompositeStyle::default(),
        }),
    }
}

// ========== 内容融合 ==========

/// 把旧式 prompt / stimulus 融合成一段富文本
///
/// 顺序：题干材料文本、材料资源标记、提问文本、提问资源标记，
/// 非空部分之间用空行连接
fn fuse_content(prompt: Option<&Value>, stimulus: Option<&Value>) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(st) = stimulus {
        push_content_parts(st, &mut parts);
    }
    if let Some(p) = prompt {
        push_content_parts(p, &mut parts);
    }
    parts.join("\n\n")
}

fn push_content_parts(v: &Value, parts: &mut Vec<String>) {
    let text = content_text(v);
    if !text.is_empty() {
        parts.push(text);
    }
    let tokens = asset_tokens(v, &["assets", "media"]);
    if !tokens.is_empty() {
        parts.push(tokens.join(" "));
    }
}

fn content_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Object(m) => m
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string(),
        _ => String::new(),
    }
}

/// 收集一个旧内容对象携带的资源，转成图片标记
fn asset_tokens(v: &Value, keys: &[&str]) -> Vec<String> {
    let Some(m) = v.as_object() else {
        return Vec::new();
    };
    let Some(assets) = keys.iter().find_map(|k| m.get(*k)) else {
        return Vec::new();
    };
    let list: Vec<&Value> = match assets {
        Value::Array(arr) => arr.iter().collect(),
        single => vec![single],
    };
    list.into_iter()
        .filter_map(|asset| asset_id(asset).map(|id| format!("[[image:{}]]", id)))
        .collect()
}

/// 提取旧资源对象的图片 id
///
/// 优先级：asset_id → 文件名去扩展名 → tag → id；
/// asset_id 为占位符 "#" 时视为缺失，继续向后取
fn asset_id(v: &Value) -> Option<String> {
    match v {
        // 裸字符串资源按文件名处理
        Value::String(s) => file_stem_of(s),
        Value::Object(m) => {
            if let Some(aid) = m.get("asset_id").and_then(Value::as_str) {
                let aid = aid.trim();
                if !aid.is_empty() && aid != "#" {
                    return Some(aid.to_string());
                }
            }
            if let Some(name) = m.get("filename").and_then(Value::as_str) {
                if let Some(stem) = file_stem_of(name) {
                    return Some(stem);
                }
            }
            if let Some(tag) = m.get("tag").and_then(Value::as_str) {
                let tag = tag.trim();
                if !tag.is_empty() {
                    return Some(tag.to_string());
                }
            }
            if let Some(id) = m.get("id").and_then(Value::as_str) {
                let id = id.trim();
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

fn file_stem_of(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() || name == "#" {
        return None;
    }
    let base = name.rsplit('/').next().unwrap_or(name);
    let stem = match base.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => base,
    };
    Some(stem.to_string())
}

// ========== 选项 / 词库 / 配对 ==========

fn canonical_options(v: Option<&Value>) -> Vec<McqOption> {
    let Some(arr) = v.and_then(Value::as_array) else {
        return Vec::new();
    };
    arr.iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(m) => McqOption {
                id: m
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| option_id_for_index(i)),
                text: m
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
            },
            other => McqOption {
                id: option_id_for_index(i),
                text: cell_text(other),
            },
        })
        .collect()
}

/// 旧选项：字符串，或携带 text 和资源的对象；资源标记前置到选项文本
fn legacy_options(v: Option<&Value>) -> Vec<McqOption> {
    let Some(arr) = v.and_then(Value::as_array) else {
        return Vec::new();
    };
    arr.iter()
        .enumerate()
        .map(|(i, item)| {
            let text = match item {
                Value::Object(m) => {
                    let base = m
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .trim()
                        .to_string();
                    let tokens = asset_tokens(item, &["assets", "media", "asset"]);
                    if tokens.is_empty() {
                        base
                    } else if base.is_empty() {
                        tokens.join(" ")
                    } else {
                        format!("{} {}", tokens.join(" "), base)
                    }
                }
                other => cell_text(other),
            };
            McqOption {
                id: option_id_for_index(i),
                text,
            }
        })
        .collect()
}

fn legacy_word_bank(stimulus: Option<&Value>) -> Vec<String> {
    stimulus
        .and_then(Value::as_object)
        .and_then(|m| m.get("word_bank"))
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .map(cell_text)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// 旧配对：pairs.left_column / pairs.right_column 按下标拉链，
/// 短边用空字符串补齐到长边
fn legacy_pairs(src: &Map<String, Value>, stimulus: Option<&Value>) -> Vec<MatchPair> {
    let pairs_val = src
        .get("pairs")
        .or_else(|| stimulus.and_then(Value::as_object).and_then(|m| m.get("pairs")));
    let Some(obj) = pairs_val.and_then(Value::as_object) else {
        return Vec::new();
    };
    let left = column_texts(obj.get("left_column"));
    let right = column_texts(obj.get("right_column"));
    let len = left.len().max(right.len());
    (0..len)
        .map(|i| MatchPair {
            left: left.get(i).cloned().unwrap_or_default(),
            right: right.get(i).cloned().unwrap_or_default(),
        })
        .collect()
}

fn column_texts(v: Option<&Value>) -> Vec<String> {
    v.and_then(Value::as_array)
        .map(|arr| arr.iter().map(cell_text).collect())
        .unwrap_or_default()
}

fn canonical_pairs(v: Option<&Value>) -> Vec<MatchPair> {
    let Some(arr) = v.and_then(Value::as_array) else {
        return Vec::new();
    };
    arr.iter()
        .map(|item| {
            let obj = item.as_object();
            MatchPair {
                left: obj
                    .and_then(|m| m.get("left"))
                    .map(cell_text)
                    .unwrap_or_default(),
                right: obj
                    .and_then(|m| m.get("right"))
                    .map(cell_text)
                    .unwrap_or_default(),
            }
        })
        .collect()
}

// ========== 表格规范化 ==========

/// 表格数据规范化，幂等
///
/// 查找顺序：`table` 对象 → 旧式平行 `rows`/`columns` 描述 →
/// 兜底默认 2x2 网格
pub fn normalize_table(src: &Map<String, Value>) -> TableGrid {
    if let Some(table) = src.get("table").and_then(Value::as_object) {
        return normalize_table_object(table);
    }
    let columns = src.get("columns").and_then(Value::as_array);
    let rows = src.get("rows").and_then(Value::as_array);
    if let (Some(columns), Some(rows)) = (columns, rows) {
        return grid_from_descriptors(columns, rows);
    }
    TableGrid::default()
}

fn normalize_table_object(table: &Map<String, Value>) -> TableGrid {
    let mut header: Vec<String> = table
        .get("header")
        .or_else(|| table.get("headers"))
        .and_then(Value::as_array)
        .map(|arr| arr.iter().map(cell_text).collect())
        .unwrap_or_default();

    let mut rows: Vec<Vec<String>> = Vec::new();
    if let Some(rows_arr) = table.get("rows").and_then(Value::as_array) {
        if rows_arr.first().map_or(false, Value::is_array) {
            // 已经是二维数组，逐格拍平即可
            rows = rows_arr
                .iter()
                .map(|row| {
                    row.as_array()
                        .map(|cells| cells.iter().map(cell_text).collect())
                        .unwrap_or_default()
                })
                .collect();
        } else if !rows_arr.is_empty() {
            // 一维单元格对象数组：每项变成行首标签，补齐到表头宽度
            let width = header.len().max(1);
            rows = rows_arr
                .iter()
                .map(|item| {
                    let mut row = vec![String::new(); width];
                    row[0] = cell_text(item);
                    row
                })
                .collect();
        }
    }

    if header.is_empty() {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return TableGrid::default();
        }
        header = generic_header(width);
    }
    if rows.is_empty() {
        rows = vec![vec![String::new(); header.len()]; 2];
    }
    TableGrid { header, rows }
}

/// 旧式平行描述：列标签成为表头，行标签落在第 0 列
fn grid_from_descriptors(columns: &[Value], rows: &[Value]) -> TableGrid {
    let header: Vec<String> = columns.iter().map(cell_text).collect();
    if header.is_empty() && rows.is_empty() {
        return TableGrid::default();
    }
    let header = if header.is_empty() {
        generic_header(2)
    } else {
        header
    };
    let width = header.len();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|item| {
            let mut row = vec![String::new(); width];
            row[0] = cell_text(item);
            row
        })
        .collect();
    let body = if body.is_empty() {
        vec![vec![String::new(); width]; 2]
    } else {
        body
    };
    TableGrid { header, rows: body }
}

fn generic_header(width: usize) -> Vec<String> {
    (1..=width).map(|i| format!("Column {}", i)).collect()
}

fn has_table_fields(m: &Map<String, Value>) -> bool {
    m.contains_key("table") || (m.contains_key("rows") && m.contains_key("columns"))
}

fn legacy_table(src: &Map<String, Value>, stimulus: Option<&Value>) -> TableGrid {
    if let Some(st) = stimulus.and_then(Value::as_object) {
        if has_table_fields(st) {
            return normalize_table(st);
        }
    }
    normalize_table(src)
}

// ========== 元数据 ==========

/// 逐字段宽松解析元数据
///
/// 枚举字段解析失败退回默认值；数字字段按空值合并语义处理，
/// 0 是合法章节号；marks 下限收敛到 1
fn parse_metadata(source: &Map<String, Value>) -> Metadata {
    let grade = enum_str_field(source, &["grade", "class"])
        .and_then(|s| Grade::find(&s))
        .unwrap_or_default();
    let subject = enum_str_field(source, &["subject"])
        .and_then(|s| Subject::find(&s))
        .unwrap_or_default();
    let chapter = num_field(source, &["chapter", "chapter_no"])
        .map(|n| n as u32)
        .unwrap_or(1);
    let section = enum_str_field(source, &["section"])
        .and_then(|s| Section::from_str(&s))
        .unwrap_or_default();
    let difficulty = enum_str_field(source, &["difficulty", "level"])
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();
    let marks = num_field(source, &["marks", "points"])
        .map(|n| (n as u32).max(1))
        .unwrap_or(1);
    let pool = enum_str_field(source, &["pool"])
        .and_then(|s| Pool::from_str(&s))
        .unwrap_or_default();
    let mut subpool = enum_str_field(source, &["subpool"])
        .and_then(|s| Subpool::from_str(&s))
        .unwrap_or_default();

    // NA 只在 Practice 池合法
    if pool == Pool::Exam && subpool == Subpool::Na {
        subpool = Subpool::Written;
    }

    Metadata {
        grade,
        subject,
        chapter,
        section,
        difficulty,
        marks,
        pool,
        subpool,
    }
}

// ========== 通用取值辅助 ==========

fn id_or_generate(obj: &Map<String, Value>, keys: &[&str]) -> String {
    for key in keys {
        match obj.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    generate_id()
}

fn str_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn enum_str_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn num_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_u64))
}

fn expected_length_of(v: Option<&Value>) -> ExpectedLength {
    match v.and_then(Value::as_str) {
        Some(s) if s.eq_ignore_ascii_case("long") => ExpectedLength::Long,
        _ => ExpectedLength::Short,
    }
}

/// 单元格拍平：字符串直接用，对象取 text / label / id
fn cell_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(m) => ["text", "label", "id"]
            .iter()
            .find_map(|k| m.get(*k).and_then(Value::as_str))
            .unwrap_or("")
            .trim()
            .to_string(),
        _ => String::new(),
    }
}

fn parse_solution(v: Option<&Value>) -> Solution {
    match v {
        Some(Value::String(s)) => Solution { text: s.clone() },
        Some(Value::Object(m)) => Solution {
            text: m
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        },
        _ => Solution::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::style::{GridLines, Layout, SubLayout};
    use serde_json::json;

    #[test]
    fn test_flat_legacy_mcq_scenario() {
        let raw = json!({
            "question_id": "q1",
            "type": "mcq",
            "prompt": "2+2?",
            "options": ["3", "4"],
            "points": 2
        });
        let q = normalize(raw);
        assert_eq!(q.id, "q1");
        assert_eq!(q.metadata.marks, 2);
        match &q.body {
            QuestionData::Mcq(d) => {
                assert_eq!(d.content, "2+2?");
                assert_eq!(d.options.len(), 2);
                assert_eq!(d.options[0].id, "a");
                assert_eq!(d.options[0].text, "3");
                assert_eq!(d.options[1].id, "b");
                assert_eq!(d.options[1].text, "4");
                assert!(!d.allow_multiple);
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_subjective() {
        let q = normalize(json!({"type": "unknown_garbage"}));
        assert_eq!(q.question_type(), QuestionType::Subjective);
        match &q.body {
            QuestionData::Subjective(d) => {
                assert_eq!(d.expected_length, ExpectedLength::Short);
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_multi_select_alias_sets_allow_multiple() {
        let q = normalize(json!({"type": "multiple_select", "options": ["x", "y"]}));
        match &q.body {
            QuestionData::Mcq(d) => assert!(d.allow_multiple),
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_long_answer_sets_expected_length() {
        let q = normalize(json!({"type": "long_answer", "prompt": "论述题"}));
        match &q.body {
            QuestionData::Subjective(d) => {
                assert_eq!(d.expected_length, ExpectedLength::Long);
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_content_fusion_order_and_assets() {
        let raw = json!({
            "type": "short_answer",
            "stimulus": {
                "text": "阅读材料",
                "assets": [{"asset_id": "chart-1"}]
            },
            "prompt": {
                "text": "回答问题",
                "media": [{"filename": "photo.png"}]
            }
        });
        let q = normalize(raw);
        match &q.body {
            QuestionData::Subjective(d) => {
                assert_eq!(
                    d.content,
                    "阅读材料\n\n[[image:chart-1]]\n\n回答问题\n\n[[image:photo]]"
                );
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_asset_id_contributes_no_token() {
        let raw = json!({
            "type": "short_answer",
            "prompt": {
                "text": "看题",
                "assets": [{"asset_id": "#"}]
            }
        });
        let q = normalize(raw);
        match &q.body {
            QuestionData::Subjective(d) => assert_eq!(d.content, "看题"),
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_asset_id_priority_falls_through_placeholder() {
        // asset_id 是占位符时退到文件名
        let raw = json!({
            "type": "short_answer",
            "prompt": {
                "assets": [{"asset_id": "#", "filename": "cells.jpeg", "tag": "t1"}]
            }
        });
        let q = normalize(raw);
        match &q.body {
            QuestionData::Subjective(d) => assert_eq!(d.content, "[[image:cells]]"),
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_match_pairs_padded_to_longer_column() {
        let raw = json!({
            "type": "match_columns",
            "pairs": {
                "left_column": [{"text": "甲"}, {"text": "乙"}, {"text": "丙"}],
                "right_column": [{"text": "1"}, {"text": "2"}]
            }
        });
        let q = normalize(raw);
        match &q.body {
            QuestionData::Match(d) => {
                assert_eq!(d.pairs.len(), 3);
                assert_eq!(d.pairs[2].left, "丙");
                assert_eq!(d.pairs[2].right, "");
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_fib_word_bank_becomes_options_pool() {
        let raw = json!({
            "type": "fill_blank",
            "prompt": "水是 ____",
            "stimulus": {"word_bank": ["液体", {"text": "固体"}]}
        });
        let q = normalize(raw);
        match &q.body {
            QuestionData::Fib(d) => {
                assert_eq!(d.options_pool, vec!["液体", "固体"]);
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_legacy_table_descriptors() {
        let q = normalize(json!({
            "type": "table",
            "columns": ["A", "B"],
            "rows": [{"text": "r1"}, {"text": "r2"}]
        }));
        match &q.body {
            QuestionData::Table(d) => {
                assert_eq!(d.table.header, vec!["A", "B"]);
                assert_eq!(
                    d.table.rows,
                    vec![vec!["r1".to_string(), "".to_string()], vec![
                        "r2".to_string(),
                        "".to_string()
                    ]]
                );
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_table_default_grid_when_nothing_derivable() {
        let q = normalize(json!({"type": "TABLE", "data": {}}));
        match &q.body {
            QuestionData::Table(d) => {
                assert_eq!(d.table.header.len(), 2);
                assert_eq!(d.table.rows.len(), 2);
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_table_object_with_row_objects_padded() {
        let q = normalize(json!({
            "type": "TABLE",
            "data": {
                "table": {
                    "header": ["名称", "数量", "单位"],
                    "rows": [{"text": "苹果"}]
                }
            }
        }));
        match &q.body {
            QuestionData::Table(d) => {
                assert_eq!(d.table.rows, vec![vec![
                    "苹果".to_string(),
                    "".to_string(),
                    "".to_string()
                ]]);
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_nested_generation_conversion() {
        let raw = json!({
            "question_id": "n-42",
            "type": "multiple_choice",
            "taxonomy": {
                "class": "Grade 8",
                "subject": "Mathematics",
                "chapter": 0,
                "difficulty": "hard",
                "points": 3,
                "pool": "exam"
            },
            "content": {
                "prompt": {"text": "选出质数"},
                "options": [
                    {"text": "7", "assets": [{"asset_id": "seven"}]},
                    "8"
                ]
            }
        });
        let q = normalize(raw);
        assert_eq!(q.id, "n-42");
        assert_eq!(q.metadata.grade, Grade::Eight);
        assert_eq!(q.metadata.subject, Subject::Maths);
        // 0 是合法章节号，不退默认值
        assert_eq!(q.metadata.chapter, 0);
        assert_eq!(q.metadata.difficulty, Difficulty::Hard);
        assert_eq!(q.metadata.marks, 3);
        assert_eq!(q.metadata.pool, Pool::Exam);
        // Exam 池下 NA 不合法，被收敛到 Written
        assert_eq!(q.metadata.subpool, Subpool::Written);
        match &q.body {
            QuestionData::Mcq(d) => {
                assert_eq!(d.options[0].text, "[[image:seven]] 7");
                assert_eq!(d.options[1].text, "8");
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_canonical_defaulting_pass_only() {
        let raw = json!({
            "id": "c-1",
            "type": "MCQ",
            "data": {
                "content": "规范题干",
                "options": [{"id": "x", "text": "唯一选项"}]
            }
        });
        let q = normalize(raw);
        assert_eq!(q.id, "c-1");
        match &q.body {
            QuestionData::Mcq(d) => {
                // 已有 id 保留，缺失 style 补默认
                assert_eq!(d.options[0].id, "x");
                assert_eq!(d.style.image_layout, Layout::Vertical);
            }
            other => panic!("题型不符: {:?}", other),
        }
        assert_eq!(q.solution.text, "");
    }

    #[test]
    fn test_bare_string_solution_wrapped() {
        let q = normalize(json!({
            "type": "SUBJECTIVE",
            "data": {},
            "solution": "直接写的答案"
        }));
        assert_eq!(q.solution.text, "直接写的答案");
    }

    #[test]
    fn test_composite_recursive_conversion() {
        let raw = json!({
            "type": "composite",
            "stimulus": {"text": "阅读短文"},
            "sub_questions": [
                {"type": "mcq", "prompt": "第一题", "options": ["a1", "a2"]},
                {"type": "fill_blank", "prompt": "第二题 ____"}
            ]
        });
        let q = normalize(raw);
        match &q.body {
            QuestionData::Composite(d) => {
                assert_eq!(d.common_content, "阅读短文");
                assert_eq!(d.sub_questions.len(), 2);
                assert_eq!(
                    d.sub_questions[0].body.question_type(),
                    QuestionType::Mcq
                );
                assert_eq!(
                    d.sub_questions[1].body.question_type(),
                    QuestionType::Fib
                );
                assert_eq!(d.style.sub_questions_layout, SubLayout::Vertical);
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_style_normalization_of_existing_style() {
        let q = normalize(json!({
            "type": "TABLE",
            "data": {
                "table": {"header": ["h"], "rows": [["c"]]},
                "style": {
                    "image_layout": "horizontal",
                    "table_grid_lines": "zigzag",
                    "hide_header": "true",
                    "column_widths": [64]
                }
            }
        }));
        match &q.body {
            QuestionData::Table(d) => {
                assert_eq!(d.style.image_layout, Layout::Horizontal);
                assert_eq!(d.style.table_grid_lines, GridLines::All);
                assert!(d.style.hide_header);
                assert_eq!(d.style.column_widths, Some(vec![64]));
            }
            other => panic!("题型不符: {:?}", other),
        }
    }

    #[test]
    fn test_missing_id_is_generated() {
        let q = normalize(json!({"type": "MCQ", "data": {}}));
        assert!(!q.id.is_empty());
    }

    #[test]
    fn test_idempotence_on_canonical_question() {
        let raw = json!({
            "id": "stable-1",
            "metadata": {
                "grade": "7",
                "subject": "Science",
                "chapter": 3,
                "section": "B",
                "difficulty": "Medium",
                "marks": 2,
                "pool": "Practice",
                "subpool": "NA"
            },
            "type": "FIB",
            "data": {
                "content": "水的化学式是 [[gap]]",
                "options_pool": ["H2O", "CO2"],
                "style": {"image_layout": "vertical", "options_layout": "horizontal"}
            },
            "solution": {"text": "H2O"}
        });
        let first = normalize(raw);
        let second = normalize(serde_json::to_value(&first).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_roundtrip_canonical_question_through_serialization() {
        let mut q = Question::empty(QuestionType::Composite);
        q.id = "rt-1".to_string();
        let text = serde_json::to_string(&q).unwrap();
        let reparsed = normalize(serde_json::from_str(&text).unwrap());
        assert_eq!(q, reparsed);
    }

    #[test]
    fn test_non_object_input_degrades_to_default_subjective() {
        let q = normalize(json!("不是对象"));
        assert_eq!(q.question_type(), QuestionType::Subjective);
        assert!(!q.id.is_empty());
    }
}
