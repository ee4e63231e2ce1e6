//! 版式配置模型
//!
//! 每种题型的 data 规范化之后必须携带一个完整的 style 对象。
//! 每个字段都有两条路径：缺失时取默认值，存在但不合法时收敛到合法值。
//! 默认值一律由函数现场构造，不使用共享常量，避免跨题目串改。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 布局方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Vertical,
    Horizontal,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Vertical
    }
}

impl Layout {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "vertical" => Some(Layout::Vertical),
            "horizontal" => Some(Layout::Horizontal),
            _ => None,
        }
    }

    /// 宽松解析：不是合法布局值时退回 vertical
    pub fn parse(v: Option<&Value>) -> Self {
        v.and_then(Value::as_str)
            .and_then(Self::from_str)
            .unwrap_or_default()
    }
}

/// 子题布局方向（比普通布局多一个 matrix）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubLayout {
    Vertical,
    Horizontal,
    Matrix,
}

impl Default for SubLayout {
    fn default() -> Self {
        SubLayout::Vertical
    }
}

impl SubLayout {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "vertical" => Some(SubLayout::Vertical),
            "horizontal" => Some(SubLayout::Horizontal),
            "matrix" => Some(SubLayout::Matrix),
            _ => None,
        }
    }

    pub fn parse(v: Option<&Value>) -> Self {
        v.and_then(Value::as_str)
            .and_then(Self::from_str)
            .unwrap_or_default()
    }
}

/// 表格线样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridLines {
    All,
    None,
    Horizontal,
    Vertical,
}

impl Default for GridLines {
    fn default() -> Self {
        GridLines::All
    }
}

impl GridLines {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(GridLines::All),
            "none" => Some(GridLines::None),
            "horizontal" => Some(GridLines::Horizontal),
            "vertical" => Some(GridLines::Vertical),
            _ => None,
        }
    }

    /// 宽松解析：不合法的值收敛到 all
    pub fn parse(v: Option<&Value>) -> Self {
        v.and_then(Value::as_str)
            .and_then(Self::from_str)
            .unwrap_or_default()
    }
}

/// MCQ / FIB 的版式：图片布局 + 选项布局
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionListStyle {
    #[serde(default)]
    pub image_layout: Layout,
    #[serde(default)]
    pub options_layout: Layout,
}

impl OptionListStyle {
    /// 从任意 JSON 值解析，字段逐个独立取默认
    pub fn from_value(v: Option<&Value>) -> Self {
        let obj = v.and_then(Value::as_object);
        Self {
            image_layout: Layout::parse(obj.and_then(|o| o.get("image_layout"))),
            options_layout: Layout::parse(obj.and_then(|o| o.get("options_layout"))),
        }
    }
}

/// MATCH / SUBJECTIVE 的版式：只有图片布局
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseStyle {
    #[serde(default)]
    pub image_layout: Layout,
}

impl BaseStyle {
    pub fn from_value(v: Option<&Value>) -> Self {
        let obj = v.and_then(Value::as_object);
        Self {
            image_layout: Layout::parse(obj.and_then(|o| o.get("image_layout"))),
        }
    }
}

/// COMPOSITE 的版式：图片布局 + 子题布局
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompositeStyle {
    #[serde(default)]
    pub image_layout: Layout,
    #[serde(default)]
    pub sub_questions_layout: SubLayout,
}

impl CompositeStyle {
    pub fn from_value(v: Option<&Value>) -> Self {
        let obj = v.and_then(Value::as_object);
        Self {
            image_layout: Layout::parse(obj.and_then(|o| o.get("image_layout"))),
            sub_questions_layout: SubLayout::parse(obj.and_then(|o| o.get("sub_questions_layout"))),
        }
    }
}

/// TABLE 的版式
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableStyle {
    #[serde(default)]
    pub image_layout: Layout,
    #[serde(default)]
    pub table_grid_lines: GridLines,
    #[serde(default)]
    pub hide_header: bool,
    /// 列宽（像素），不是数组时整个字段丢弃
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<u32>>,
}

impl TableStyle {
    pub fn from_value(v: Option<&Value>) -> Self {
        let obj = v.and_then(Value::as_object);
        Self {
            image_layout: Layout::parse(obj.and_then(|o| o.get("image_layout"))),
            table_grid_lines: GridLines::parse(obj.and_then(|o| o.get("table_grid_lines"))),
            hide_header: coerce_bool(obj.and_then(|o| o.get("hide_header"))),
            column_widths: obj
                .and_then(|o| o.get("column_widths"))
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(Value::as_u64)
                        .map(|n| n as u32)
                        .collect()
                }),
        }
    }
}

/// 把任意 JSON 值收敛成布尔
fn coerce_bool(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
