//! 富文本内嵌标记
//!
//! 富文本是普通字符串，可以混排 Markdown / LaTeX 和两种内嵌标记：
//!
//! - 图片标记：`[[image:<id>]]` 或 `[[image:<id>|height:<H>|width:<W>]]`
//! - 填空标记：`[[gap]]` 或 `[[gap|width:<N>]]`
//!
//! 旧数据里还有一种隐式填空：连续两个及以上的下划线。只在整段文本
//! 不含任何显式填空标记时才把下划线串转成填空标记（互斥规则）。
//! 提取和替换都是字符串级的正则匹配，不建语法树。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// 无宽度填空标记的默认渲染宽度（像素）
pub const DEFAULT_GAP_WIDTH: u32 = 96;

/// 下划线转填空时每个下划线折算的像素宽度
pub const PX_PER_UNDERSCORE: u32 = 12;

static IMAGE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[image:([^\]|]+)(?:\|height:(\d+)\|width:(\d+))?\]\]").unwrap()
});

static GAP_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[gap(?:\|width:(\d+))?\]\]").unwrap());

static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// 图片标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageToken {
    /// 外部图片库的键，自由格式字符串
    pub id: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

impl ImageToken {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            height: None,
            width: None,
        }
    }

    /// 还原成标记文本
    pub fn to_token_string(&self) -> String {
        match (self.height, self.width) {
            (Some(h), Some(w)) => format!("[[image:{}|height:{}|width:{}]]", self.id, h, w),
            _ => format!("[[image:{}]]", self.id),
        }
    }
}

/// 填空标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapToken {
    pub width: Option<u32>,
}

impl GapToken {
    /// 渲染宽度，未指定时取默认值
    pub fn render_width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_GAP_WIDTH)
    }
}

/// 提取一段文本中全部不重叠的图片标记，按出现顺序
pub fn extract_image_tokens(text: &str) -> Vec<ImageToken> {
    IMAGE_TOKEN_RE
        .captures_iter(text)
        .map(|caps| ImageToken {
            id: caps[1].to_string(),
            height: positive_dim(caps.get(2).map(|m| m.as_str())),
            width: positive_dim(caps.get(3).map(|m| m.as_str())),
        })
        .collect()
}

/// 提取一段文本中引用的全部图片 id，按出现顺序（可能重复）
pub fn extract_image_ids(text: &str) -> Vec<String> {
    IMAGE_TOKEN_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// 提取一段文本中全部填空标记
pub fn extract_gap_tokens(text: &str) -> Vec<GapToken> {
    GAP_TOKEN_RE
        .captures_iter(text)
        .map(|caps| GapToken {
            width: positive_dim(caps.get(1).map(|m| m.as_str())),
        })
        .collect()
}

/// 文本中是否存在显式填空标记
pub fn has_gap_token(text: &str) -> bool {
    GAP_TOKEN_RE.is_match(text)
}

/// 逐个替换图片标记
///
/// 回调返回 `None` 表示保留原始标记文本不动（发布模式的语义），
/// 返回 `Some` 则替换为给定字符串
pub fn replace_image_tokens<F>(text: &str, replace: &mut F) -> String
where
    F: FnMut(&ImageToken) -> Option<String>,
{
    IMAGE_TOKEN_RE
        .replace_all(text, |caps: &Captures| {
            let token = ImageToken {
                id: caps[1].to_string(),
                height: positive_dim(caps.get(2).map(|m| m.as_str())),
                width: positive_dim(caps.get(3).map(|m| m.as_str())),
            };
            match replace(&token) {
                Some(replacement) => replacement,
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// 把旧式下划线空格转成显式填空标记
///
/// 互斥规则：只要文本里已有任何显式填空标记，下划线串一律保留为
/// 字面文本，不做转换
pub fn convert_legacy_blanks(text: &str) -> String {
    if has_gap_token(text) {
        return text.to_string();
    }

    BLANK_RUN_RE
        .replace_all(text, |caps: &Captures| {
            let run_len = caps[0].len() as u32;
            format!("[[gap|width:{}]]", run_len * PX_PER_UNDERSCORE)
        })
        .into_owned()
}

/// 正整数尺寸解析，0 和非法值视为未指定
fn positive_dim(s: Option<&str>) -> Option<u32> {
    s.and_then(|s| s.parse::<u32>().ok()).filter(|n| *n > 0)
}
