//! 图片解析服务 - 业务能力层
//!
//! 把题目富文本里的图片标记替换成可渲染的 Markdown 图片引用。
//! 图片字节的获取与存储完全由调用方的解析回调负责，本服务只做
//! 字符串替换。两种模式都先对输入题目做深拷贝，调用方原件绝不
//! 会被改写到一半。
//!
//! 两种模式的差异是刻意设计：
//! - 预览：解析不到的 id 换成带 id 的缺失占位符，坏引用可见可查
//! - 发布：解析不到的 id 原样保留标记文本，发布后残留的标记
//!   就是漏网引用的清单

use crate::models::question::Question;
use crate::richtext::tokens;
use crate::richtext::traversal;

/// 预览模式：解析失败替换成可见的缺失占位符
pub fn resolve_for_preview<R>(question: &Question, resolver: R) -> Question
where
    R: Fn(&str) -> Option<String>,
{
    let mut copy = question.clone();
    traversal::rewrite_texts(&mut copy, &mut |text, _path| {
        let converted = tokens::convert_legacy_blanks(text);
        let resolved = tokens::replace_image_tokens(&converted, &mut |token| {
            Some(match resolver(&token.id) {
                Some(locator) => markdown_image(&token.id, &locator),
                None => format!("[缺失图片: {}]", token.id),
            })
        });
        if resolved != text {
            Some(resolved)
        } else {
            None
        }
    });
    copy
}

/// 发布模式：解析失败保留原始标记
pub fn resolve_for_publish<R>(question: &Question, resolver: R) -> Question
where
    R: Fn(&str) -> Option<String>,
{
    let mut copy = question.clone();
    traversal::rewrite_texts(&mut copy, &mut |text, _path| {
        let converted = tokens::convert_legacy_blanks(text);
        let resolved = tokens::replace_image_tokens(&converted, &mut |token| {
            resolver(&token.id).map(|locator| markdown_image(&token.id, &locator))
        });
        if resolved != text {
            Some(resolved)
        } else {
            None
        }
    });
    copy
}

fn markdown_image(id: &str, locator: &str) -> String {
    format!("![{}]({})", id, locator)
}
