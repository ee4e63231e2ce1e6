//! 富文本遍历引擎
//!
//! 一个通用的递归遍历器，按固定顺序访问题目里所有携带富文本的字段，
//! 供标签提取（只读）和文本改写（就地）两类消费者复用。访问顺序和
//! 路径字符串是对外承诺的一部分，下游靠路径定位标签冲突，不能改动：
//!
//! 1. `data.content`
//! 2. `data.common_content`
//! 3. `data.options[i].text`
//! 4. `data.options_pool[i]`
//! 5. `data.pairs[i].left` / `data.pairs[i].right`
//! 6. `data.table.header[i]`，然后 `data.table.rows[i][j]` 行优先
//! 7. `data.sub_questions[i]`：深度优先递归，子题路径带
//!    `data.sub_questions[i].` 前缀
//! 8. `solution.text`：只在顶层访问（子题没有自己的 solution）
//!
//! 按 visit / visit_mut 惯例分成只读和可变两套遍历。

use std::collections::HashSet;

use crate::models::question::{Question, QuestionData};
use crate::richtext::tokens;

/// 只读遍历：对每个富文本字段调用 `visit(text, path)`
pub fn for_each_text<F>(question: &Question, visit: &mut F)
where
    F: FnMut(&str, &str),
{
    visit_data(&question.body, "data", visit);
    visit(&question.solution.text, "solution.text");
}

/// 就地改写遍历：回调返回 `Some(new)` 时替换该字段，`None` 保持不变
pub fn rewrite_texts<F>(question: &mut Question, visit: &mut F)
where
    F: FnMut(&str, &str) -> Option<String>,
{
    rewrite_data(&mut question.body, "data", visit);
    apply(&mut question.solution.text, "solution.text", visit);
}

/// 收集题目中引用的全部图片 id（去重，无序）
pub fn extract_image_ids(question: &Question) -> HashSet<String> {
    let mut ids = HashSet::new();
    for_each_text(question, &mut |text, _path| {
        ids.extend(tokens::extract_image_ids(text));
    });
    ids
}

fn visit_data<F>(data: &QuestionData, prefix: &str, visit: &mut F)
where
    F: FnMut(&str, &str),
{
    match data {
        QuestionData::Mcq(d) => {
            visit(&d.content, &format!("{}.content", prefix));
            for (i, option) in d.options.iter().enumerate() {
                visit(&option.text, &format!("{}.options[{}].text", prefix, i));
            }
        }
        QuestionData::Fib(d) => {
            visit(&d.content, &format!("{}.content", prefix));
            for (i, pooled) in d.options_pool.iter().enumerate() {
                visit(pooled, &format!("{}.options_pool[{}]", prefix, i));
            }
        }
        QuestionData::Match(d) => {
            visit(&d.content, &format!("{}.content", prefix));
            for (i, pair) in d.pairs.iter().enumerate() {
                visit(&pair.left, &format!("{}.pairs[{}].left", prefix, i));
                visit(&pair.right, &format!("{}.pairs[{}].right", prefix, i));
            }
        }
        QuestionData::Subjective(d) => {
            visit(&d.content, &format!("{}.content", prefix));
        }
        QuestionData::Table(d) => {
            visit(&d.content, &format!("{}.content", prefix));
            for (i, cell) in d.table.header.iter().enumerate() {
                visit(cell, &format!("{}.table.header[{}]", prefix, i));
            }
            for (i, row) in d.table.rows.iter().enumerate() {
                for (j, cell) in row.iter().enumerate() {
                    visit(cell, &format!("{}.table.rows[{}][{}]", prefix, i, j));
                }
            }
        }
        QuestionData::Composite(d) => {
            visit(&d.common_content, &format!("{}.common_content", prefix));
            for (i, sub) in d.sub_questions.iter().enumerate() {
                let sub_prefix = format!("{}.sub_questions[{}].data", prefix, i);
                visit_data(&sub.body, &sub_prefix, visit);
            }
        }
    }
}

fn rewrite_data<F>(data: &mut QuestionData, prefix: &str, visit: &mut F)
where
    F: FnMut(&str, &str) -> Option<String>,
{
    match data {
        QuestionData::Mcq(d) => {
            apply(&mut d.content, &format!("{}.content", prefix), visit);
            for (i, option) in d.options.iter_mut().enumerate() {
                apply(
                    &mut option.text,
                    &format!("{}.options[{}].text", prefix, i),
                    visit,
                );
            }
        }
        QuestionData::Fib(d) => {
            apply(&mut d.content, &format!("{}.content", prefix), visit);
            for (i, pooled) in d.options_pool.iter_mut().enumerate() {
                apply(pooled, &format!("{}.options_pool[{}]", prefix, i), visit);
            }
        }
        QuestionData::Match(d) => {
            apply(&mut d.content, &format!("{}.content", prefix), visit);
            for (i, pair) in d.pairs.iter_mut().enumerate() {
                apply(&mut pair.left, &format!("{}.pairs[{}].left", prefix, i), visit);
                apply(
                    &mut pair.right,
                    &format!("{}.pairs[{}].right", prefix, i),
                    visit,
                );
            }
        }
        QuestionData::Subjective(d) => {
            apply(&mut d.content, &format!("{}.content", prefix), visit);
        }
        QuestionData::Table(d) => {
            apply(&mut d.content, &format!("{}.content", prefix), visit);
            for (i, cell) in d.table.header.iter_mut().enumerate() {
                apply(cell, &format!("{}.table.header[{}]", prefix, i), visit);
            }
            for (i, row) in d.table.rows.iter_mut().enumerate() {
                for (j, cell) in row.iter_mut().enumerate() {
                    apply(cell, &format!("{}.table.rows[{}][{}]", prefix, i, j), visit);
                }
            }
        }
        QuestionData::Composite(d) => {
            apply(
                &mut d.common_content,
                &format!("{}.common_content", prefix),
                visit,
            );
            for (i, sub) in d.sub_questions.iter_mut().enumerate() {
                let sub_prefix = format!("{}.sub_questions[{}].data", prefix, i);
                rewrite_data(&mut sub.body, &sub_prefix, visit);
            }
        }
    }
}

fn apply<F>(field: &mut String, path: &str, visit: &mut F)
where
    F: FnMut(&str, &str) -> Option<String>,
{
    if let Some(new_text) = visit(field, path) {
        *field = new_text;
    }
}
