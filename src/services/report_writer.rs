//! 导入报告写入服务 - 业务能力层
//!
//! 只负责"把问题记录追加进报告文件"能力，不关心流程

use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 导入报告写入服务
///
/// 职责：
/// - 记录被丢弃的坏片段
/// - 记录校验不通过的题目及错误列表
/// - 只做追加写入，不做汇总
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    /// 使用指定报告文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    /// 记录某个文件里被丢弃的坏片段数量
    pub fn write_discarded(&self, file_name: &str, discarded: usize) -> AppResult<()> {
        debug!("写入报告: 文件 {} | 丢弃 {} 个片段", file_name, discarded);
        self.append(&format!(
            "文件 {} | 丢弃 {} 个无法解析的片段\n",
            file_name, discarded
        ))
    }

    /// 记录一道校验不通过的题目
    pub fn write_invalid(
        &self,
        file_name: &str,
        question_id: &str,
        errors: &[String],
    ) -> AppResult<()> {
        debug!(
            "写入报告: 文件 {} | 题目 {} | {} 条错误",
            file_name,
            question_id,
            errors.len()
        );
        self.append(&format!(
            "文件 {} | 题目 {} | 校验失败: {}\n",
            file_name,
            question_id,
            errors.join("; ")
        ))
    }

    fn append(&self, line: &str) -> AppResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)
            .map_err(|e| AppError::file_write_failed(&self.report_file_path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| AppError::file_write_failed(&self.report_file_path, e))?;
        Ok(())
    }
}
