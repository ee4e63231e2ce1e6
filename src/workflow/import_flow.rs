//! 文件导入流程 - 流程层
//!
//! 核心职责：定义"一个文件"的完整处理流程
//!
//! 流程顺序：
//! 1. 读取文件 → 批量解析（坏片段丢弃并记录）
//! 2. 逐题结构校验（失败写入报告，不阻断导入）
//! 3. 规范化结果写入输出目录

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::loaders;
use crate::services::{validator, ReportWriter};
use crate::workflow::import_ctx::ImportCtx;

/// 单个文件的导入统计
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportStats {
    /// 成功解析并规范化的题目数
    pub parsed: usize,
    /// 被丢弃的坏片段数
    pub discarded: usize,
    /// 校验通过的题目数
    pub valid: usize,
    /// 校验未通过的题目数
    pub invalid: usize,
}

impl ImportStats {
    /// 累加另一份统计
    pub fn merge(&mut self, other: &ImportStats) {
        self.parsed += other.parsed;
        self.discarded += other.discarded;
        self.valid += other.valid;
        self.invalid += other.invalid;
    }
}

/// 文件导入流程
///
/// - 编排单个文件的解析、校验和落盘
/// - 不持有文件列表，不关心批次
/// - 只依赖业务能力（services）
pub struct ImportFlow {
    report_writer: ReportWriter,
    output_folder: String,
    verbose_logging: bool,
    pretty_output: bool,
}

impl ImportFlow {
    /// 创建新的文件导入流程
    pub fn new(config: &Config) -> Self {
        Self {
            report_writer: ReportWriter::with_path(&config.report_file),
            output_folder: config.output_folder.clone(),
            verbose_logging: config.verbose_logging,
            pretty_output: config.pretty_output,
        }
    }

    pub async fn run(&self, path: &Path, ctx: &ImportCtx) -> Result<ImportStats> {
        info!("{} 开始导入", ctx);

        // ========== 流程 1: 解析 ==========
        let outcome = loaders::load_question_file(path).await?;

        let mut stats = ImportStats {
            parsed: outcome.questions.len(),
            discarded: outcome.discarded,
            ..Default::default()
        };

        info!(
            "{} ✓ 解析完成: 成功 {} 题，丢弃 {} 个片段",
            ctx, stats.parsed, stats.discarded
        );

        if outcome.discarded > 0 {
            warn!("{} ⚠️ 有 {} 个片段无法解析，已记入报告", ctx, outcome.discarded);
            self.report_writer
                .write_discarded(&ctx.file_name, outcome.discarded)?;
        }

        if outcome.questions.is_empty() {
            warn!("{} ⚠️ 文件中没有可导入的题目", ctx);
            return Ok(stats);
        }

        // ========== 流程 2: 逐题校验 ==========
        for question in &outcome.questions {
            let report = validator::validate_question(question);
            if report.valid {
                stats.valid += 1;
            } else {
                stats.invalid += 1;
                warn!(
                    "{} ⚠️ 题目 {} 校验未通过: {}",
                    ctx,
                    question.id,
                    report.errors.join("; ")
                );
                self.report_writer
                    .write_invalid(&ctx.file_name, &question.id, &report.errors)?;
            }
            if self.verbose_logging {
                info!("{} 题目 {} 题型 {}", ctx, question.id, question.question_type());
            }
        }

        // ========== 流程 3: 落盘 ==========
        self.write_output(path, ctx, &outcome.questions).await?;

        info!(
            "{} ✅ 导入完成: 校验通过 {}/{}",
            ctx, stats.valid, stats.parsed
        );

        Ok(stats)
    }

    /// 把规范化结果写入输出目录
    async fn write_output(
        &self,
        source_path: &Path,
        ctx: &ImportCtx,
        questions: &[crate::models::Question],
    ) -> Result<()> {
        let stem = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("questions");
        let out_path = Path::new(&self.output_folder).join(format!("{}.normalized.json", stem));

        let body = if self.pretty_output {
            serde_json::to_string_pretty(questions)?
        } else {
            serde_json::to_string(questions)?
        };

        fs::write(&out_path, body)
            .await
            .with_context(|| format!("无法写入输出文件: {}", out_path.display()))?;

        info!("{} 💾 已写出 {}", ctx, out_path.display());
        Ok(())
    }
}
