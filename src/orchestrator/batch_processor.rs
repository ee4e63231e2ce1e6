//! 批量导入处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文件的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写报告文件头、建输出目录
//! 2. **批量扫描**：列出输入目录下所有 JSON / JSONL 文件
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将文件分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总所有文件的导入结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文件的细节，向下委托 workflow::ImportFlow
//! - **无业务逻辑**：只做调度和统计

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, warn};

use crate::config::Config;
use crate::models::loaders;
use crate::utils::logging;
use crate::workflow::{ImportCtx, ImportFlow, ImportStats};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        init_report_file(&config.report_file)?;
        fs::create_dir_all(&config.output_folder)?;

        logging::log_startup(config.max_concurrent_files);

        Ok(Self { config })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let files = loaders::scan_question_files(&self.config.input_folder).await?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待导入的 JSON 文件，程序结束");
            return Ok(());
        }

        let total_files = files.len();
        logging::log_files_found(total_files, self.config.max_concurrent_files);

        let (stats, files_ok, files_failed) = self.process_all_files(files).await?;

        logging::print_final_stats(&stats, files_ok, files_failed, &self.config.report_file);

        Ok(())
    }

    /// 分批处理所有文件
    async fn process_all_files(
        &self,
        files: Vec<PathBuf>,
    ) -> Result<(ImportStats, usize, usize)> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_files));
        let total_files = files.len();
        let batch_size = self.config.max_concurrent_files;

        let mut total_stats = ImportStats::default();
        let mut files_ok = 0;
        let mut files_failed = 0;

        for batch_start in (0..total_files).step_by(batch_size) {
            let batch_end = (batch_start + batch_size).min(total_files);
            let batch_files = &files[batch_start..batch_end];
            let batch_num = batch_start / batch_size + 1;
            let total_batches = (total_files + batch_size - 1) / batch_size;

            logging::log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_end,
                total_files,
            );

            let mut batch_handles = Vec::new();

            for (idx, path) in batch_files.iter().enumerate() {
                let file_index = batch_start + idx + 1;
                let permit = semaphore.clone().acquire_owned().await?;

                let file_name = path
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                let ctx = ImportCtx::new(file_name, file_index);
                let flow = ImportFlow::new(&self.config);
                let path = path.clone();

                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    flow.run(&path, &ctx).await
                });
                batch_handles.push((file_index, handle));
            }

            // 等待本批所有任务完成
            let mut batch_ok = 0;
            for (file_index, handle) in batch_handles {
                match handle.await {
                    Ok(Ok(stats)) => {
                        total_stats.merge(&stats);
                        files_ok += 1;
                        batch_ok += 1;
                    }
                    Ok(Err(e)) => {
                        error!("[文件#{}] ❌ 处理过程中发生错误: {}", file_index, e);
                        files_failed += 1;
                    }
                    Err(e) => {
                        error!("[文件#{}] 任务执行失败: {}", file_index, e);
                        files_failed += 1;
                    }
                }
            }

            logging::log_batch_complete(batch_num, batch_ok, batch_end - batch_start);
        }

        Ok((total_stats, files_ok, files_failed))
    }
}

/// 初始化报告文件，写入带时间戳的文件头
fn init_report_file(report_file_path: &str) -> Result<()> {
    let header = format!(
        "{}\n题目导入报告 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(report_file_path, header)?;
    Ok(())
}
