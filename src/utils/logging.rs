//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use tracing_subscriber::EnvFilter;

use crate::workflow::ImportStats;

/// 初始化日志订阅器
///
/// 默认 info 级别，可用 RUST_LOG 覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 最大并发数
pub fn log_startup(max_concurrent: usize) {
    tracing::info!("{}", "=".repeat(60));
    tracing::info!("🚀 程序启动 - 批量题目导入规范化模式");
    tracing::info!("📊 最大并发数: {}", max_concurrent);
    tracing::info!("{}", "=".repeat(60));
}

/// 记录文件扫描结果
///
/// # 参数
/// - `total`: 文件总数
/// - `max_concurrent`: 最大并发数
pub fn log_files_found(total: usize, max_concurrent: usize) {
    tracing::info!("✓ 找到 {} 个待导入的文件", total);
    tracing::info!("📋 将以每批 {} 个的方式处理", max_concurrent);
    tracing::info!("💡 每批完成后再开始下一批\n");
}

/// 记录批次开始信息
pub fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    tracing::info!("\n{}", "=".repeat(60));
    tracing::info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    tracing::info!("📄 本批文件: {}-{} / 共 {} 个", start, end, total);
    tracing::info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    tracing::info!("\n{}", "─".repeat(60));
    tracing::info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    tracing::info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 全部文件累计的导入统计
/// - `files_ok`: 成功处理的文件数
/// - `files_failed`: 处理失败的文件数
/// - `report_file`: 报告文件路径
pub fn print_final_stats(stats: &ImportStats, files_ok: usize, files_failed: usize, report_file: &str) {
    tracing::info!("\n{}", "=".repeat(60));
    tracing::info!("📊 全部导入完成统计");
    tracing::info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    tracing::info!("{}", "=".repeat(60));
    tracing::info!("✅ 文件: 成功 {} / 失败 {}", files_ok, files_failed);
    tracing::info!("📥 题目: 解析 {}，丢弃片段 {}", stats.parsed, stats.discarded);
    tracing::info!("🧪 校验: 通过 {}，未通过 {}", stats.valid, stats.invalid);
    tracing::info!("{}", "=".repeat(60));
    tracing::info!("\n报告已保存至: {}", report_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
