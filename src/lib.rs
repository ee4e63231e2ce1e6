//! # Question Import Normalize
//!
//! 把多个历史世代的题目 JSON 规范化成统一模式的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 数据层（Models + RichText）
//! - `models/` - 规范题目模型：`type` 标签决定 `data` 变体，style 强制存在
//! - `richtext/` - 富文本内嵌标记（图片 / 填空）与通用递归遍历器
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个批次 / 单个题目
//! - `bulk_parser` - 数组 / 单对象 / 拼接对象流的切分能力
//! - `normalizer` - 多世代模式检测与宽松转换能力
//! - `validator` - 规范文档结构校验能力
//! - `renderer` - 图片标记解析（预览 / 发布两种语义）
//! - `report_writer` - 写导入报告能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整导入流程
//! - `ImportCtx` - 上下文封装（文件名 + 文件索引）
//! - `ImportFlow` - 流程编排（parse → validate → 落盘 → report）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文件处理器，管理并发和统计

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod richtext;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Question, QuestionData, QuestionType};
pub use orchestrator::App;
pub use richtext::{extract_image_ids, for_each_text, rewrite_texts};
pub use services::{normalize, parse_batch, validate, validate_question};
pub use workflow::{ImportCtx, ImportFlow, ImportStats};
