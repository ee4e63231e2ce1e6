//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<文件>)
//!     ↓
//! workflow::ImportFlow (处理单个文件)
//!     ↓
//! services (能力层：parse / normalize / validate / report)
//!     ↓
//! models + richtext (数据模型与富文本标记)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，ImportFlow 管单个文件
//! 2. **向下依赖**：编排层 → workflow → services → models
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;

pub use batch_processor::App;
