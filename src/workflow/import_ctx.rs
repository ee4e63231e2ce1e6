//! 导入上下文
//!
//! 封装"我正在处理第几个文件、它叫什么"这一信息

use std::fmt::Display;

/// 文件导入上下文
#[derive(Debug, Clone)]
pub struct ImportCtx {
    /// 文件名（仅最后一段，用于日志和报告）
    pub file_name: String,

    /// 文件索引（从 1 开始，仅用于日志显示）
    pub file_index: usize,
}

impl ImportCtx {
    /// 创建新的导入上下文
    pub fn new(file_name: String, file_index: usize) -> Self {
        Self {
            file_name,
            file_index,
        }
    }
}

impl Display for ImportCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文件#{} {}]", self.file_index, self.file_name)
    }
}
