//! 从 JSON / JSONL 文件加载题目批次

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{AppError, AppResult, FileError, ParseError};
use crate::services::bulk_parser::{self, BatchOutcome};

/// 从单个文件加载数据并解析为题目批次
pub async fn load_question_file(file_path: &Path) -> AppResult<BatchOutcome> {
    if !file_path.exists() {
        return Err(AppError::File(FileError::NotFound {
            path: file_path.display().to_string(),
        }));
    }

    let content = fs::read_to_string(file_path)
        .await
        .map_err(|e| AppError::file_read_failed(file_path.display().to_string(), e))?;

    if content.trim().is_empty() {
        return Err(AppError::Parse(ParseError::EmptyInput));
    }

    Ok(bulk_parser::parse_batch(&content))
}

/// 扫描文件夹，列出所有待导入的 JSON / JSONL 文件
pub async fn scan_question_files(folder_path: &str) -> AppResult<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }));
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        let matched = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext == "json" || ext == "jsonl")
            .unwrap_or(false);
        if matched {
            files.push(path);
        }
    }

    // 固定处理顺序，方便对照日志
    files.sort();

    Ok(files)
}
