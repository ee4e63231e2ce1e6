/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的文件数量
    pub max_concurrent_files: usize,
    /// 待导入 JSON 文件存放目录
    pub input_folder: String,
    /// 规范化结果输出目录
    pub output_folder: String,
    /// 导入报告文件
    pub report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出 JSON 是否带缩进
    pub pretty_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_files: 8,
            input_folder: "input_questions".to_string(),
            output_folder: "normalized_output".to_string(),
            report_file: "import_report.txt".to_string(),
            verbose_logging: false,
            pretty_output: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_files: std::env::var("MAX_CONCURRENT_FILES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_files),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            report_file: std::env::var("REPORT_FILE").unwrap_or(default.report_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            pretty_output: std::env::var("PRETTY_OUTPUT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.pretty_output),
        }
    }
}
