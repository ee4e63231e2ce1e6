//! 题目元数据模型
//!
//! 七个固定字段的枚举定义与宽松解析

use serde::{Deserialize, Serialize};

/// 题目元数据
///
/// 规范化之后每个字段都有确定取值，缺失字段在规范化阶段补默认值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub grade: Grade,
    pub subject: Subject,
    pub chapter: u32,
    pub section: Section,
    pub difficulty: Difficulty,
    pub marks: u32,
    pub pool: Pool,
    pub subpool: Subpool,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            grade: Grade::default(),
            subject: Subject::default(),
            chapter: 1,
            section: Section::default(),
            difficulty: Difficulty::default(),
            marks: 1,
            pool: Pool::default(),
            subpool: Subpool::default(),
        }
    }
}

/// 年级枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
}

impl Default for Grade {
    fn default() -> Self {
        Grade::Six
    }
}

impl Grade {
    /// 获取年级数字
    pub fn number(self) -> u32 {
        match self {
            Grade::One => 1,
            Grade::Two => 2,
            Grade::Three => 3,
            Grade::Four => 4,
            Grade::Five => 5,
            Grade::Six => 6,
            Grade::Seven => 7,
            Grade::Eight => 8,
            Grade::Nine => 9,
            Grade::Ten => 10,
        }
    }

    /// 从数字解析年级
    pub fn from_number(n: u64) -> Option<Self> {
        match n {
            1 => Some(Grade::One),
            2 => Some(Grade::Two),
            3 => Some(Grade::Three),
            4 => Some(Grade::Four),
            5 => Some(Grade::Five),
            6 => Some(Grade::Six),
            7 => Some(Grade::Seven),
            8 => Some(Grade::Eight),
            9 => Some(Grade::Nine),
            10 => Some(Grade::Ten),
            _ => None,
        }
    }

    /// 尝试从字符串解析年级（精确匹配数字标签）
    pub fn from_str(s: &str) -> Option<Self> {
        s.trim().parse::<u64>().ok().and_then(Self::from_number)
    }

    /// 智能查找年级（容忍 "Grade 6" / "class-6" 一类写法）
    pub fn find(s: &str) -> Option<Self> {
        if let Some(grade) = Self::from_str(s) {
            return Some(grade);
        }

        // 提取字符串里的第一段数字
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        digits.parse::<u64>().ok().and_then(Self::from_number)
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// 科目枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Maths,
    Science,
    English,
    Hindi,
    #[serde(rename = "Social Science")]
    SocialScience,
    Computer,
    #[serde(rename = "General Knowledge")]
    GeneralKnowledge,
}

impl Default for Subject {
    fn default() -> Self {
        Subject::Science
    }
}

impl Subject {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Maths => "Maths",
            Subject::Science => "Science",
            Subject::English => "English",
            Subject::Hindi => "Hindi",
            Subject::SocialScience => "Social Science",
            Subject::Computer => "Computer",
            Subject::GeneralKnowledge => "General Knowledge",
        }
    }

    /// 尝试从字符串解析科目（精确匹配，不区分大小写）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "maths" | "math" | "mathematics" => Some(Subject::Maths),
            "science" => Some(Subject::Science),
            "english" => Some(Subject::English),
            "hindi" => Some(Subject::Hindi),
            "social science" | "social_science" | "sst" => Some(Subject::SocialScience),
            "computer" | "computers" => Some(Subject::Computer),
            "general knowledge" | "general_knowledge" | "gk" => Some(Subject::GeneralKnowledge),
            _ => None,
        }
    }

    /// 智能查找科目（支持模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        // 先尝试精确匹配
        if let Some(subject) = Self::from_str(s) {
            return Some(subject);
        }

        // 模糊匹配
        let s_lower = s.to_lowercase();
        if s_lower.contains("math") {
            return Some(Subject::Maths);
        }
        if s_lower.contains("social") {
            return Some(Subject::SocialScience);
        }
        if s_lower.contains("science") {
            return Some(Subject::Science);
        }
        if s_lower.contains("english") {
            return Some(Subject::English);
        }
        if s_lower.contains("hindi") {
            return Some(Subject::Hindi);
        }
        if s_lower.contains("computer") {
            return Some(Subject::Computer);
        }
        if s_lower.contains("knowledge") {
            return Some(Subject::GeneralKnowledge);
        }

        None
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 小节字母枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Default for Section {
    fn default() -> Self {
        Section::A
    }
}

impl Section {
    pub fn letter(self) -> &'static str {
        match self {
            Section::A => "A",
            Section::B => "B",
            Section::C => "C",
            Section::D => "D",
            Section::E => "E",
            Section::F => "F",
        }
    }

    /// 尝试从字符串解析小节（不区分大小写的单字母）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(Section::A),
            "B" => Some(Section::B),
            "C" => Some(Section::C),
            "D" => Some(Section::D),
            "E" => Some(Section::E),
            "F" => Some(Section::F),
            _ => None,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// 难度枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl Difficulty {
    /// 尝试从字符串解析难度（不区分大小写，容忍常见同义词）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "simple" | "e" => Some(Difficulty::Easy),
            "medium" | "moderate" | "m" => Some(Difficulty::Medium),
            "hard" | "difficult" | "h" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        write!(f, "{}", name)
    }
}

/// 题池枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pool {
    Practice,
    Exam,
}

impl Default for Pool {
    fn default() -> Self {
        Pool::Practice
    }
}

impl Pool {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "practice" | "practise" => Some(Pool::Practice),
            "exam" | "test" => Some(Pool::Exam),
            _ => None,
        }
    }
}

impl std::fmt::Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pool::Practice => "Practice",
            Pool::Exam => "Exam",
        };
        write!(f, "{}", name)
    }
}

/// 子题池枚举
///
/// NA 仅在 pool = Practice 时合法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subpool {
    #[serde(rename = "NA")]
    Na,
    Written,
    Oral,
}

impl Default for Subpool {
    fn default() -> Self {
        Subpool::Na
    }
}

impl Subpool {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "na" | "n/a" | "none" => Some(Subpool::Na),
            "written" => Some(Subpool::Written),
            "oral" => Some(Subpool::Oral),
            _ => None,
        }
    }
}

impl std::fmt::Display for Subpool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Subpool::Na => "NA",
            Subpool::Written => "Written",
            Subpool::Oral => "Oral",
        };
        write!(f, "{}", name)
    }
}
