pub mod loaders;
pub mod metadata;
pub mod question;
pub mod style;

pub use loaders::{load_question_file, scan_question_files};
pub use metadata::{Difficulty, Grade, Metadata, Pool, Section, Subject, Subpool};
pub use question::{
    CompositeData, ExpectedLength, FibData, MatchData, MatchPair, McqData, McqOption, Question,
    QuestionData, QuestionType, Solution, SubQuestion, SubjectiveData, TableData, TableGrid,
};
pub use style::{BaseStyle, CompositeStyle, GridLines, Layout, OptionListStyle, SubLayout, TableStyle};
