pub mod answer;
pub mod question;

pub use answer::{Answer, AskResponse};
pub use question::{Question, QuestionError};
