pub mod answer;
pub mod answer_type;
pub mod question;
pub mod question_set;
