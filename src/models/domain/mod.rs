pub mod attempt_answer;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub use attempt_answer::AttemptAnswer;
pub use quiz::Quiz;
pub use quiz_attempt::QuizAttempt;
pub use quiz_question::QuizQuestion;
