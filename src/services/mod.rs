pub mod attempt_views;
pub mod quiz_attempt_service;

pub use quiz_attempt_service::QuizAttemptService;
