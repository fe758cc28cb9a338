#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizplay_server::{
    errors::{AppError, AppResult},
    models::domain::{AttemptAnswer, Quiz, QuizAttempt, QuizQuestion},
    repositories::{QuizAttemptRepository, QuizRepository},
    services::QuizAttemptService,
};

pub const USER_ID: &str = "user-1";
pub const OTHER_USER_ID: &str = "user-2";

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<String, Quiz>>,
    questions: RwLock<Vec<QuizQuestion>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_quiz(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id.clone(), quiz);
    }

    pub async fn insert_questions(&self, questions: Vec<QuizQuestion>) {
        self.questions.write().await.extend(questions);
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn list_published(&self) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes.values().filter(|q| q.published).cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn count_questions(&self, quiz_id: &str) -> AppResult<i64> {
        let questions = self.questions.read().await;
        Ok(questions.iter().filter(|q| q.quiz_id == quiz_id).count() as i64)
    }

    async fn list_questions(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>> {
        let questions = self.questions.read().await;
        let mut items: Vec<_> = questions
            .iter()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by_key(|q| q.position);
        Ok(items)
    }

    async fn find_question(&self, question_id: &str) -> AppResult<Option<QuizQuestion>> {
        let questions = self.questions.read().await;
        Ok(questions.iter().find(|q| q.id == question_id).cloned())
    }
}

/// Attempts keep a save sequence so "newest" is deterministic even when
/// two saves land on the same timestamp.
#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: RwLock<HashMap<String, (QuizAttempt, u64)>>,
    answers: RwLock<Vec<AttemptAnswer>>,
    sequence: AtomicU64,
}

impl InMemoryQuizAttemptRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn attempt_count(&self) -> usize {
        self.attempts.read().await.len()
    }

    async fn sorted_for_user(&self, user_id: &str) -> Vec<QuizAttempt> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .values()
            .filter(|(a, _)| a.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|(a, seq_a), (b, seq_b)| {
            b.updated_at.cmp(&a.updated_at).then(seq_b.cmp(seq_a))
        });
        items.into_iter().map(|(a, _)| a).collect()
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        Ok(self.attempts.read().await.get(id).map(|(a, _)| a.clone()))
    }

    async fn find_newest(&self, user_id: &str, quiz_id: &str) -> AppResult<Option<QuizAttempt>> {
        Ok(self
            .sorted_for_user(user_id)
            .await
            .into_iter()
            .find(|a| a.quiz_id == quiz_id))
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>> {
        Ok(self.sorted_for_user(user_id).await)
    }

    async fn exists_for_user_and_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<bool> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .any(|(a, _)| a.user_id == user_id && a.quiz_id == quiz_id))
    }

    async fn count_finished(&self, user_id: &str) -> AppResult<i64> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .filter(|(a, _)| a.user_id == user_id && a.finished)
            .count() as i64)
    }

    async fn save(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.attempts
            .write()
            .await
            .insert(attempt.id.clone(), (attempt.clone(), seq));
        Ok(attempt)
    }

    async fn find_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
    ) -> AppResult<Option<AttemptAnswer>> {
        let answers = self.answers.read().await;
        Ok(answers
            .iter()
            .find(|a| a.attempt_id == attempt_id && a.question_id == question_id)
            .cloned())
    }

    async fn list_answers(&self, attempt_id: &str) -> AppResult<Vec<AttemptAnswer>> {
        let answers = self.answers.read().await;
        Ok(answers
            .iter()
            .filter(|a| a.attempt_id == attempt_id)
            .cloned()
            .collect())
    }

    async fn count_answers(&self, attempt_id: &str) -> AppResult<i64> {
        let answers = self.answers.read().await;
        Ok(answers.iter().filter(|a| a.attempt_id == attempt_id).count() as i64)
    }

    async fn count_correct_answers(&self, attempt_id: &str) -> AppResult<i64> {
        let answers = self.answers.read().await;
        Ok(answers
            .iter()
            .filter(|a| a.attempt_id == attempt_id && a.correct)
            .count() as i64)
    }

    async fn delete_answers(&self, attempt_id: &str) -> AppResult<u64> {
        let mut answers = self.answers.write().await;
        let before = answers.len();
        answers.retain(|a| a.attempt_id != attempt_id);
        Ok((before - answers.len()) as u64)
    }

    async fn save_answer(&self, answer: AttemptAnswer) -> AppResult<AttemptAnswer> {
        let mut answers = self.answers.write().await;
        if answers
            .iter()
            .any(|a| a.attempt_id == answer.attempt_id && a.question_id == answer.question_id)
        {
            return Err(AppError::AlreadyExists(format!(
                "Answer for question '{}' in attempt '{}' already exists",
                answer.question_id, answer.attempt_id
            )));
        }
        answers.push(answer.clone());
        Ok(answer)
    }
}

pub struct TestContext {
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub attempts: Arc<InMemoryQuizAttemptRepository>,
    pub service: QuizAttemptService,
}

impl TestContext {
    pub fn new() -> Self {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let attempts = Arc::new(InMemoryQuizAttemptRepository::new());
        let service = QuizAttemptService::new(quizzes.clone(), attempts.clone());
        Self {
            quizzes,
            attempts,
            service,
        }
    }

    /// Seeds a quiz with one question per entry of `correct_indices`.
    pub async fn seed_quiz(
        &self,
        id: &str,
        title: &str,
        published: bool,
        correct_indices: &[i32],
    ) -> (Quiz, Vec<QuizQuestion>) {
        let mut quiz = Quiz::new(title, published);
        quiz.id = id.to_string();
        let questions = make_questions(id, correct_indices);

        self.quizzes.insert_quiz(quiz.clone()).await;
        self.quizzes.insert_questions(questions.clone()).await;
        (quiz, questions)
    }
}

pub fn make_questions(quiz_id: &str, correct_indices: &[i32]) -> Vec<QuizQuestion> {
    correct_indices
        .iter()
        .enumerate()
        .map(|(position, correct_index)| {
            QuizQuestion::new(
                quiz_id,
                position as i32,
                &format!("{} question {}", quiz_id, position + 1),
                ["alpha", "beta", "gamma", "delta"],
                *correct_index,
                &format!("Because option {} is right", correct_index),
            )
        })
        .collect()
}
