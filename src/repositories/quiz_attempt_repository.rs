use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::{Database, ANSWERS_COLLECTION, ATTEMPTS_COLLECTION},
    errors::AppResult,
    models::domain::{AttemptAnswer, QuizAttempt},
};

/// Persistence for attempts and their answers.
///
/// `save_answer` must reject a second answer for the same
/// `(attempt_id, question_id)` with `AppError::AlreadyExists`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;
    /// Most recently updated attempt of the user on the quiz, finished or not.
    async fn find_newest(&self, user_id: &str, quiz_id: &str) -> AppResult<Option<QuizAttempt>>;
    /// All attempts of the user, most recently updated first.
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>>;
    async fn exists_for_user_and_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<bool>;
    async fn count_finished(&self, user_id: &str) -> AppResult<i64>;
    /// Inserts or replaces the whole attempt document.
    async fn save(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;

    async fn find_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
    ) -> AppResult<Option<AttemptAnswer>>;
    async fn list_answers(&self, attempt_id: &str) -> AppResult<Vec<AttemptAnswer>>;
    async fn count_answers(&self, attempt_id: &str) -> AppResult<i64>;
    async fn count_correct_answers(&self, attempt_id: &str) -> AppResult<i64>;
    async fn delete_answers(&self, attempt_id: &str) -> AppResult<u64>;
    async fn save_answer(&self, answer: AttemptAnswer) -> AppResult<AttemptAnswer>;
}

pub struct MongoQuizAttemptRepository {
    attempts: Collection<QuizAttempt>,
    answers: Collection<AttemptAnswer>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            attempts: db.get_collection(ATTEMPTS_COLLECTION),
            answers: db.get_collection(ANSWERS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts and attempt_answers collections");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_quiz_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1, "updated_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_quiz_updated".to_string())
                    .build(),
            )
            .build();

        let user_updated_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "updated_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_updated".to_string())
                    .build(),
            )
            .build();

        let answer_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // One answer per question per attempt; concurrent duplicates fail here.
        let attempt_question_index = IndexModel::builder()
            .keys(doc! { "attempt_id": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("attempt_question_unique".to_string())
                    .build(),
            )
            .build();

        self.attempts.create_index(id_index).await?;
        self.attempts.create_index(user_quiz_index).await?;
        self.attempts.create_index(user_updated_index).await?;
        self.answers.create_index(answer_id_index).await?;
        self.answers.create_index(attempt_question_index).await?;

        log::info!("Successfully created indexes for attempt store");
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self.attempts.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn find_newest(&self, user_id: &str, quiz_id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self
            .attempts
            .find_one(doc! { "user_id": user_id, "quiz_id": quiz_id })
            .sort(doc! { "updated_at": -1 })
            .await?;
        Ok(attempt)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .attempts
            .find(doc! { "user_id": user_id })
            .sort(doc! { "updated_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn exists_for_user_and_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<bool> {
        let attempt = self
            .attempts
            .find_one(doc! { "user_id": user_id, "quiz_id": quiz_id })
            .await?;
        Ok(attempt.is_some())
    }

    async fn count_finished(&self, user_id: &str) -> AppResult<i64> {
        let count = self
            .attempts
            .count_documents(doc! { "user_id": user_id, "finished": true })
            .await?;
        Ok(count as i64)
    }

    async fn save(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.attempts
            .replace_one(doc! { "id": &attempt.id }, &attempt)
            .with_options(options)
            .await?;
        Ok(attempt)
    }

    async fn find_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
    ) -> AppResult<Option<AttemptAnswer>> {
        let answer = self
            .answers
            .find_one(doc! { "attempt_id": attempt_id, "question_id": question_id })
            .await?;
        Ok(answer)
    }

    async fn list_answers(&self, attempt_id: &str) -> AppResult<Vec<AttemptAnswer>> {
        let answers = self
            .answers
            .find(doc! { "attempt_id": attempt_id })
            .await?
            .try_collect()
            .await?;
        Ok(answers)
    }

    async fn count_answers(&self, attempt_id: &str) -> AppResult<i64> {
        let count = self
            .answers
            .count_documents(doc! { "attempt_id": attempt_id })
            .await?;
        Ok(count as i64)
    }

    async fn count_correct_answers(&self, attempt_id: &str) -> AppResult<i64> {
        let count = self
            .answers
            .count_documents(doc! { "attempt_id": attempt_id, "correct": true })
            .await?;
        Ok(count as i64)
    }

    async fn delete_answers(&self, attempt_id: &str) -> AppResult<u64> {
        let result = self
            .answers
            .delete_many(doc! { "attempt_id": attempt_id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn save_answer(&self, answer: AttemptAnswer) -> AppResult<AttemptAnswer> {
        // Duplicate key errors surface as AppError::AlreadyExists.
        self.answers.insert_one(&answer).await?;
        Ok(answer)
    }
}
