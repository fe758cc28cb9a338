use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{Database, QUESTIONS_COLLECTION, QUIZZES_COLLECTION},
    errors::AppResult,
    models::domain::{Quiz, QuizQuestion},
};

/// Read side of the quiz catalog. Quiz content does not change while it is being played.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    /// Published quizzes, newest first.
    async fn list_published(&self) -> AppResult<Vec<Quiz>>;
    async fn count_questions(&self, quiz_id: &str) -> AppResult<i64>;
    /// Questions of a quiz ordered by position.
    async fn list_questions(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>>;
    async fn find_question(&self, question_id: &str) -> AppResult<Option<QuizQuestion>>;
}

pub struct MongoQuizRepository {
    quizzes: Collection<Quiz>,
    questions: Collection<QuizQuestion>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            quizzes: db.get_collection(QUIZZES_COLLECTION),
            questions: db.get_collection(QUESTIONS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes and quiz_questions collections");

        let quiz_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let published_index = IndexModel::builder()
            .keys(doc! { "published": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("published_created_at".to_string())
                    .build(),
            )
            .build();

        let question_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let question_position_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "position": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("quiz_position_unique".to_string())
                    .build(),
            )
            .build();

        self.quizzes.create_index(quiz_id_index).await?;
        self.quizzes.create_index(published_index).await?;
        self.questions.create_index(question_id_index).await?;
        self.questions.create_index(question_position_index).await?;

        log::info!("Successfully created indexes for quiz catalog");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.quizzes.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn list_published(&self) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .quizzes
            .find(doc! { "published": true })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn count_questions(&self, quiz_id: &str) -> AppResult<i64> {
        let count = self
            .questions
            .count_documents(doc! { "quiz_id": quiz_id })
            .await?;
        Ok(count as i64)
    }

    async fn list_questions(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>> {
        let questions = self
            .questions
            .find(doc! { "quiz_id": quiz_id })
            .sort(doc! { "position": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn find_question(&self, question_id: &str) -> AppResult<Option<QuizQuestion>> {
        let question = self.questions.find_one(doc! { "id": question_id }).await?;
        Ok(question)
    }
}
