use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuizAttemptRepository, MongoQuizRepository, QuizAttemptRepository, QuizRepository,
    },
    services::quiz_attempt_service::QuizAttemptService,
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub config: Arc<Config>,
    pub database: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let mut state = Self::with_repositories(config, quiz_repository, attempt_repository);
        state.database = Some(db);
        Ok(state)
    }

    /// Builds the state over arbitrary repositories, without a database handle.
    pub fn with_repositories(
        config: Config,
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        let quiz_attempt_service = Arc::new(QuizAttemptService::new(
            quiz_repository,
            attempt_repository,
        ));

        Self {
            quiz_attempt_service,
            config: Arc::new(config),
            database: None,
        }
    }
}
