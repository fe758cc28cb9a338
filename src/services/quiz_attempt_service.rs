use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz::FALLBACK_QUIZ_TITLE,
            quiz_attempt::{is_finished, next_unanswered_position},
            quiz_question::question_at,
            AttemptAnswer, Quiz, QuizAttempt, QuizQuestion,
        },
        dto::response::{
            AnswerResultDto, AttemptMetaDto, AttemptOverviewDto, AttemptResultDto,
            AttemptStartedDto, CurrentQuestionDto, PlayerStatsDto, QuizListItemDto,
            ResumableQuizDto, ReviewQuestionDto,
        },
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::attempt_views::{self, AnswerCounts},
};

/// Owns every state transition of a quiz attempt and the read views over it.
///
/// Nothing is cached between calls; each operation reads the stores afresh.
pub struct QuizAttemptService {
    quiz_repository: Arc<dyn QuizRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
}

impl QuizAttemptService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            quiz_repository,
            attempt_repository,
        }
    }

    /// Resume the newest unfinished attempt, or create a fresh one.
    pub async fn start_or_resume(&self, user_id: &str, quiz_id: &str) -> AppResult<AttemptStartedDto> {
        let quiz = self.require_quiz(quiz_id).await?;
        if !quiz.published {
            return Err(AppError::NotPublished(format!(
                "Quiz '{}' is not published",
                quiz_id
            )));
        }

        if let Some(mut attempt) = self.attempt_repository.find_newest(user_id, quiz_id).await? {
            if !attempt.finished {
                let counts = self.load_counts(&mut attempt).await?;
                sync_cached_fields(&mut attempt, counts);
                attempt.touch();
                let attempt = self.attempt_repository.save(attempt).await?;

                if !attempt.finished {
                    log::info!(
                        "Resumed attempt {} of user {} on quiz {}",
                        attempt.id,
                        user_id,
                        quiz_id
                    );
                    return Ok(AttemptStartedDto {
                        attempt_id: attempt.id,
                        quiz_title: quiz.title,
                        total_questions: counts.total,
                        score: counts.correct,
                    });
                }

                log::debug!(
                    "Attempt {} was complete despite its cached flag; starting a new one",
                    attempt.id
                );
            }
        }

        let total = self.quiz_repository.count_questions(quiz_id).await?;
        let attempt = self
            .attempt_repository
            .save(QuizAttempt::new(user_id, quiz_id, total))
            .await?;

        log::info!(
            "Created attempt {} for user {} on quiz {} ({} questions)",
            attempt.id,
            user_id,
            quiz_id,
            total
        );

        Ok(AttemptStartedDto {
            attempt_id: attempt.id,
            quiz_title: quiz.title,
            total_questions: total,
            score: 0,
        })
    }

    /// Wipe the answers of the newest attempt and rewind it. Reuses the attempt row.
    pub async fn restart(&self, user_id: &str, quiz_id: &str) -> AppResult<AttemptStartedDto> {
        let quiz = self.require_quiz(quiz_id).await?;

        let Some(mut attempt) = self.attempt_repository.find_newest(user_id, quiz_id).await? else {
            return self.start_or_resume(user_id, quiz_id).await;
        };

        let removed = self.attempt_repository.delete_answers(&attempt.id).await?;
        attempt.reset();
        let total = self.ensure_total_questions(&mut attempt).await?;
        let attempt = self.attempt_repository.save(attempt).await?;

        log::info!(
            "Restarted attempt {} of user {} on quiz {} ({} answers removed)",
            attempt.id,
            user_id,
            quiz_id,
            removed
        );

        Ok(AttemptStartedDto {
            attempt_id: attempt.id,
            quiz_title: quiz.title,
            total_questions: total,
            score: 0,
        })
    }

    /// Record an answer once. Resubmitting a question replays the stored result.
    pub async fn answer(
        &self,
        user_id: &str,
        attempt_id: &str,
        question_id: &str,
        selected_index: i32,
    ) -> AppResult<AnswerResultDto> {
        let attempt = self.load_owned_attempt(user_id, attempt_id).await?;
        if attempt.finished {
            return Err(AppError::Conflict(format!(
                "Attempt '{}' is already completed",
                attempt_id
            )));
        }

        let question = self
            .quiz_repository
            .find_question(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question '{}' not found", question_id)))?;
        if question.quiz_id != attempt.quiz_id {
            return Err(AppError::NotFound(format!(
                "Question '{}' does not belong to quiz '{}'",
                question_id, attempt.quiz_id
            )));
        }

        if let Some(existing) = self
            .attempt_repository
            .find_answer(&attempt.id, &question.id)
            .await?
        {
            return self.replay_answer(attempt, &question, existing).await;
        }

        let answer = AttemptAnswer::evaluate(&attempt.id, &question, selected_index);
        let answer = match self.attempt_repository.save_answer(answer).await {
            Ok(answer) => answer,
            Err(AppError::AlreadyExists(_)) => {
                log::warn!(
                    "Concurrent answer for question {} in attempt {}; replaying stored result",
                    question.id,
                    attempt.id
                );
                let existing = self
                    .attempt_repository
                    .find_answer(&attempt.id, &question.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(format!(
                            "Answer for question '{}' rejected as duplicate but not found",
                            question.id
                        ))
                    })?;
                return self.replay_answer(attempt, &question, existing).await;
            }
            Err(err) => return Err(err),
        };

        self.advance(attempt, &question, answer.correct).await
    }

    pub async fn attempt_meta(&self, user_id: &str, attempt_id: &str) -> AppResult<AttemptMetaDto> {
        let mut attempt = self.load_owned_attempt(user_id, attempt_id).await?;
        let quiz = self.require_quiz(&attempt.quiz_id).await?;
        let counts = self.load_counts(&mut attempt).await?;

        Ok(attempt_views::meta(&attempt, &quiz.title, counts))
    }

    pub async fn attempt_overview(
        &self,
        user_id: &str,
        attempt_id: &str,
    ) -> AppResult<AttemptOverviewDto> {
        let attempt = self.load_owned_attempt(user_id, attempt_id).await?;
        let questions = self.require_questions(&attempt.quiz_id).await?;
        let answers = self.attempt_repository.list_answers(&attempt.id).await?;

        Ok(attempt_views::overview(&attempt.id, &questions, &answers))
    }

    /// The question at the stored cursor, or at `position` when given.
    /// An explicit position also moves the cursor.
    pub async fn current_question(
        &self,
        user_id: &str,
        attempt_id: &str,
        position: Option<i32>,
    ) -> AppResult<CurrentQuestionDto> {
        let mut attempt = self.load_owned_attempt(user_id, attempt_id).await?;
        let questions = self.require_questions(&attempt.quiz_id).await?;

        let question = match position {
            None => question_at(&questions, attempt.current_position)
                .or_else(|| questions.first())
                .ok_or_else(|| AppError::NotFound("Quiz has no questions".to_string()))?,
            Some(position) => {
                let question = question_at(&questions, position).ok_or_else(|| {
                    AppError::NotFound(format!("No question at position {}", position))
                })?;
                attempt.current_position = position;
                attempt.touch();
                attempt = self.attempt_repository.save(attempt).await?;
                question
            }
        };

        let answer = self
            .attempt_repository
            .find_answer(&attempt.id, &question.id)
            .await?;

        Ok(attempt_views::current_question(question, answer.as_ref()))
    }

    pub async fn attempt_result(&self, user_id: &str, attempt_id: &str) -> AppResult<AttemptResultDto> {
        let mut attempt = self.load_owned_attempt(user_id, attempt_id).await?;
        let title = self.quiz_title(&attempt.quiz_id).await?;
        let counts = self.load_counts(&mut attempt).await?;

        Ok(attempt_views::result(&attempt, &title, counts))
    }

    /// Review an answered question. Unanswered positions are rejected.
    pub async fn review_question(
        &self,
        user_id: &str,
        attempt_id: &str,
        position: i32,
    ) -> AppResult<ReviewQuestionDto> {
        let attempt = self.load_owned_attempt(user_id, attempt_id).await?;
        let questions = self.require_questions(&attempt.quiz_id).await?;

        let question = question_at(&questions, position)
            .ok_or_else(|| AppError::NotFound(format!("No question at position {}", position)))?;

        let answer = self
            .attempt_repository
            .find_answer(&attempt.id, &question.id)
            .await?
            .ok_or_else(|| {
                AppError::NotAnswered(format!(
                    "Question at position {} has not been answered yet",
                    position
                ))
            })?;

        Ok(attempt_views::review(question, &answer))
    }

    /// Newest attempt per quiz with live progress, healing stale finished flags.
    pub async fn resumable_quizzes(&self, user_id: &str) -> AppResult<Vec<ResumableQuizDto>> {
        let attempts = self.attempt_repository.list_by_user(user_id).await?;

        let mut seen_quizzes = HashSet::new();
        let mut result = Vec::new();

        for mut attempt in attempts {
            if !seen_quizzes.insert(attempt.quiz_id.clone()) {
                continue;
            }

            let title = self.quiz_title(&attempt.quiz_id).await?;
            let counts = self.load_counts(&mut attempt).await?;

            if sync_cached_fields(&mut attempt, counts) {
                log::debug!(
                    "Healed finished flag of attempt {} to {}",
                    attempt.id,
                    attempt.finished
                );
                attempt.touch();
                attempt = self.attempt_repository.save(attempt).await?;
            }

            result.push(attempt_views::resumable(&attempt, &title, counts));
        }

        Ok(result)
    }

    /// Published quizzes the user has never attempted.
    pub async fn new_quizzes(&self, user_id: &str) -> AppResult<Vec<QuizListItemDto>> {
        let quizzes = self.quiz_repository.list_published().await?;

        let mut result = Vec::new();
        for quiz in &quizzes {
            if !self
                .attempt_repository
                .exists_for_user_and_quiz(user_id, &quiz.id)
                .await?
            {
                result.push(QuizListItemDto::from(quiz));
            }
        }

        Ok(result)
    }

    /// Finished quiz count and total correct answers across all attempts.
    pub async fn player_stats(&self, user_id: &str) -> AppResult<PlayerStatsDto> {
        let finished_quizzes = self.attempt_repository.count_finished(user_id).await?;

        let mut points = 0;
        for attempt in self.attempt_repository.list_by_user(user_id).await? {
            points += self
                .attempt_repository
                .count_correct_answers(&attempt.id)
                .await?;
        }

        Ok(PlayerStatsDto {
            finished_quizzes,
            points,
        })
    }

    async fn advance(
        &self,
        mut attempt: QuizAttempt,
        question: &QuizQuestion,
        correct: bool,
    ) -> AppResult<AnswerResultDto> {
        let counts = self.load_counts(&mut attempt).await?;
        sync_cached_fields(&mut attempt, counts);

        let next_position = if attempt.finished {
            None
        } else {
            self.next_unanswered_position(&attempt).await?
        };
        if let Some(position) = next_position {
            attempt.current_position = position;
        }
        attempt.touch();
        let attempt = self.attempt_repository.save(attempt).await?;

        if attempt.finished {
            log::info!(
                "Attempt {} finished with {}/{} correct",
                attempt.id,
                counts.correct,
                counts.total
            );
        }

        Ok(AnswerResultDto {
            correct,
            correct_index: question.correct_index,
            explanation: question.explanation.clone(),
            score: counts.correct,
            finished: attempt.finished,
            next_position,
        })
    }

    async fn replay_answer(
        &self,
        mut attempt: QuizAttempt,
        question: &QuizQuestion,
        existing: AttemptAnswer,
    ) -> AppResult<AnswerResultDto> {
        log::debug!(
            "Question {} already answered in attempt {}; replaying stored result",
            question.id,
            attempt.id
        );

        let counts = self.load_counts(&mut attempt).await?;
        sync_cached_fields(&mut attempt, counts);
        attempt.touch();
        let attempt = self.attempt_repository.save(attempt).await?;

        let next_position = if attempt.finished {
            None
        } else {
            self.next_unanswered_position(&attempt).await?
        };

        Ok(AnswerResultDto {
            correct: existing.correct,
            correct_index: question.correct_index,
            explanation: question.explanation.clone(),
            score: counts.correct,
            finished: attempt.finished,
            next_position,
        })
    }

    async fn load_owned_attempt(&self, user_id: &str, attempt_id: &str) -> AppResult<QuizAttempt> {
        let attempt = self
            .attempt_repository
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attempt '{}' not found", attempt_id)))?;

        if !attempt.is_owned_by(user_id) {
            return Err(AppError::Forbidden(format!(
                "Attempt '{}' belongs to another user",
                attempt_id
            )));
        }

        Ok(attempt)
    }

    async fn require_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", quiz_id)))
    }

    async fn quiz_title(&self, quiz_id: &str) -> AppResult<String> {
        Ok(self
            .quiz_repository
            .find_by_id(quiz_id)
            .await?
            .map(|quiz| quiz.title)
            .unwrap_or_else(|| FALLBACK_QUIZ_TITLE.to_string()))
    }

    async fn require_questions(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>> {
        let questions = self.quiz_repository.list_questions(quiz_id).await?;
        if questions.is_empty() {
            return Err(AppError::NotFound(format!(
                "Quiz '{}' has no questions",
                quiz_id
            )));
        }
        Ok(questions)
    }

    /// Heals a missing question total from the catalog and persists it.
    async fn ensure_total_questions(&self, attempt: &mut QuizAttempt) -> AppResult<i64> {
        if attempt.total_questions > 0 {
            return Ok(attempt.total_questions);
        }

        let total = self.quiz_repository.count_questions(&attempt.quiz_id).await?;
        log::debug!(
            "Attempt {} had total_questions {}; healed to {}",
            attempt.id,
            attempt.total_questions,
            total
        );
        attempt.total_questions = total;
        *attempt = self.attempt_repository.save(attempt.clone()).await?;
        Ok(total)
    }

    async fn load_counts(&self, attempt: &mut QuizAttempt) -> AppResult<AnswerCounts> {
        let total = self.ensure_total_questions(attempt).await?;
        let answered = self.attempt_repository.count_answers(&attempt.id).await?;
        let correct = self
            .attempt_repository
            .count_correct_answers(&attempt.id)
            .await?;

        Ok(AnswerCounts {
            total,
            answered,
            correct,
        })
    }

    async fn next_unanswered_position(&self, attempt: &QuizAttempt) -> AppResult<Option<i32>> {
        let questions = self.quiz_repository.list_questions(&attempt.quiz_id).await?;
        let answers = self.attempt_repository.list_answers(&attempt.id).await?;
        let answered: HashSet<&str> = answers.iter().map(|a| a.question_id.as_str()).collect();

        Ok(next_unanswered_position(&questions, &answered))
    }
}

/// Refreshes the cached `finished` and `score` fields from live counts.
/// Returns whether `finished` changed.
fn sync_cached_fields(attempt: &mut QuizAttempt, counts: AnswerCounts) -> bool {
    let finished = is_finished(counts.total, counts.answered);
    let changed = attempt.finished != finished;
    attempt.finished = finished;
    attempt.score = counts.correct;
    changed
}
