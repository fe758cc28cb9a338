use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{AuthMiddleware, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{AnswerRequest, StartAttemptRequest},
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/play")
            .wrap(AuthMiddleware)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::ValidationError(err.to_string()).into()
            }))
            .service(list_new_quizzes)
            .service(list_resumable_quizzes)
            .service(restart_quiz)
            .service(start_attempt)
            .service(get_attempt_meta)
            .service(get_attempt_overview)
            .service(get_current_question)
            .service(get_question_at)
            .service(submit_answer)
            .service(get_attempt_result)
            .service(review_question)
            .service(get_player_stats),
    );
}

#[get("/quizzes/new")]
async fn list_new_quizzes(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_attempt_service.new_quizzes(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/quizzes/resumable")]
async fn list_resumable_quizzes(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state
        .quiz_attempt_service
        .resumable_quizzes(auth.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[post("/quizzes/{quiz_id}/restart")]
async fn restart_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let started = state
        .quiz_attempt_service
        .restart(auth.user_id(), &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(started))
}

#[post("/attempts")]
async fn start_attempt(
    state: web::Data<AppState>,
    request: web::Json<StartAttemptRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let started = state
        .quiz_attempt_service
        .start_or_resume(auth.user_id(), &request.into_inner().into_quiz_id()?)
        .await?;
    Ok(HttpResponse::Ok().json(started))
}

#[get("/attempts/{attempt_id}/meta")]
async fn get_attempt_meta(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let meta = state
        .quiz_attempt_service
        .attempt_meta(auth.user_id(), &attempt_id)
        .await?;
    Ok(HttpResponse::Ok().json(meta))
}

#[get("/attempts/{attempt_id}/overview")]
async fn get_attempt_overview(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let overview = state
        .quiz_attempt_service
        .attempt_overview(auth.user_id(), &attempt_id)
        .await?;
    Ok(HttpResponse::Ok().json(overview))
}

#[get("/attempts/{attempt_id}/question")]
async fn get_current_question(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let question = state
        .quiz_attempt_service
        .current_question(auth.user_id(), &attempt_id, None)
        .await?;
    Ok(HttpResponse::Ok().json(question))
}

#[get("/attempts/{attempt_id}/question/{position}")]
async fn get_question_at(
    state: web::Data<AppState>,
    path: web::Path<(String, i32)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (attempt_id, position) = path.into_inner();
    let question = state
        .quiz_attempt_service
        .current_question(auth.user_id(), &attempt_id, Some(position))
        .await?;
    Ok(HttpResponse::Ok().json(question))
}

#[post("/attempts/{attempt_id}/answer")]
async fn submit_answer(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    request: web::Json<AnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (question_id, selected_index) = request.into_inner().into_parts()?;

    let result = state
        .quiz_attempt_service
        .answer(auth.user_id(), &attempt_id, &question_id, selected_index)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/attempts/{attempt_id}/result")]
async fn get_attempt_result(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .quiz_attempt_service
        .attempt_result(auth.user_id(), &attempt_id)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/attempts/{attempt_id}/review/{position}")]
async fn review_question(
    state: web::Data<AppState>,
    path: web::Path<(String, i32)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (attempt_id, position) = path.into_inner();
    let review = state
        .quiz_attempt_service
        .review_question(auth.user_id(), &attempt_id, position)
        .await?;
    Ok(HttpResponse::Ok().json(review))
}

#[get("/stats")]
async fn get_player_stats(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let stats = state.quiz_attempt_service.player_stats(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
