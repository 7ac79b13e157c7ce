use axum::{
    extract::{Path, State},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use crate::books::dto::BookDto;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::core::command::Command;
use crate::core::controller::{AppState, ServerError};

pub async fn add_book(
    State(state): State<AppState>,
    json: Result<Json<Value>, JsonRejection>) -> Result<(StatusCode, Json<BookDto>), ServerError> {
    let json = json.map_err(|rejection| ServerError::bad_request(rejection.body_text().as_str()))?;
    let book: BookDto = serde_json::from_value(json.0)
        .map_err(|err| ServerError::bad_request(err.to_string().as_str()))?;
    let res = AddBookCommand::new(state.catalog_service).execute(AddBookCommandRequest::new(book)).await?;
    Ok((StatusCode::CREATED, Json(res.book)))
}

pub async fn find_book_by_id(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<Json<BookDto>, ServerError> {
    let req = GetBookCommandRequest::new(book_id);
    let res = GetBookCommand::new(state.catalog_service).execute(req).await?;
    Ok(Json(res.book))
}

pub async fn remove_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<StatusCode, ServerError> {
    let req = RemoveBookCommandRequest::new(book_id);
    let _ = RemoveBookCommand::new(state.catalog_service).execute(req).await?;
    Ok(StatusCode::NO_CONTENT)
}
