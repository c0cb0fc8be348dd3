use crate::http::AppState;
use crate::models::{
    AuthorDetails, Book, BookView, CreateBookError, FilterBooksRequest, FindAuthorError,
    FindAuthorRequest, InvalidBookError, NewBook, SortOrder, UpdateBookError, UpdateBookRequest,
};
use crate::store::CatalogRepository;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> axum::response::Response {
        (self.0, self.1).into_response()
    }
}

/// 201 with a `Location` header pointing at the new resource.
#[derive(Debug)]
pub struct ApiCreated<T: Serialize> {
    location: String,
    data: T,
}

impl<T: Serialize> IntoResponse for ApiCreated<T> {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::CREATED,
            [(LOCATION, self.location)],
            Json(self.data),
        )
            .into_response()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, Json(msg)).into_response(),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, Json(msg)).into_response(),
        }
    }
}

fn invalid_book_message(err: &InvalidBookError, empty_title: &str) -> String {
    match err {
        InvalidBookError::EmptyTitle(_) => empty_title.to_string(),
        InvalidBookError::FutureYear(_) => "Publication year cannot be in the future.".to_string(),
        InvalidBookError::UnknownAuthor { author_id } => {
            format!("Author with ID {author_id} does not exist.")
        }
    }
}

impl From<CreateBookError> for ApiError {
    fn from(err: CreateBookError) -> Self {
        match err {
            CreateBookError::Invalid(err) => {
                tracing::debug!("rejected new book: {err}");
                Self::BadRequest(invalid_book_message(&err, "Book title cannot be empty."))
            }
        }
    }
}

impl From<UpdateBookError> for ApiError {
    fn from(err: UpdateBookError) -> Self {
        match err {
            UpdateBookError::NotFound { id } => {
                Self::NotFound(format!("Book with ID {id} not found."))
            }
            UpdateBookError::Invalid(err) => {
                tracing::debug!("rejected book update: {err}");
                Self::BadRequest(invalid_book_message(&err, "Title cannot be empty."))
            }
        }
    }
}

impl From<FindAuthorError> for ApiError {
    fn from(err: FindAuthorError) -> Self {
        match err {
            FindAuthorError::NotFound { id } => {
                Self::NotFound(format!("Author with ID {id} not found."))
            }
        }
    }
}

/// Book body accepted by POST and PUT. Missing fields fall through to validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookHttpRequest {
    title: Option<String>,
    #[serde(rename = "authorID", alias = "authorId")]
    author_id: i32,
    publication_year: i32,
}

impl From<BookHttpRequest> for NewBook {
    fn from(value: BookHttpRequest) -> Self {
        Self::new(
            value.title.unwrap_or_default(),
            value.author_id,
            value.publication_year,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterBooksHttpQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    publication_year: Option<i32>,
    sort_by: Option<String>,
}

/// `publicationYear=` means no filter; any other value must be an integer.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(year) => year.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl From<FilterBooksHttpQuery> for FilterBooksRequest {
    fn from(value: FilterBooksHttpQuery) -> Self {
        Self::new(
            value.publication_year,
            SortOrder::parse(value.sort_by.as_deref()),
        )
    }
}

pub async fn list_books<CR: CatalogRepository>(
    State(state): State<AppState<CR>>,
) -> ApiSuccess<Vec<BookView>> {
    ApiSuccess::new(StatusCode::OK, state.catalog.list_books().await)
}

pub async fn list_books_by_author<CR: CatalogRepository>(
    State(state): State<AppState<CR>>,
    Path(id): Path<i32>,
) -> Result<ApiSuccess<Vec<BookView>>, ApiError> {
    state
        .catalog
        .list_books_by_author(&FindAuthorRequest::new(id))
        .await
        .map_err(ApiError::from)
        .map(|books| ApiSuccess::new(StatusCode::OK, books))
}

pub async fn create_book<CR: CatalogRepository>(
    State(state): State<AppState<CR>>,
    Json(body): Json<BookHttpRequest>,
) -> Result<ApiCreated<Book>, ApiError> {
    let req = body.into();
    state
        .catalog
        .create_book(&req)
        .await
        .map_err(ApiError::from)
        .map(|book| ApiCreated {
            location: format!("/api/books/{}", book.id()),
            data: book,
        })
}

pub async fn filter_books<CR: CatalogRepository>(
    State(state): State<AppState<CR>>,
    Query(query): Query<FilterBooksHttpQuery>,
) -> ApiSuccess<Vec<BookView>> {
    let req = query.into();
    ApiSuccess::new(StatusCode::OK, state.catalog.filter_books(&req).await)
}

pub async fn update_book<CR: CatalogRepository>(
    State(state): State<AppState<CR>>,
    Path(id): Path<i32>,
    Json(body): Json<BookHttpRequest>,
) -> Result<StatusCode, ApiError> {
    let req = UpdateBookRequest::new(id, body.into());
    state.catalog.update_book(&req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn find_author_details<CR: CatalogRepository>(
    State(state): State<AppState<CR>>,
    Path(id): Path<i32>,
) -> Result<ApiSuccess<AuthorDetails>, ApiError> {
    let details = state
        .catalog
        .find_author_details(&FindAuthorRequest::new(id))
        .await?;
    Ok(ApiSuccess::new(StatusCode::OK, details))
}
