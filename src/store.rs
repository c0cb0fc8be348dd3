use crate::models::{
    AuthorDetails, Book, BookView, CreateBookError, FilterBooksRequest, FindAuthorError,
    FindAuthorRequest, NewBook, UpdateBookError, UpdateBookRequest,
};
use async_trait::async_trait;

#[async_trait]
pub trait CatalogRepository: Send + Sync + 'static {
    async fn list_books(&self) -> Vec<BookView>;

    async fn list_books_by_author(
        &self,
        req: &FindAuthorRequest,
    ) -> Result<Vec<BookView>, FindAuthorError>;

    async fn create_book(&self, req: &NewBook) -> Result<Book, CreateBookError>;

    async fn filter_books(&self, req: &FilterBooksRequest) -> Vec<BookView>;

    async fn update_book(&self, req: &UpdateBookRequest) -> Result<(), UpdateBookError>;

    async fn find_author_details(
        &self,
        req: &FindAuthorRequest,
    ) -> Result<AuthorDetails, FindAuthorError>;
}
