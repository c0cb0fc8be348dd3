use crate::models::{
    Author, AuthorDetails, Book, BookTitle, BookView, CreateBookError, FilterBooksRequest,
    FindAuthorError, FindAuthorRequest, InvalidBookError, NewBook, PublicationYear, SortOrder,
    UpdateBookError, UpdateBookRequest,
};
use crate::store::CatalogRepository;
use async_trait::async_trait;
use chrono::Datelike;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns the author and book collections and enforces the book rules.
#[derive(Debug, Default)]
pub struct Catalog {
    authors: Vec<Author>,
    books: Vec<Book>,
}

impl Catalog {
    pub const fn new(authors: Vec<Author>, books: Vec<Book>) -> Self {
        Self { authors, books }
    }

    /// The fixture records the service starts with.
    pub fn seeded() -> Self {
        let authors = vec![
            Author::new(1, "Dato Turashvili"),
            Author::new(2, "Shota Rustaveli"),
        ];
        let books = vec![
            seed_book(1, "Jeans Generation", 1, 2008),
            seed_book(2, "The Knight in the Panther's Skin", 2, 1186),
            seed_book(3, "The King of Forests", 1, 2013),
        ];
        Self::new(authors, books)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn find_author(&self, id: i32) -> Option<&Author> {
        self.authors.iter().find(|author| author.id() == id)
    }

    pub fn find_book(&self, id: i32) -> Option<&Book> {
        self.books.iter().find(|book| book.id() == id)
    }

    fn view(&self, book: &Book) -> BookView {
        let author_name = self
            .find_author(book.author_id())
            .map_or(BookView::UNKNOWN_AUTHOR, Author::name);
        BookView::new(book, author_name)
    }

    pub fn list_books(&self) -> Vec<BookView> {
        self.books.iter().map(|book| self.view(book)).collect()
    }

    pub fn list_books_by_author(&self, author_id: i32) -> Result<Vec<BookView>, FindAuthorError> {
        let author = self
            .find_author(author_id)
            .ok_or(FindAuthorError::NotFound { id: author_id })?;

        Ok(self
            .books
            .iter()
            .filter(|book| book.author_id() == author_id)
            .map(|book| BookView::new(book, author.name()))
            .collect())
    }

    pub fn filter_books(&self, req: &FilterBooksRequest) -> Vec<BookView> {
        let mut books: Vec<&Book> = self
            .books
            .iter()
            .filter(|book| {
                req.publication_year()
                    .is_none_or(|year| book.publication_year().get() == year)
            })
            .collect();

        if req.sort() == SortOrder::Title {
            books.sort_by_cached_key(|book| book.title().as_str().to_lowercase());
        }

        books.into_iter().map(|book| self.view(book)).collect()
    }

    pub fn author_details(&self, author_id: i32) -> Result<AuthorDetails, FindAuthorError> {
        let author = self
            .find_author(author_id)
            .ok_or(FindAuthorError::NotFound { id: author_id })?;

        let books = self
            .books
            .iter()
            .filter(|book| book.author_id() == author_id)
            .cloned()
            .collect();

        Ok(AuthorDetails::new(author, books))
    }

    /// Id of the next created book: one past the current maximum.
    pub fn next_book_id(&self) -> i32 {
        self.books.iter().map(Book::id).max().unwrap_or(0) + 1
    }

    fn validate(
        &self,
        req: &NewBook,
        current_year: i32,
    ) -> Result<(BookTitle, PublicationYear), InvalidBookError> {
        let title = BookTitle::new(req.title())?;
        let year = PublicationYear::new(req.publication_year(), current_year)?;
        if self.find_author(req.author_id()).is_none() {
            return Err(InvalidBookError::UnknownAuthor {
                author_id: req.author_id(),
            });
        }
        Ok((title, year))
    }

    pub fn create_book(
        &mut self,
        req: &NewBook,
        current_year: i32,
    ) -> Result<Book, CreateBookError> {
        let (title, year) = self.validate(req, current_year)?;
        let book = Book::new(self.next_book_id(), title, req.author_id(), year);
        self.books.push(book.clone());
        Ok(book)
    }

    pub fn update_book(
        &mut self,
        req: &UpdateBookRequest,
        current_year: i32,
    ) -> Result<(), UpdateBookError> {
        let id = req.id();
        if self.find_book(id).is_none() {
            return Err(UpdateBookError::NotFound { id });
        }

        let (title, year) = self.validate(req.book(), current_year)?;
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id() == id)
            .ok_or(UpdateBookError::NotFound { id })?;
        book.replace(title, req.book().author_id(), year);
        Ok(())
    }
}

fn seed_book(id: i32, title: &str, author_id: i32, year: i32) -> Book {
    Book::new(
        id,
        BookTitle::new_unchecked(title),
        author_id,
        PublicationYear::new_unchecked(year),
    )
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Shares one [`Catalog`] between request handlers behind a single read/write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(Catalog::seeded())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn list_books(&self) -> Vec<BookView> {
        self.catalog.read().await.list_books()
    }

    async fn list_books_by_author(
        &self,
        req: &FindAuthorRequest,
    ) -> Result<Vec<BookView>, FindAuthorError> {
        self.catalog.read().await.list_books_by_author(req.id())
    }

    async fn create_book(&self, req: &NewBook) -> Result<Book, CreateBookError> {
        let book = self.catalog.write().await.create_book(req, current_year())?;
        tracing::info!(id = book.id(), title = %book.title(), "created book");
        Ok(book)
    }

    async fn filter_books(&self, req: &FilterBooksRequest) -> Vec<BookView> {
        self.catalog.read().await.filter_books(req)
    }

    async fn update_book(&self, req: &UpdateBookRequest) -> Result<(), UpdateBookError> {
        self.catalog
            .write()
            .await
            .update_book(req, current_year())?;
        tracing::info!(id = req.id(), "updated book");
        Ok(())
    }

    async fn find_author_details(
        &self,
        req: &FindAuthorRequest,
    ) -> Result<AuthorDetails, FindAuthorError> {
        self.catalog.read().await.author_details(req.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublicationYearError;

    const YEAR: i32 = 2026;

    fn new_book(title: &str, author_id: i32, year: i32) -> NewBook {
        NewBook::new(title.into(), author_id, year)
    }

    fn titles(views: &[BookView]) -> Vec<&str> {
        views.iter().map(|view| view.title.as_str()).collect()
    }

    #[test]
    fn list_books_resolves_author_names() {
        let views = Catalog::seeded().list_books();
        let names: Vec<_> = views.iter().map(|v| v.author_name.as_str()).collect();
        assert_eq!(
            names,
            ["Dato Turashvili", "Shota Rustaveli", "Dato Turashvili"]
        );
    }

    #[test]
    fn dangling_author_reference_lists_as_unknown() {
        let catalog = Catalog::new(vec![], vec![seed_book(1, "Orphan", 42, 2000)]);
        assert_eq!(catalog.list_books()[0].author_name, "Unknown");

        let req = FilterBooksRequest::new(None, SortOrder::Insertion);
        assert_eq!(catalog.filter_books(&req)[0].author_name, "Unknown");
    }

    #[test]
    fn list_books_by_author_requires_existing_author() {
        let catalog = Catalog::seeded();
        assert_eq!(
            titles(&catalog.list_books_by_author(1).unwrap()),
            ["Jeans Generation", "The King of Forests"]
        );
        assert_eq!(
            catalog.list_books_by_author(3),
            Err(FindAuthorError::NotFound { id: 3 })
        );
    }

    #[test]
    fn author_without_books_lists_empty() {
        let catalog = Catalog::new(vec![Author::new(5, "Nobody")], vec![]);
        assert!(catalog.list_books_by_author(5).unwrap().is_empty());
        assert!(catalog.author_details(5).unwrap().books().is_empty());
    }

    #[test]
    fn create_book_assigns_next_id_and_appends() {
        let mut catalog = Catalog::seeded();
        let book = catalog
            .create_book(&new_book("New Book", 1, 2020), YEAR)
            .unwrap();

        assert_eq!(book.id(), 4);
        assert_eq!(catalog.books().len(), 4);
        assert_eq!(catalog.books().last().unwrap().title().as_str(), "New Book");
        assert_eq!(catalog.next_book_id(), 5);
    }

    #[test]
    fn next_id_follows_maximum_not_length() {
        let mut catalog = Catalog::new(
            vec![Author::new(1, "A")],
            vec![seed_book(10, "Ten", 1, 2000), seed_book(2, "Two", 1, 2000)],
        );
        let book = catalog
            .create_book(&new_book("Eleven", 1, 2000), YEAR)
            .unwrap();
        assert_eq!(book.id(), 11);

        let mut empty = Catalog::new(vec![Author::new(1, "A")], vec![]);
        let first = empty
            .create_book(&new_book("First", 1, 2000), YEAR)
            .unwrap();
        assert_eq!(first.id(), 1);
    }

    #[test]
    fn create_book_rejects_invalid_input_without_mutating() {
        let mut catalog = Catalog::seeded();

        for title in ["", "   "] {
            let err = catalog.create_book(&new_book(title, 1, 2020), YEAR).unwrap_err();
            assert!(matches!(
                err,
                CreateBookError::Invalid(InvalidBookError::EmptyTitle(_))
            ));
        }

        let err = catalog
            .create_book(&new_book("Later", 1, YEAR + 1), YEAR)
            .unwrap_err();
        assert_eq!(
            err,
            CreateBookError::Invalid(InvalidBookError::FutureYear(PublicationYearError {
                year: YEAR + 1,
                current_year: YEAR
            }))
        );

        let err = catalog
            .create_book(&new_book("Lost", 99, 2020), YEAR)
            .unwrap_err();
        assert_eq!(
            err,
            CreateBookError::Invalid(InvalidBookError::UnknownAuthor { author_id: 99 })
        );

        assert_eq!(catalog.books().len(), 3);
    }

    #[test]
    fn create_book_checks_title_before_year_and_author() {
        let mut catalog = Catalog::seeded();
        let err = catalog
            .create_book(&new_book(" ", 99, YEAR + 5), YEAR)
            .unwrap_err();
        assert!(matches!(
            err,
            CreateBookError::Invalid(InvalidBookError::EmptyTitle(_))
        ));

        let err = catalog
            .create_book(&new_book("Title", 99, YEAR + 5), YEAR)
            .unwrap_err();
        assert!(matches!(
            err,
            CreateBookError::Invalid(InvalidBookError::FutureYear(_))
        ));
    }

    #[test]
    fn filter_books_by_year() {
        let catalog = Catalog::seeded();
        let req = FilterBooksRequest::new(Some(2008), SortOrder::Insertion);
        assert_eq!(titles(&catalog.filter_books(&req)), ["Jeans Generation"]);

        let req = FilterBooksRequest::new(Some(1900), SortOrder::Insertion);
        assert!(catalog.filter_books(&req).is_empty());
    }

    #[test]
    fn filter_books_sorts_by_title_ignoring_case() {
        let mut catalog = Catalog::seeded();
        catalog
            .create_book(&new_book("a lowercase start", 2, 2000), YEAR)
            .unwrap();

        let req = FilterBooksRequest::new(None, SortOrder::Title);
        assert_eq!(
            titles(&catalog.filter_books(&req)),
            [
                "a lowercase start",
                "Jeans Generation",
                "The King of Forests",
                "The Knight in the Panther's Skin",
            ]
        );

        let req = FilterBooksRequest::new(None, SortOrder::Insertion);
        assert_eq!(
            titles(&catalog.filter_books(&req)),
            [
                "Jeans Generation",
                "The Knight in the Panther's Skin",
                "The King of Forests",
                "a lowercase start",
            ]
        );
    }

    #[test]
    fn update_book_replaces_fields_in_place() {
        let mut catalog = Catalog::seeded();
        let req = UpdateBookRequest::new(2, new_book("Vepkhistkaosani", 1, 1200));
        catalog.update_book(&req, YEAR).unwrap();

        let book = catalog.find_book(2).unwrap();
        assert_eq!(book.title().as_str(), "Vepkhistkaosani");
        assert_eq!(book.author_id(), 1);
        assert_eq!(book.publication_year().get(), 1200);
        assert_eq!(catalog.books()[1].id(), 2);
        assert_eq!(catalog.books().len(), 3);
    }

    #[test]
    fn update_book_reports_missing_book_before_validation() {
        let mut catalog = Catalog::seeded();
        let req = UpdateBookRequest::new(42, new_book("", 99, YEAR + 1));
        assert_eq!(
            catalog.update_book(&req, YEAR),
            Err(UpdateBookError::NotFound { id: 42 })
        );
    }

    #[test]
    fn update_book_with_unknown_author_leaves_book_unchanged() {
        let mut catalog = Catalog::seeded();
        let req = UpdateBookRequest::new(1, new_book("Changed", 99, 2000));
        assert_eq!(
            catalog.update_book(&req, YEAR),
            Err(UpdateBookError::Invalid(InvalidBookError::UnknownAuthor {
                author_id: 99
            }))
        );

        let book = catalog.find_book(1).unwrap();
        assert_eq!(book.title().as_str(), "Jeans Generation");
        assert_eq!(book.author_id(), 1);
        assert_eq!(book.publication_year().get(), 2008);
    }

    #[test]
    fn author_details_include_raw_books() {
        let catalog = Catalog::seeded();
        let details = catalog.author_details(2).unwrap();
        assert_eq!(details.id(), 2);
        assert_eq!(details.name(), "Shota Rustaveli");
        let ids: Vec<_> = details.books().iter().map(Book::id).collect();
        assert_eq!(ids, [2]);

        assert!(matches!(
            catalog.author_details(3),
            Err(FindAuthorError::NotFound { id: 3 })
        ));
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let store = InMemoryCatalog::seeded();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_book(&new_book(&format!("Book {i}"), 1, 2000))
                    .await
                    .unwrap()
                    .id()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (4..20).collect::<Vec<_>>());
        assert_eq!(store.list_books().await.len(), 19);
    }
}
