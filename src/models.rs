use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTitle(String);

impl BookTitle {
    /// Rejects blank titles; an accepted title is stored exactly as given.
    pub fn new(raw: &str) -> Result<Self, BookTitleEmptyError> {
        if raw.trim().is_empty() {
            Err(BookTitleEmptyError)
        } else {
            Ok(Self(raw.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Book title cannot be empty")]
pub struct BookTitleEmptyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PublicationYear(i32);

impl PublicationYear {
    pub const fn new(year: i32, current_year: i32) -> Result<Self, PublicationYearError> {
        if year > current_year {
            Err(PublicationYearError { year, current_year })
        } else {
            Ok(Self(year))
        }
    }

    pub const fn new_unchecked(year: i32) -> Self {
        Self(year)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Publication year {year} is after the current year {current_year}")]
pub struct PublicationYearError {
    pub year: i32,
    pub current_year: i32,
}

#[derive(Debug, Clone)]
pub struct Author {
    id: i32,
    name: String,
}

impl Author {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub const fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: i32,
    #[serde(serialize_with = "serialize_title")]
    title: BookTitle,
    #[serde(rename = "authorID")]
    author_id: i32,
    #[serde(serialize_with = "serialize_year")]
    publication_year: PublicationYear,
}

impl Book {
    pub const fn new(
        id: i32,
        title: BookTitle,
        author_id: i32,
        publication_year: PublicationYear,
    ) -> Self {
        Self {
            id,
            title,
            author_id,
            publication_year,
        }
    }

    pub const fn id(&self) -> i32 {
        self.id
    }

    pub const fn title(&self) -> &BookTitle {
        &self.title
    }

    pub const fn author_id(&self) -> i32 {
        self.author_id
    }

    pub const fn publication_year(&self) -> PublicationYear {
        self.publication_year
    }

    /// Overwrites every mutable field; the id never changes.
    pub fn replace(
        &mut self,
        title: BookTitle,
        author_id: i32,
        publication_year: PublicationYear,
    ) {
        self.title = title;
        self.author_id = author_id;
        self.publication_year = publication_year;
    }
}

fn serialize_title<S: serde::Serializer>(title: &BookTitle, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(title.as_str())
}

fn serialize_year<S: serde::Serializer>(year: &PublicationYear, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i32(year.get())
}

/// A book as listed to clients, with the author reference resolved to a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub id: i32,
    pub title: String,
    pub author_name: String,
    pub publication_year: i32,
}

impl BookView {
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown";

    pub fn new(book: &Book, author_name: &str) -> Self {
        Self {
            id: book.id(),
            title: book.title().to_string(),
            author_name: author_name.into(),
            publication_year: book.publication_year().get(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDetails {
    id: i32,
    name: String,
    books: Vec<Book>,
}

impl AuthorDetails {
    pub fn new(author: &Author, books: Vec<Book>) -> Self {
        Self {
            id: author.id(),
            name: author.name().into(),
            books,
        }
    }

    pub const fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }
}

/// Unvalidated book fields as submitted by a client.
#[derive(Debug, Clone)]
pub struct NewBook {
    title: String,
    author_id: i32,
    publication_year: i32,
}

impl NewBook {
    pub const fn new(title: String, author_id: i32, publication_year: i32) -> Self {
        Self {
            title,
            author_id,
            publication_year,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn author_id(&self) -> i32 {
        self.author_id
    }

    pub const fn publication_year(&self) -> i32 {
        self.publication_year
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBookRequest {
    id: i32,
    book: NewBook,
}

impl UpdateBookRequest {
    pub const fn new(id: i32, book: NewBook) -> Self {
        Self { id, book }
    }

    pub const fn id(&self) -> i32 {
        self.id
    }

    pub const fn book(&self) -> &NewBook {
        &self.book
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Insertion,
    Title,
}

impl SortOrder {
    /// Only "title" (any case) selects a sort; anything else keeps insertion order.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("title") => Self::Title,
            _ => Self::Insertion,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterBooksRequest {
    publication_year: Option<i32>,
    sort: SortOrder,
}

impl FilterBooksRequest {
    pub const fn new(publication_year: Option<i32>, sort: SortOrder) -> Self {
        Self {
            publication_year,
            sort,
        }
    }

    pub const fn publication_year(&self) -> Option<i32> {
        self.publication_year
    }

    pub const fn sort(&self) -> SortOrder {
        self.sort
    }
}

#[derive(Debug)]
pub struct FindAuthorRequest {
    id: i32,
}

impl FindAuthorRequest {
    pub const fn new(id: i32) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidBookError {
    #[error(transparent)]
    EmptyTitle(#[from] BookTitleEmptyError),
    #[error(transparent)]
    FutureYear(#[from] PublicationYearError),
    #[error("Author with id \"{author_id}\" does not exist")]
    UnknownAuthor { author_id: i32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateBookError {
    #[error(transparent)]
    Invalid(#[from] InvalidBookError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateBookError {
    #[error("Book with id \"{id}\" does not exist")]
    NotFound { id: i32 },
    #[error(transparent)]
    Invalid(#[from] InvalidBookError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FindAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i32 },
}
