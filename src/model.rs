//! Source and destination shapes for the mapping benchmark.
//!
//! `BookDto` is the transport shape, `Book` the domain shape. Field names are
//! identical on both sides so name-driven mechanisms (serde) line up.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorDto {
    pub name: String,
}

/// Transport record. `author` is optional because the wire shape allows a
/// missing author; such a record cannot be mapped into a [`Book`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub title: String,
    pub author: Option<AuthorDto>,
    pub published_date: String,
    pub isbn: String,
    pub pages: i32,
    pub publisher: String,
    pub genre: String,
    pub price: f64,
    pub is_ebook: bool,
    pub language: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

/// Domain record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: Author,
    pub published_date: String,
    pub isbn: String,
    pub pages: i32,
    pub publisher: String,
    pub genre: String,
    pub price: f64,
    pub is_ebook: bool,
    pub language: String,
    pub rating: f64,
}

impl Book {
    /// True when every field of `self` equals the corresponding field of `dto`.
    pub fn mirrors(&self, dto: &BookDto) -> bool {
        let author_matches = dto
            .author
            .as_ref()
            .is_some_and(|a| a.name == self.author.name);

        author_matches
            && self.title == dto.title
            && self.published_date == dto.published_date
            && self.isbn == dto.isbn
            && self.pages == dto.pages
            && self.publisher == dto.publisher
            && self.genre == dto.genre
            && self.price == dto.price
            && self.is_ebook == dto.is_ebook
            && self.language == dto.language
            && self.rating == dto.rating
    }
}

#[cfg(test)]
pub(crate) fn sample_dto() -> BookDto {
    BookDto {
        title: "T".to_string(),
        author: Some(AuthorDto {
            name: "A".to_string(),
        }),
        published_date: "2020-01-01".to_string(),
        isbn: "1234567890123".to_string(),
        pages: 300,
        publisher: "P".to_string(),
        genre: "Fiction".to_string(),
        price: 19.99,
        is_ebook: false,
        language: "en".to_string(),
        rating: 4.5,
    }
}
