//! Conversion-trait mapping: `Book::try_from(&dto)` / `(&dto).try_into()`.

use crate::error::MapError;
use crate::model::{Author, AuthorDto, Book, BookDto};

impl From<&AuthorDto> for Author {
    fn from(dto: &AuthorDto) -> Self {
        Author {
            name: dto.name.clone(),
        }
    }
}

impl TryFrom<&BookDto> for Book {
    type Error = MapError;

    fn try_from(dto: &BookDto) -> Result<Self, Self::Error> {
        let author = dto
            .author
            .as_ref()
            .map(Author::from)
            .ok_or(MapError::MissingField("author"))?;

        Ok(Book {
            title: dto.title.clone(),
            author,
            published_date: dto.published_date.clone(),
            isbn: dto.isbn.clone(),
            pages: dto.pages,
            publisher: dto.publisher.clone(),
            genre: dto.genre.clone(),
            price: dto.price,
            is_ebook: dto.is_ebook,
            language: dto.language.clone(),
            rating: dto.rating,
        })
    }
}

pub fn map_book(dto: &BookDto) -> Result<Book, MapError> {
    dto.try_into()
}
