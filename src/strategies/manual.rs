use crate::error::MapError;
use crate::model::{Author, Book, BookDto};

/// Hand-written field-by-field copy.
pub fn map_book(dto: &BookDto) -> Result<Book, MapError> {
    let author = dto.author.as_ref().ok_or(MapError::MissingField("author"))?;

    Ok(Book {
        title: dto.title.clone(),
        author: Author {
            name: author.name.clone(),
        },
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
