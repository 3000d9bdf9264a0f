//! Configuration-driven mapping.
//!
//! A [`FieldTable`] is configured once with one rule per destination field
//! and then applied to every source record. Rules run in registration order
//! against a `Default` destination.

use crate::error::MapError;
use crate::model::{Book, BookDto};

type Rule<S, D> = Box<dyn Fn(&S, &mut D) -> Result<(), MapError> + Send + Sync>;

pub struct FieldTable<S, D> {
    rules: Vec<(&'static str, Rule<S, D>)>,
}

impl<S: 'static, D: Default + 'static> FieldTable<S, D> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Copy one field through a getter/setter pair.
    pub fn field<T, G, P>(mut self, name: &'static str, get: G, put: P) -> Self
    where
        T: Clone + 'static,
        G: Fn(&S) -> &T + Send + Sync + 'static,
        P: Fn(&mut D) -> &mut T + Send + Sync + 'static,
    {
        self.rules.push((
            name,
            Box::new(move |src: &S, dst: &mut D| -> Result<(), MapError> {
                *put(dst) = get(src).clone();
                Ok(())
            }),
        ));
        self
    }

    /// Register a rule that may fail, for nested or optional members.
    pub fn rule<F>(mut self, name: &'static str, rule: F) -> Self
    where
        F: Fn(&S, &mut D) -> Result<(), MapError> + Send + Sync + 'static,
    {
        self.rules.push((name, Box::new(rule)));
        self
    }

    /// Destination field names in application order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(name, _)| *name)
    }

    pub fn map(&self, src: &S) -> Result<D, MapError> {
        let mut dst = D::default();
        for (_, rule) in &self.rules {
            rule(src, &mut dst)?;
        }
        Ok(dst)
    }
}

impl<S: 'static, D: Default + 'static> Default for FieldTable<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

/// The `BookDto` to `Book` configuration.
pub fn book_table() -> FieldTable<BookDto, Book> {
    FieldTable::new()
        .field("title", |s: &BookDto| &s.title, |d: &mut Book| &mut d.title)
        .rule("author", |s: &BookDto, d: &mut Book| {
            let author = s.author.as_ref().ok_or(MapError::MissingField("author"))?;
            d.author.name = author.name.clone();
            Ok(())
        })
        .field(
            "published_date",
            |s: &BookDto| &s.published_date,
            |d: &mut Book| &mut d.published_date,
        )
        .field("isbn", |s: &BookDto| &s.isbn, |d: &mut Book| &mut d.isbn)
        .field("pages", |s: &BookDto| &s.pages, |d: &mut Book| &mut d.pages)
        .field(
            "publisher",
            |s: &BookDto| &s.publisher,
            |d: &mut Book| &mut d.publisher,
        )
        .field("genre", |s: &BookDto| &s.genre, |d: &mut Book| &mut d.genre)
        .field("price", |s: &BookDto| &s.price, |d: &mut Book| &mut d.price)
        .field(
            "is_ebook",
            |s: &BookDto| &s.is_ebook,
            |d: &mut Book| &mut d.is_ebook,
        )
        .field(
            "language",
            |s: &BookDto| &s.language,
            |d: &mut Book| &mut d.language,
        )
        .field("rating", |s: &BookDto| &s.rating, |d: &mut Book| &mut d.rating)
}
