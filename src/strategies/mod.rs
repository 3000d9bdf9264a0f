//! Mapping strategies under comparison.
//!
//! Every strategy performs the same `BookDto` to `Book` copy through a
//! different mechanism. The harness only sees [`StrategyDescriptor`]s: a name
//! and a boxed function value.

pub mod convert;
pub mod field_table;
pub mod generated;
pub mod manual;
pub mod serde_value;

use crate::error::MapError;
use crate::model::{Book, BookDto};
use crate::StrategyKind;

type Invoke<I, O> = Box<dyn Fn(&I) -> Result<O, MapError> + Send + Sync>;

/// A named, interchangeable transformation from `I` to `O`.
pub struct StrategyDescriptor<I, O> {
    name: String,
    invoke: Invoke<I, O>,
}

impl<I, O> StrategyDescriptor<I, O> {
    pub fn new<F>(name: impl Into<String>, invoke: F) -> Self
    where
        F: Fn(&I) -> Result<O, MapError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            invoke: Box::new(invoke),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn invoke(&self, input: &I) -> Result<O, MapError> {
        (self.invoke)(input)
    }
}

impl<I, O> std::fmt::Debug for StrategyDescriptor<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn descriptor(kind: StrategyKind) -> StrategyDescriptor<BookDto, Book> {
    match kind {
        StrategyKind::SerdeValue => {
            StrategyDescriptor::new(kind.as_str(), serde_value::map_via_value::<BookDto, Book>)
        }
        StrategyKind::FieldTable => {
            // Configured once, applied on every invocation.
            let table = field_table::book_table();
            StrategyDescriptor::new(kind.as_str(), move |dto: &BookDto| table.map(dto))
        }
        StrategyKind::Manual => StrategyDescriptor::new(kind.as_str(), manual::map_book),
        StrategyKind::TryFrom => StrategyDescriptor::new(kind.as_str(), convert::map_book),
        StrategyKind::MacroGenerated => {
            let mapper = generated::BookMapper;
            StrategyDescriptor::new(kind.as_str(), move |dto: &BookDto| mapper.map(dto))
        }
    }
}

/// Build descriptors for the selected built-in strategies.
///
/// An empty selection means all of them. The result is always in declaration
/// order, whatever order `selected` lists them in, and without duplicates.
pub fn registry(selected: &[StrategyKind]) -> Vec<StrategyDescriptor<BookDto, Book>> {
    StrategyKind::ALL
        .iter()
        .copied()
        .filter(|kind| selected.is_empty() || selected.contains(kind))
        .map(descriptor)
        .collect()
}
