//! Index structures for fast lookup. Each index is independent and incrementally updateable.

pub mod kind_index;
pub mod text_index;

pub use kind_index::KindIndex;
pub use text_index::{cosine_similarity, term_vector, tokenize, TermVector, TextIndex};
