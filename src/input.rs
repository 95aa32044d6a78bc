//! Translation inputs: the dictionary model and the transports that fetch it.

mod error;
pub mod source;
pub mod translation;

pub use error::FetchError;
pub use source::{
    DirectorySource,
    HttpSource,
    TranslationSource,
};
pub use translation::{
    Dictionary,
    LeafKind,
    Node,
};
