pub mod content;
pub mod font;

pub use content::{ContentItem, ContentValue};
pub use font::{
    FontDescriptor, FontError, FontProvider, FontQuery, InMemoryFontProvider, SharedFontData,
};
