//! Heuristic scanners over a decompressed save

pub mod filter;
pub mod lexer;
pub mod locator;
pub mod markers;
pub mod records;
pub mod sections;
pub mod utils;

pub use filter::{IdentifierFilter, METADATA_KEYWORDS};
pub use lexer::{LexState, NameToken, RecordLexer};
pub use locator::ShopLocator;
pub use records::{RecordEncoding, RecordScanner};
pub use sections::SectionResolver;
