mod digest;
mod filter;
mod selection;

pub use digest::{Digest, DigestFormatter};
pub use filter::KeywordFilter;
pub use selection::SelectionPolicy;
