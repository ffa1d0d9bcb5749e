//! Visit identifier codec.
//!
//! Owns:
//! - Visit value type (integer exposure number or opaque name)
//! - token expansion ("12..20:2" -> explicit visit list)
//! - the inverse compression used to build dataId command-line arguments

pub mod compress;
pub mod parse;
pub mod value;

pub use compress::visits_to_string;
pub use parse::{VisitToken, expand_token};
pub use value::Visit;
