//! Visit identifier value.
//!
//! A visit is usually an integer exposure number, but opaque string ids also
//! occur. Ordering is derived so a mixed list sorts integers first (by value)
//! and names after (lexicographic), which is what compression relies on.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visit {
    Id(i64),
    Name(String),
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visit::Id(n) => write!(f, "{}", n),
            Visit::Name(s) => f.write_str(s),
        }
    }
}
