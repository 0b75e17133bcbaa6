use core::fmt;

/// Defines a sorted keyword enum plus the parallel `KEYWORDS`/`STRINGS`
/// tables used for binary-search keyword lookup during tokenization.
///
/// Entries must be listed in ascending ASCII order of their uppercase
/// spelling — [`Keyword::lookup`] relies on it.
macro_rules! define_keyword {
    ($(#[$doc:meta])* $name:ident => { $($kw:ident),* $(,)? }) => {
        $(#[$doc])*
        #[allow(non_camel_case_types)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum $name {
            $($kw),*
        }

        impl $name {
            /// All keywords, sorted ascending by spelling.
            pub const KEYWORDS: &'static [Self] = &[$(Self::$kw),*];
            /// The spelling of each entry in [`Self::KEYWORDS`], same order.
            pub const KEYWORD_STRINGS: &'static [&'static str] = &[$(stringify!($kw)),*];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $(Self::$kw => stringify!($kw)),*
                })
            }
        }
    };
}

define_keyword! {
    /// The fixed SQL keyword set this dialect recognises.
    ///
    /// Anything alphanumeric that doesn't case-insensitively match one of
    /// these is an ordinary identifier — including `NULL`, `TRUE`, aggregate
    /// and scalar function names, which this dialect deliberately does not
    /// reserve.
    Keyword => {
        ADD,
        ALL,
        ALTER,
        AND,
        AS,
        ASC,
        BETWEEN,
        BY,
        CASE,
        COLUMN,
        CREATE,
        DELETE,
        DENSE_RANK,
        DESC,
        DISTINCT,
        DROP,
        ELSE,
        END,
        EXCEPT,
        FROM,
        FULL,
        GROUP,
        HAVING,
        ILIKE,
        IN,
        INNER,
        INSERT,
        INTERSECT,
        INTO,
        JOIN,
        LAG,
        LEAD,
        LEFT,
        LIKE,
        LIMIT,
        NOT,
        OFFSET,
        ON,
        OR,
        ORDER,
        OUTER,
        OVER,
        PARTITION,
        RANK,
        RENAME,
        RIGHT,
        ROW_NUMBER,
        SELECT,
        SET,
        TABLE,
        THEN,
        TO,
        UNION,
        UPDATE,
        VALUES,
        WHEN,
        WHERE,
    }
}

impl Keyword {
    /// Looks up a keyword by case-insensitive spelling via binary search.
    pub fn lookup(word: &str) -> Option<Self> {
        let upper = word.to_ascii_uppercase();
        Self::KEYWORD_STRINGS
            .binary_search(&upper.as_str())
            .ok()
            .map(|idx| Self::KEYWORDS[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_strings_are_sorted() {
        let mut sorted = Keyword::KEYWORD_STRINGS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, Keyword::KEYWORD_STRINGS);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Keyword::lookup("select"), Some(Keyword::SELECT));
        assert_eq!(Keyword::lookup("Select"), Some(Keyword::SELECT));
        assert_eq!(Keyword::lookup("ROW_NUMBER"), Some(Keyword::ROW_NUMBER));
        assert_eq!(Keyword::lookup("row_number"), Some(Keyword::ROW_NUMBER));
    }

    #[test]
    fn non_keyword_is_none() {
        assert_eq!(Keyword::lookup("users"), None);
        assert_eq!(Keyword::lookup("COUNT"), None);
        assert_eq!(Keyword::lookup("NULL"), None);
    }
}
