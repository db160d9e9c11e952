//! Just enough CQL to find and interpret a `sortBy` clause.

/// Direction of a sort on the `id` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdSort {
    /// `sortBy id`, `sortBy id asc`, `sortBy id/sort.ascending`, ...
    Ascending,
    /// `sortBy id desc`, `sortBy id/sort.descending`, ...
    Descending,
}

const SORT_KEYWORD: &str = "sortby";

/// Splits a CQL query into its filter and the text after `sortBy`.
///
/// The keyword matches in any case but only as a whole word.
pub fn split_sort(query: &str) -> (&str, Option<&str>) {
    let lower = query.to_ascii_lowercase();
    let bytes = lower.as_bytes();

    let mut from = 0;
    while let Some(found) = lower[from..].find(SORT_KEYWORD) {
        let start = from + found;
        let end = start + SORT_KEYWORD.len();
        let starts_word = start == 0 || bytes[start - 1].is_ascii_whitespace();
        let ends_word = end == bytes.len() || bytes[end].is_ascii_whitespace();
        if starts_word && ends_word {
            return (query[..start].trim(), Some(query[end..].trim()));
        }
        from = end;
    }

    (query.trim(), None)
}

/// Interprets a sort clause that sorts only by `id`.
///
/// Returns `None` for any other column or for multiple sort keys.
pub fn parse_id_sort(sort: &str) -> Option<IdSort> {
    let lower = sort.to_ascii_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();

    match tokens.as_slice() {
        ["id" | "id/sort.asc" | "id/sort.ascending"] | ["id", "asc" | "ascending"] => {
            Some(IdSort::Ascending)
        }
        ["id/sort.desc" | "id/sort.descending"] | ["id", "desc" | "descending"] => {
            Some(IdSort::Descending)
        }
        _ => None,
    }
}

/// Interprets an ERM `sort` value that sorts only by `id`.
pub fn parse_erm_id_sort(sort: &str) -> Option<IdSort> {
    match sort.trim().to_ascii_lowercase().as_str() {
        "id" | "id;asc" => Some(IdSort::Ascending),
        "id;desc" => Some(IdSort::Descending),
        _ => None,
    }
}

/// Returns `true` for filters that match every record.
pub fn matches_all(filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || filter.eq_ignore_ascii_case(super::ALL_RECORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sort_any_case() {
        for query in [
            "name=~A sortBy index",
            "name=~A sortby index",
            "name=~A SORTBY index",
        ] {
            assert_eq!(split_sort(query), ("name=~A", Some("index")));
        }
    }

    #[test]
    fn test_split_sort_without_clause() {
        assert_eq!(split_sort(" simple query "), ("simple query", None));
    }

    #[test]
    fn test_split_sort_requires_whole_word() {
        assert_eq!(
            split_sort("notes=\"sortbyfoo\""),
            ("notes=\"sortbyfoo\"", None)
        );
        assert_eq!(split_sort("sortBy id"), ("", Some("id")));
    }

    #[test]
    fn test_parse_id_sort_ascending_forms() {
        for sort in [
            "id",
            "id asc",
            "id ASC",
            "id/sort.ascending",
            "id/sort.asc",
        ] {
            assert_eq!(parse_id_sort(sort), Some(IdSort::Ascending), "{sort}");
        }
    }

    #[test]
    fn test_parse_id_sort_descending_forms() {
        for sort in ["id desc", "id DESC", "id/sort.descending", "id/sort.desc"] {
            assert_eq!(parse_id_sort(sort), Some(IdSort::Descending), "{sort}");
        }
    }

    #[test]
    fn test_parse_id_sort_rejects_other_columns() {
        assert_eq!(parse_id_sort("index"), None);
        assert_eq!(parse_id_sort("id name"), None);
        assert_eq!(parse_id_sort("name/sort.descending"), None);
    }

    #[test]
    fn test_parse_erm_id_sort() {
        assert_eq!(parse_erm_id_sort("id;asc"), Some(IdSort::Ascending));
        assert_eq!(parse_erm_id_sort("ID;DESC"), Some(IdSort::Descending));
        assert_eq!(parse_erm_id_sort("index;desc"), None);
    }

    #[test]
    fn test_matches_all() {
        assert!(matches_all(""));
        assert!(matches_all("cql.allRecords=1"));
        assert!(matches_all(" CQL.ALLRECORDS=1 "));
        assert!(!matches_all("name=~A"));
    }
}
