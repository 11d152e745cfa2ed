//! First/last name derivation for the contact export schema.

use purifier_model::RawRow;

const COMBINED_NAME_HEADERS: [&str; 3] = ["name", "fullname", "full name"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactName {
    pub first: String,
    pub last: String,
}

/// Header reduced to its ASCII letters, lowercased.
fn compact_header(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn find_header(headers: &[String], matches: impl Fn(&str) -> bool) -> Option<&str> {
    headers
        .iter()
        .map(String::as_str)
        .find(|&header| matches(header))
}

/// Derives first and last name from a raw row.
///
/// Columns are searched in `headers` order, so the leftmost matching column
/// is used. Explicit `first name` / `last name` columns win. Only when
/// neither yields a value is a combined `name` column split on whitespace:
/// the first token becomes the first name, the rest the last name. Missing
/// parts fall back to `placeholder`.
pub fn contact_name(row: &RawRow, headers: &[String], placeholder: &str) -> ContactName {
    let first_column = find_header(headers, |header| compact_header(header) == "firstname");
    let last_column = find_header(headers, |header| compact_header(header) == "lastname");

    let first = non_empty(first_column.and_then(|column| row.get(column)));
    let last = non_empty(last_column.and_then(|column| row.get(column)));

    if first.is_none() && last.is_none() {
        let combined = find_header(headers, |header| {
            COMBINED_NAME_HEADERS.contains(&header.trim().to_lowercase().as_str())
        })
        .and_then(|column| non_empty(row.get(column)));
        if let Some(full) = combined {
            let mut tokens = full.split_whitespace();
            let first = tokens.next().unwrap_or(placeholder).to_string();
            let rest: Vec<&str> = tokens.collect();
            let last = if rest.is_empty() {
                placeholder.to_string()
            } else {
                rest.join(" ")
            };
            return ContactName { first, last };
        }
    }

    ContactName {
        first: first.unwrap_or(placeholder).to_string(),
        last: last.unwrap_or(placeholder).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "Applicant";

    fn name_of(columns: &[(&str, &str)]) -> ContactName {
        let headers: Vec<String> = columns.iter().map(|(header, _)| (*header).to_string()).collect();
        let row = columns
            .iter()
            .fold(RawRow::new(1), |row, (header, value)| row.with_value(*header, *value));
        contact_name(&row, &headers, PLACEHOLDER)
    }

    #[test]
    fn explicit_columns_win() {
        let name = name_of(&[
            ("First_Name", "Ann"),
            ("LAST NAME", "Lee"),
            ("Name", "Someone Else"),
        ]);
        assert_eq!(name.first, "Ann");
        assert_eq!(name.last, "Lee");
    }

    #[test]
    fn combined_column_is_split() {
        let name = name_of(&[("Full Name", "  Mary Ann  van Dyke ")]);
        assert_eq!(name.first, "Mary");
        assert_eq!(name.last, "Ann van Dyke");
    }

    #[test]
    fn single_token_keeps_placeholder_last_name() {
        let name = name_of(&[("name", "Cher")]);
        assert_eq!(name.first, "Cher");
        assert_eq!(name.last, PLACEHOLDER);
    }

    #[test]
    fn partial_explicit_name_skips_combined_column() {
        let name = name_of(&[("First Name", "Ann"), ("Name", "Other Person")]);
        assert_eq!(name.first, "Ann");
        assert_eq!(name.last, PLACEHOLDER);
    }

    #[test]
    fn no_name_columns_use_placeholder() {
        let name = name_of(&[("Email", "ann@example.com")]);
        assert_eq!(name.first, PLACEHOLDER);
        assert_eq!(name.last, PLACEHOLDER);
    }

    #[test]
    fn leftmost_combined_column_wins() {
        let name = name_of(&[("Name", "Ann Lee"), ("Full Name", "Other Person")]);
        assert_eq!(name.first, "Ann");
        assert_eq!(name.last, "Lee");

        let name = name_of(&[("Full Name", "Other Person"), ("Name", "Ann Lee")]);
        assert_eq!(name.first, "Other");
        assert_eq!(name.last, "Person");
    }
}
