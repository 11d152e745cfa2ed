//! Header-based detection of the email, phone, and name columns.

use purifier_model::{ColumnKeywords, ColumnMapping};

/// Column roles in detection priority order.
///
/// A header claimed by an earlier role is not offered to later roles, so a
/// header such as `email_name` resolves to the email column only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRole {
    Email,
    Phone,
    Name,
}

const ROLE_PRIORITY: [ColumnRole; 3] = [ColumnRole::Email, ColumnRole::Phone, ColumnRole::Name];

fn role_keywords(keywords: &ColumnKeywords, role: ColumnRole) -> Vec<String> {
    let source = match role {
        ColumnRole::Email => &keywords.email,
        ColumnRole::Phone => &keywords.phone,
        ColumnRole::Name => &keywords.name,
    };
    source
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

/// Resolves the column mapping for one input set.
///
/// Each role gets the first header, in original order, containing any of its
/// keywords (case-insensitive). Roles without a match stay `None`.
pub fn detect_columns(headers: &[String], keywords: &ColumnKeywords) -> ColumnMapping {
    let lowered: Vec<String> = headers.iter().map(|header| header.to_lowercase()).collect();
    let mut claimed = vec![false; headers.len()];
    let mut mapping = ColumnMapping::default();

    for role in ROLE_PRIORITY {
        let needles = role_keywords(keywords, role);
        let found = lowered.iter().enumerate().find(|(idx, header)| {
            !claimed[*idx] && needles.iter().any(|needle| header.contains(needle.as_str()))
        });
        let Some((idx, _)) = found else {
            continue;
        };
        claimed[idx] = true;
        let header = Some(headers[idx].clone());
        match role {
            ColumnRole::Email => mapping.email_column = header,
            ColumnRole::Phone => mapping.phone_column = header,
            ColumnRole::Name => mapping.name_column = header,
        }
    }
    mapping
}
