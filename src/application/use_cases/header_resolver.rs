// ============================================================
// HEADER RESOLVER
// ============================================================
// Schema-driven automatic column mapping via normalized alias matching

use crate::domain::import::{ColumnMapping, FieldDescriptor};

/// Normalize a header, key, label or alias for matching: lowercase and
/// strip every character outside [a-z0-9].
pub fn normalize_header(s: &str) -> String {
    s.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Map document headers onto schema fields.
///
/// For each descriptor in schema order the candidate set is its key,
/// label and every alias, normalized; the first document header (in
/// document order) whose normalized form is in the set binds and the
/// search for that field stops. Headers are claimed exclusively: a
/// header bound to one field is withheld from later fields. Fields with
/// no match stay unmapped. Deterministic and pure.
pub fn resolve(csv_headers: &[String], fields: &[FieldDescriptor]) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();

    let normalized_headers: Vec<String> = csv_headers.iter().map(|h| normalize_header(h)).collect();

    for field in fields {
        let mut candidates: Vec<String> = Vec::with_capacity(2 + field.aliases.len());
        candidates.push(normalize_header(&field.key));
        candidates.push(normalize_header(&field.label));
        for alias in &field.aliases {
            candidates.push(normalize_header(alias));
        }

        for (header, normalized) in csv_headers.iter().zip(&normalized_headers) {
            if normalized.is_empty() || mapping.claims_header(header) {
                continue;
            }
            if candidates.iter().any(|c| c == normalized) {
                mapping.bind(&field.key, header);
                break;
            }
        }
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::import::FieldKind;

    fn field(key: &str, label: &str, aliases: &[&str]) -> FieldDescriptor {
        FieldDescriptor::new(key, label, FieldKind::Text).with_aliases(aliases)
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_matches_key_label_and_alias() {
        let fields = vec![
            field("email", "Email", &[]),
            field("full_name", "Full Name", &["name"]),
            field("phone", "Phone", &["telephone"]),
        ];
        let mapping = resolve(&headers(&["Name", "E-Mail", "Telephone"]), &fields);

        assert_eq!(mapping.header_for("email"), Some("E-Mail"));
        assert_eq!(mapping.header_for("full_name"), Some("Name"));
        assert_eq!(mapping.header_for("phone"), Some("Telephone"));
    }

    #[test]
    fn test_normalization_ignores_case_spaces_punctuation() {
        let fields = vec![field("start_date", "Start Date", &["hire date"])];
        let mapping = resolve(&headers(&["  HIRE-DATE !! "]), &fields);

        assert_eq!(mapping.header_for("start_date"), Some("  HIRE-DATE !! "));
    }

    #[test]
    fn test_first_matching_header_wins() {
        let fields = vec![field("email", "Email", &["mail"])];
        let mapping = resolve(&headers(&["Mail", "Email"]), &fields);

        assert_eq!(mapping.header_for("email"), Some("Mail"));
    }

    #[test]
    fn test_unmatched_field_stays_unmapped() {
        let fields = vec![field("email", "Email", &[]), field("salary", "Salary", &[])];
        let mapping = resolve(&headers(&["Email"]), &fields);

        assert_eq!(mapping.header_for("email"), Some("Email"));
        assert_eq!(mapping.header_for("salary"), None);
    }

    #[test]
    fn test_headers_claimed_exclusively() {
        // Both fields recognize "Name"; only the first binds it
        let fields = vec![
            field("full_name", "Full Name", &["name"]),
            field("company", "Company", &["name"]),
        ];
        let mapping = resolve(&headers(&["Name"]), &fields);

        assert_eq!(mapping.header_for("full_name"), Some("Name"));
        assert_eq!(mapping.header_for("company"), None);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let fields = vec![
            field("a", "Alpha", &["first"]),
            field("b", "Beta", &["second"]),
        ];
        let csv = headers(&["First", "Second", "Third"]);

        let once = resolve(&csv, &fields);
        let twice = resolve(&csv, &fields);

        assert_eq!(once.header_for("a"), twice.header_for("a"));
        assert_eq!(once.header_for("b"), twice.header_for("b"));
        assert_eq!(once.len(), twice.len());
    }
}
