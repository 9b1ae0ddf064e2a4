// ============================================================
// ENTITY SCHEMA REGISTRY
// ============================================================
// Static field schemas and sample documents per importable entity.
// Read-only configuration, built once at first access.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::domain::error::{AppError, Result};
use crate::domain::import::{EntitySchema, FieldDescriptor, FieldKind, FieldValue, SampleDocument};

static REGISTRY: Lazy<BTreeMap<String, EntitySchema>> = Lazy::new(|| {
    [contacts(), employees(), invoices(), transactions()]
        .into_iter()
        .map(|schema| (schema.entity.clone(), schema))
        .collect()
});

/// Names of every importable entity kind, in registry order
pub fn entity_kinds() -> Vec<&'static str> {
    REGISTRY.keys().map(String::as_str).collect()
}

/// The field schema for one entity kind
pub fn schema_for(entity: &str) -> Result<&'static EntitySchema> {
    REGISTRY
        .get(entity)
        .ok_or_else(|| AppError::NotFound(format!("Unknown import entity: {}", entity)))
}

/// The downloadable sample document for one entity kind
pub fn sample_for(entity: &str) -> Result<SampleDocument> {
    schema_for(entity).map(EntitySchema::sample_document)
}

fn contacts() -> EntitySchema {
    EntitySchema::new(
        "contacts",
        vec![
            FieldDescriptor::new("full_name", "Full Name", FieldKind::Text)
                .required()
                .with_aliases(&["name", "nama", "contact", "contact name"]),
            FieldDescriptor::new("email", "Email", FieldKind::Text)
                .required()
                .with_aliases(&["email address", "mail"]),
            FieldDescriptor::new("phone", "Phone", FieldKind::Text)
                .with_aliases(&["phone number", "telephone", "mobile", "telepon"]),
            FieldDescriptor::new("company", "Company", FieldKind::Text)
                .with_aliases(&["organization", "organisation", "employer", "perusahaan"]),
            FieldDescriptor::new("status", "Status", FieldKind::Enum)
                .with_enum_values(&["lead", "active", "archived"])
                .with_default(FieldValue::Enum("lead".to_string()))
                .with_aliases(&["stage", "lifecycle"]),
            FieldDescriptor::new("subscribed", "Subscribed", FieldKind::Boolean)
                .with_default(FieldValue::Boolean(true))
                .with_aliases(&["newsletter", "opt in"]),
        ],
        "Full Name,Email,Phone,Company,Status,Subscribed\n\
         Sari Dewi,sari@majujaya.example,+62 812 3456 7890,PT Maju Jaya,active,yes\n\
         \"Santoso, Budi\",budi@sentosa.example,,CV Sentosa,lead,no\n",
    )
}

fn employees() -> EntitySchema {
    EntitySchema::new(
        "employees",
        vec![
            FieldDescriptor::new("first_name", "First Name", FieldKind::Text)
                .required()
                .with_aliases(&["given name", "forename"]),
            FieldDescriptor::new("last_name", "Last Name", FieldKind::Text)
                .required()
                .with_aliases(&["surname", "family name"]),
            FieldDescriptor::new("email", "Email", FieldKind::Text)
                .required()
                .with_aliases(&["work email", "email address"]),
            FieldDescriptor::new("department", "Department", FieldKind::Text)
                .with_aliases(&["dept", "team", "division"]),
            FieldDescriptor::new("start_date", "Start Date", FieldKind::Date)
                .required()
                .with_aliases(&["hire date", "joined", "tanggal masuk"]),
            FieldDescriptor::new("salary", "Salary", FieldKind::Number)
                .with_aliases(&["annual salary", "gaji", "compensation"]),
            FieldDescriptor::new("full_time", "Full Time", FieldKind::Boolean)
                .with_default(FieldValue::Boolean(true))
                .with_aliases(&["permanent", "ft"]),
        ],
        "First Name,Last Name,Email,Department,Start Date,Salary,Full Time\n\
         Rina,Wijaya,rina.wijaya@kantor.example,Engineering,2023-04-17,95000,yes\n\
         Agus,Pratama,agus.pratama@kantor.example,Sales,2024-01-08,72500,no\n",
    )
}

fn invoices() -> EntitySchema {
    EntitySchema::new(
        "invoices",
        vec![
            FieldDescriptor::new("invoice_number", "Invoice Number", FieldKind::Text)
                .required()
                .with_aliases(&["invoice no", "invoice id", "number", "reference"]),
            FieldDescriptor::new("customer", "Customer", FieldKind::Text)
                .required()
                .with_aliases(&["client", "customer name", "billed to", "pelanggan"]),
            FieldDescriptor::new("issue_date", "Issue Date", FieldKind::Date)
                .required()
                .with_aliases(&["date", "invoice date", "issued", "tanggal"]),
            FieldDescriptor::new("due_date", "Due Date", FieldKind::Date)
                .with_aliases(&["due", "payment due"]),
            FieldDescriptor::new("amount", "Amount", FieldKind::Number)
                .required()
                .with_aliases(&["total", "amount due", "jumlah"]),
            FieldDescriptor::new("currency", "Currency", FieldKind::Enum)
                .with_enum_values(&["idr", "usd", "eur", "gbp"])
                .with_default(FieldValue::Enum("idr".to_string()))
                .with_aliases(&["ccy", "mata uang"]),
            FieldDescriptor::new("status", "Status", FieldKind::Enum)
                .with_enum_values(&["draft", "sent", "paid", "overdue"])
                .with_default(FieldValue::Enum("draft".to_string()))
                .with_aliases(&["state", "payment status"]),
        ],
        "Invoice Number,Customer,Issue Date,Due Date,Amount,Currency,Status\n\
         INV-2025-0001,PT Maju Jaya,2025-06-01,2025-06-15,12500000,idr,sent\n\
         INV-2025-0002,CV Sentosa,2025-06-03,,1850.75,usd,paid\n",
    )
}

fn transactions() -> EntitySchema {
    EntitySchema::new(
        "transactions",
        vec![
            FieldDescriptor::new("date", "Date", FieldKind::Date)
                .required()
                .with_aliases(&["transaction date", "posted", "tanggal"]),
            FieldDescriptor::new("description", "Description", FieldKind::Text)
                .required()
                .with_aliases(&["memo", "details", "narrative", "keterangan"]),
            FieldDescriptor::new("amount", "Amount", FieldKind::Number)
                .required()
                .with_aliases(&["value", "jumlah"]),
            FieldDescriptor::new("entry_type", "Entry Type", FieldKind::Enum)
                .required()
                .with_enum_values(&["debit", "credit"])
                .with_aliases(&["type", "direction", "dc"]),
            FieldDescriptor::new("account", "Account", FieldKind::Text)
                .with_aliases(&["account name", "account code", "ledger"]),
            FieldDescriptor::new("reconciled", "Reconciled", FieldKind::Boolean)
                .with_default(FieldValue::Boolean(false))
                .with_aliases(&["cleared", "matched"]),
        ],
        "Date,Description,Amount,Entry Type,Account,Reconciled\n\
         2025-07-01,\"Office supplies, July\",450000,debit,Operating Expenses,yes\n\
         2025-07-02,Client payment INV-2025-0001,12500000,credit,Accounts Receivable,no\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::{header_resolver, row_validator};
    use crate::infrastructure::csv::CsvTokenizer;

    #[test]
    fn test_registry_exposes_all_entity_kinds() {
        let kinds = entity_kinds();

        assert_eq!(
            kinds,
            vec!["contacts", "employees", "invoices", "transactions"]
        );
    }

    #[test]
    fn test_unknown_entity_is_not_found() {
        let err = schema_for("spaceships").unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_every_schema_satisfies_invariants() {
        for kind in entity_kinds() {
            let schema = schema_for(kind).unwrap();
            schema.validate().unwrap();
        }
    }

    #[test]
    fn test_sample_document_metadata() {
        let sample = sample_for("contacts").unwrap();

        assert_eq!(sample.file_name, "contacts-sample.csv");
        assert_eq!(sample.content_type, "text/csv");
        assert!(sample.content.starts_with("Full Name,"));
    }

    #[test]
    fn test_every_sample_imports_cleanly_against_its_own_schema() {
        for kind in entity_kinds() {
            let schema = schema_for(kind).unwrap();
            let parse = CsvTokenizer::new().parse(&schema.sample);

            assert!(parse.is_clean(), "{} sample has parse errors", kind);
            assert!(parse.total_rows > 0, "{} sample has no data rows", kind);

            let mapping = header_resolver::resolve(&parse.headers, &schema.fields);
            for field in &schema.fields {
                assert!(
                    mapping.header_for(&field.key).is_some(),
                    "{} sample does not map field {}",
                    kind,
                    field.key
                );
            }

            for row in &parse.rows {
                let outcome =
                    row_validator::validate_row(&mapping, &parse.headers, row, &schema.fields);
                assert!(
                    outcome.valid,
                    "{} sample row failed validation: {:?}",
                    kind, outcome.errors
                );
            }
        }
    }
}
