use super::error::ValidationError;
use super::store::RecordStore;
use super::types::*;

/// Check the preconditions for pushing a document to the middleware.
///
/// Runs before any network call. Returns all failures found, in the order
/// the host presents them to the user.
pub fn check_invoice_fields(mv: &Move, company: &Company) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if mv.invoice_date.is_none() {
        errors.push(ValidationError::new(
            "invoice_date",
            "Warning! You must enter the \"Invoice Date\" before sending via peppol.",
        ));
    }

    if mv.invoice_date_due.is_none() {
        errors.push(ValidationError::new(
            "invoice_date_due",
            "Warning! You must enter the \"Due Date\" before sending via peppol.",
        ));
    }

    if company
        .client_number
        .as_deref()
        .is_none_or(|n| n.trim().is_empty())
    {
        errors.push(ValidationError::new(
            "company.client_number",
            format!(
                "Warning! Your company \"{}\" does not have Client Number.",
                company.name
            ),
        ));
    }

    errors
}

/// Check the preconditions for registering a partner as a debtor.
pub fn check_debtor_fields(partner: &Partner) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if partner.country_id.is_none() {
        errors.push(ValidationError::new(
            "country_id",
            "Sorry, you have not chosen the country.",
        ));
    }

    if partner
        .unique_entity_number
        .as_deref()
        .is_none_or(|u| u.trim().is_empty())
    {
        errors.push(ValidationError::new(
            "unique_entity_number",
            "Sorry, you have not entered the UEN Number.",
        ));
    }

    errors
}

/// Check that no other partner, active or archived, carries the same UEN.
pub fn check_unique_uen<S: RecordStore + ?Sized>(
    store: &S,
    partner_id: PartnerId,
    uen: &str,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if uen.is_empty() {
        return errors;
    }

    let duplicate = store
        .partners()
        .any(|p| p.id != partner_id && p.unique_entity_number.as_deref() == Some(uen));
    if duplicate {
        errors.push(ValidationError::with_rule(
            "unique_entity_number",
            format!("UEN No. '{uen}' already exists in the system!"),
            "UEN-UNIQUE",
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;
    use crate::core::store::MemoryStore;
    use chrono::NaiveDate;

    fn company() -> Company {
        CompanyBuilder::new("ACME Pte Ltd")
            .verified("1001", "access", "refresh")
            .build()
    }

    #[test]
    fn complete_invoice_passes() {
        let mv = MoveBuilder::new("INV/1")
            .invoice_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .due_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
            .build();
        assert!(check_invoice_fields(&mv, &company()).is_empty());
    }

    #[test]
    fn missing_dates_reported_in_order() {
        let mv = MoveBuilder::new("INV/1").build();
        let errors = check_invoice_fields(&mv, &company());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["invoice_date", "invoice_date_due"]);
    }

    #[test]
    fn missing_client_number() {
        let mv = MoveBuilder::new("INV/1")
            .invoice_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .due_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
            .build();
        let errors = check_invoice_fields(&mv, &CompanyBuilder::new("ACME").build());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("ACME"));
    }

    #[test]
    fn currency_is_not_checked() {
        let mv = MoveBuilder::new("INV/1")
            .currency("KES")
            .invoice_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .due_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
            .build();
        assert!(check_invoice_fields(&mv, &company()).is_empty());
    }

    #[test]
    fn debtor_needs_country_and_uen() {
        let partner = PartnerBuilder::new("Buyer").build();
        assert_eq!(check_debtor_fields(&partner).len(), 2);
    }

    #[test]
    fn duplicate_uen_against_archived_partner() {
        let mut store = MemoryStore::new(company());
        store.insert_partner(
            PartnerBuilder::new("Old")
                .unique_entity_number("53123456A")
                .archived()
                .build(),
        );
        let fresh = store.insert_partner(PartnerBuilder::new("New").build());
        let errors = check_unique_uen(&store, fresh, "53123456A");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule.as_deref(), Some("UEN-UNIQUE"));
    }

    #[test]
    fn own_uen_is_not_a_duplicate() {
        let mut store = MemoryStore::new(company());
        let id = store.insert_partner(
            PartnerBuilder::new("Self")
                .unique_entity_number("53123456A")
                .build(),
        );
        assert!(check_unique_uen(&store, id, "53123456A").is_empty());
    }
}
