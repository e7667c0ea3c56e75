use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::status::EdiStatus;
use super::types::*;

/// Builder for host documents (invoices, credit notes, vendor bills).
///
/// ```
/// use peppol_edi::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = MoveBuilder::new("INV/2024/0001")
///     .invoice_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
///     .due_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
///     .add_line(MoveLineBuilder::new(1, "Consulting", dec!(2), dec!(100)).tax(dec!(16)).build())
///     .build();
///
/// assert_eq!(invoice.amount_total, dec!(216));
/// assert_eq!(invoice.amount_residual, dec!(216));
/// ```
pub struct MoveBuilder {
    name: String,
    move_type: MoveType,
    partner_id: Option<PartnerId>,
    currency_code: String,
    invoice_date: Option<NaiveDate>,
    invoice_date_due: Option<NaiveDate>,
    lines: Vec<MoveLine>,
    amount_residual: Option<Decimal>,
    edi_status: Option<EdiStatus>,
    external_invoice_id: Option<String>,
    external_invoice_uuid: Option<String>,
}

impl MoveBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            move_type: MoveType::OutInvoice,
            partner_id: None,
            currency_code: "SGD".to_string(),
            invoice_date: None,
            invoice_date_due: None,
            lines: Vec::new(),
            amount_residual: None,
            edi_status: None,
            external_invoice_id: None,
            external_invoice_uuid: None,
        }
    }

    pub fn move_type(mut self, move_type: MoveType) -> Self {
        self.move_type = move_type;
        self
    }

    pub fn partner(mut self, partner_id: PartnerId) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    pub fn invoice_date(mut self, date: NaiveDate) -> Self {
        self.invoice_date = Some(date);
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.invoice_date_due = Some(date);
        self
    }

    pub fn add_line(mut self, line: MoveLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Amount still open. Defaults to the full total.
    pub fn residual(mut self, amount: Decimal) -> Self {
        self.amount_residual = Some(amount);
        self
    }

    pub fn status(mut self, status: EdiStatus) -> Self {
        self.edi_status = Some(status);
        self
    }

    pub fn external_id(mut self, id: impl Into<String>) -> Self {
        self.external_invoice_id = Some(id.into());
        self
    }

    pub fn external_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.external_invoice_uuid = Some(uuid.into());
        self
    }

    /// Build the move. The total is the sum of the line totals.
    ///
    /// # Panics
    ///
    /// Panics if the total overflows; use [`MoveBuilder::checked_build`]
    /// for amounts that come from outside the host.
    pub fn build(self) -> Move {
        let amount_total: Decimal = self.lines.iter().map(|l| l.price_total).sum();
        self.finish(amount_total)
    }

    /// Build the move, or `None` if the total overflows.
    pub fn checked_build(self) -> Option<Move> {
        let amount_total = self
            .lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.price_total))?;
        Some(self.finish(amount_total))
    }

    fn finish(self, amount_total: Decimal) -> Move {
        Move {
            id: MoveId::default(),
            name: self.name,
            move_type: self.move_type,
            partner_id: self.partner_id,
            currency_code: self.currency_code,
            invoice_date: self.invoice_date,
            invoice_date_due: self.invoice_date_due,
            amount_total,
            amount_residual: self.amount_residual.unwrap_or(amount_total),
            lines: self.lines,
            edi_status: self.edi_status,
            external_invoice_id: self.external_invoice_id,
            external_invoice_uuid: self.external_invoice_uuid,
            sent_via_peppol: false,
            messages: Vec::new(),
        }
    }
}

/// Builder for invoice lines.
pub struct MoveLineBuilder {
    id: u64,
    product_id: Option<ProductId>,
    description: String,
    quantity: Decimal,
    price_unit: Decimal,
    tax: Decimal,
}

impl MoveLineBuilder {
    pub fn new(
        id: u64,
        description: impl Into<String>,
        quantity: Decimal,
        price_unit: Decimal,
    ) -> Self {
        Self {
            id,
            product_id: None,
            description: description.into(),
            quantity,
            price_unit,
            tax: Decimal::ZERO,
        }
    }

    pub fn product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Absolute tax amount added on top of the subtotal.
    pub fn tax(mut self, amount: Decimal) -> Self {
        self.tax = amount;
        self
    }

    /// # Panics
    ///
    /// Panics if the subtotal or total overflows.
    pub fn build(self) -> MoveLine {
        let price_subtotal = self.quantity * self.price_unit;
        let price_total = price_subtotal + self.tax;
        self.finish(price_subtotal, price_total)
    }

    /// Build the line, or `None` if the subtotal or total overflows.
    pub fn checked_build(self) -> Option<MoveLine> {
        let price_subtotal = self.quantity.checked_mul(self.price_unit)?;
        let price_total = price_subtotal.checked_add(self.tax)?;
        Some(self.finish(price_subtotal, price_total))
    }

    fn finish(self, price_subtotal: Decimal, price_total: Decimal) -> MoveLine {
        MoveLine {
            id: self.id,
            product_id: self.product_id,
            description: self.description,
            quantity: self.quantity,
            price_unit: self.price_unit,
            price_subtotal,
            price_total,
        }
    }
}

/// Builder for customers and vendors.
pub struct PartnerBuilder {
    partner: Partner,
}

impl PartnerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            partner: Partner {
                name: name.into(),
                active: true,
                ..Partner::default()
            },
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.partner.street = Some(street.into());
        self
    }

    pub fn street2(mut self, street: impl Into<String>) -> Self {
        self.partner.street2 = Some(street.into());
        self
    }

    pub fn zip(mut self, zip: impl Into<String>) -> Self {
        self.partner.zip = Some(zip.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.partner.city = Some(city.into());
        self
    }

    pub fn country(mut self, country_id: CountryId) -> Self {
        self.partner.country_id = Some(country_id);
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.partner.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.partner.phone = Some(phone.into());
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.partner.lang = Some(lang.into());
        self
    }

    pub fn unique_entity_number(mut self, uen: impl Into<String>) -> Self {
        self.partner.unique_entity_number = Some(uen.into());
        self
    }

    pub fn debtor(mut self, debtor_id: i64, client_id: i64) -> Self {
        self.partner.debtor_id = Some(debtor_id);
        self.partner.client_id = Some(client_id);
        self
    }

    pub fn creditor_id(mut self, creditor_id: i64) -> Self {
        self.partner.creditor_id = Some(creditor_id);
        self
    }

    pub fn archived(mut self) -> Self {
        self.partner.active = false;
        self
    }

    pub fn build(self) -> Partner {
        self.partner
    }
}

/// Builder for the credential-owning company.
pub struct CompanyBuilder {
    company: Company,
}

impl CompanyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            company: Company {
                name: name.into(),
                peppol_enabled: true,
                ..Company::default()
            },
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.company.email = Some(email.into());
        self
    }

    pub fn unique_entity_number(mut self, uen: impl Into<String>) -> Self {
        self.company.unique_entity_number = Some(uen.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>, mode: Mode) -> Self {
        self.company.api_key = Some(key.into());
        self.company.mode = Some(mode);
        self
    }

    pub fn edi_url(mut self, url: impl Into<String>) -> Self {
        self.company.edi_url = Some(url.into());
        self
    }

    /// Mark the company as already verified with the given session.
    pub fn verified(
        mut self,
        client_number: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        self.company.client_number = Some(client_number.into());
        self.company.access_token = Some(access_token.into());
        self.company.refresh_token = Some(refresh_token.into());
        self.company.verification_status = VerificationStatus::Verified;
        self
    }

    pub fn peppol_enabled(mut self, enabled: bool) -> Self {
        self.company.peppol_enabled = enabled;
        self
    }

    pub fn build(self) -> Company {
        self.company
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_amounts() {
        let line = MoveLineBuilder::new(1, "Widget", dec!(3), dec!(12.50))
            .tax(dec!(3.38))
            .build();
        assert_eq!(line.price_subtotal, dec!(37.50));
        assert_eq!(line.price_total, dec!(40.88));
        assert_eq!(line.tax_amount(), dec!(3.38));
    }

    #[test]
    fn residual_defaults_to_total() {
        let mv = MoveBuilder::new("INV/1")
            .add_line(MoveLineBuilder::new(1, "A", dec!(1), dec!(10)).build())
            .add_line(MoveLineBuilder::new(2, "B", dec!(2), dec!(5)).build())
            .build();
        assert_eq!(mv.amount_total, dec!(20));
        assert_eq!(mv.amount_residual, dec!(20));
        assert_eq!(mv.amount_paid(), dec!(0));
    }

    #[test]
    fn checked_build_rejects_overflow() {
        let huge = MoveLineBuilder::new(1, "Huge", Decimal::MAX, dec!(2));
        assert!(huge.checked_build().is_none());

        let max = MoveLineBuilder::new(1, "A", dec!(1), Decimal::MAX).build();
        let one = MoveLineBuilder::new(2, "B", dec!(1), dec!(1)).build();
        assert!(MoveBuilder::new("INV/1").add_line(max).add_line(one).checked_build().is_none());

        let ok = MoveLineBuilder::new(1, "Widget", dec!(3), dec!(12.50)).checked_build();
        assert_eq!(ok.map(|l| l.price_subtotal), Some(dec!(37.50)));
    }

    #[test]
    fn partner_defaults_to_active() {
        assert!(PartnerBuilder::new("ACME").build().active);
        assert!(!PartnerBuilder::new("ACME").archived().build().active);
    }
}
