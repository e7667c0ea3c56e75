//! Host persistence seam.
//!
//! The accounting host owns every record. The integration only reads the
//! fields it needs and writes back the fields the middleware decides.
//! [`RecordStore`] is the narrow interface for that; [`MemoryStore`] is a
//! self-contained implementation for embedding and tests.

use std::collections::BTreeMap;

use super::iso;
use super::types::*;

/// Access to the host's records.
///
/// Implementors provide storage primitives; lookups by business key are
/// provided on top of the iterators.
pub trait RecordStore {
    fn company(&self) -> &Company;
    fn company_mut(&mut self) -> &mut Company;

    fn moves(&self) -> Box<dyn Iterator<Item = &Move> + '_>;
    fn get_move(&self, id: MoveId) -> Option<&Move>;
    fn get_move_mut(&mut self, id: MoveId) -> Option<&mut Move>;
    /// Insert a new move; the store assigns and returns its id.
    fn insert_move(&mut self, mv: Move) -> MoveId;

    /// All partners, archived ones included.
    fn partners(&self) -> Box<dyn Iterator<Item = &Partner> + '_>;
    fn get_partner(&self, id: PartnerId) -> Option<&Partner>;
    fn get_partner_mut(&mut self, id: PartnerId) -> Option<&mut Partner>;
    /// Insert a new partner; the store assigns and returns its id.
    fn insert_partner(&mut self, partner: Partner) -> PartnerId;

    fn products(&self) -> Box<dyn Iterator<Item = &Product> + '_>;
    fn countries(&self) -> Box<dyn Iterator<Item = &Country> + '_>;
    fn states(&self) -> Box<dyn Iterator<Item = &CountryState> + '_>;

    /// Moves already pushed to (or pulled from) the middleware.
    fn moves_with_external_id(&self) -> Vec<MoveId> {
        self.moves()
            .filter(|m| m.external_invoice_id.is_some())
            .map(|m| m.id)
            .collect()
    }

    fn move_by_external_id(&self, external_id: &str) -> Option<MoveId> {
        self.moves()
            .find(|m| m.external_invoice_id.as_deref() == Some(external_id))
            .map(|m| m.id)
    }

    fn partner_by_creditor_id(&self, creditor_id: i64) -> Option<PartnerId> {
        self.partners()
            .find(|p| p.creditor_id == Some(creditor_id))
            .map(|p| p.id)
    }

    /// First partner, active or archived, carrying this UEN.
    fn partner_by_uen(&self, uen: &str) -> Option<PartnerId> {
        self.partners()
            .find(|p| p.unique_entity_number.as_deref() == Some(uen))
            .map(|p| p.id)
    }

    /// Case-insensitive substring match on partner name or UEN.
    fn search_partners(&self, query: &str) -> Vec<PartnerId> {
        let needle = query.to_lowercase();
        self.partners()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.unique_entity_number
                        .as_deref()
                        .is_some_and(|u| u.to_lowercase().contains(&needle))
            })
            .map(|p| p.id)
            .collect()
    }

    fn product_by_name(&self, name: &str) -> Option<ProductId> {
        self.products().find(|p| p.name == name).map(|p| p.id)
    }

    fn product_name(&self, id: ProductId) -> Option<&str> {
        self.products()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    fn country_by_code(&self, code: &str) -> Option<CountryId> {
        self.countries().find(|c| c.code == code).map(|c| c.id)
    }

    fn country_code(&self, id: CountryId) -> Option<&str> {
        self.countries()
            .find(|c| c.id == id)
            .map(|c| c.code.as_str())
    }

    fn state_by_name(&self, name: &str) -> Option<StateId> {
        self.states().find(|s| s.name == name).map(|s| s.id)
    }
}

/// In-memory [`RecordStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    company: Company,
    moves: BTreeMap<MoveId, Move>,
    partners: BTreeMap<PartnerId, Partner>,
    products: Vec<Product>,
    countries: Vec<Country>,
    states: Vec<CountryState>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new(company: Company) -> Self {
        Self {
            company,
            next_id: 1,
            ..Self::default()
        }
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// A store pre-seeded with every ISO 3166-1 country.
    pub fn with_iso_countries(company: Company) -> Self {
        let mut store = Self::new(company);
        for (code, name) in iso::countries() {
            store.add_country(code, name);
        }
        store
    }

    pub fn add_product(&mut self, name: impl Into<String>) -> ProductId {
        let id = ProductId(self.allocate());
        self.products.push(Product {
            id,
            name: name.into(),
        });
        id
    }

    /// Register a country under whatever code the host uses, ISO or not.
    pub fn add_country(&mut self, code: impl Into<String>, name: impl Into<String>) -> CountryId {
        let id = CountryId(self.allocate());
        self.countries.push(Country {
            id,
            code: code.into(),
            name: name.into(),
        });
        id
    }

    pub fn add_state(
        &mut self,
        country_id: CountryId,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> StateId {
        let id = StateId(self.allocate());
        self.states.push(CountryState {
            id,
            country_id,
            code: code.into(),
            name: name.into(),
        });
        id
    }
}

impl RecordStore for MemoryStore {
    fn company(&self) -> &Company {
        &self.company
    }

    fn company_mut(&mut self) -> &mut Company {
        &mut self.company
    }

    fn moves(&self) -> Box<dyn Iterator<Item = &Move> + '_> {
        Box::new(self.moves.values())
    }

    fn get_move(&self, id: MoveId) -> Option<&Move> {
        self.moves.get(&id)
    }

    fn get_move_mut(&mut self, id: MoveId) -> Option<&mut Move> {
        self.moves.get_mut(&id)
    }

    fn insert_move(&mut self, mut mv: Move) -> MoveId {
        let id = MoveId(self.allocate());
        mv.id = id;
        self.moves.insert(id, mv);
        id
    }

    fn partners(&self) -> Box<dyn Iterator<Item = &Partner> + '_> {
        Box::new(self.partners.values())
    }

    fn get_partner(&self, id: PartnerId) -> Option<&Partner> {
        self.partners.get(&id)
    }

    fn get_partner_mut(&mut self, id: PartnerId) -> Option<&mut Partner> {
        self.partners.get_mut(&id)
    }

    fn insert_partner(&mut self, mut partner: Partner) -> PartnerId {
        let id = PartnerId(self.allocate());
        partner.id = id;
        self.partners.insert(id, partner);
        id
    }

    fn products(&self) -> Box<dyn Iterator<Item = &Product> + '_> {
        Box::new(self.products.iter())
    }

    fn countries(&self) -> Box<dyn Iterator<Item = &Country> + '_> {
        Box::new(self.countries.iter())
    }

    fn states(&self) -> Box<dyn Iterator<Item = &CountryState> + '_> {
        Box::new(self.states.iter())
    }
}
