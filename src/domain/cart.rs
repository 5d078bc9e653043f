//! Cart aggregate: one per principal, ordered lines keyed by a deterministic
//! (owner, product, unit type) identity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::DomainError;
use super::pricing::{Category, Pricing, UnitType};

/// Namespace for derived cart-line ids.
const CART_LINE_NS: Uuid = Uuid::from_u128(0x8f2c_41d6_7a0b_4e39_9c15_d2a6_30b7_51e4);

/// Derives the identity of a cart line. Adding the same product twice with
/// the same unit type lands on the same id; a different unit type is a
/// distinct line. The owner is part of the derivation so ids can serve as a
/// global primary key.
pub fn line_id(owner: Uuid, product_id: Uuid, unit_type: Option<UnitType>) -> Uuid {
    let mut name = [0u8; 33];
    name[..16].copy_from_slice(owner.as_bytes());
    name[16..32].copy_from_slice(product_id.as_bytes());
    name[32] = match unit_type {
        None => 0,
        Some(UnitType::Piece) => 1,
        Some(UnitType::Packet) => 2,
    };
    Uuid::new_v5(&CART_LINE_NS, &name)
}

/// What the cart needs to know about a product at add-time.
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub category: Category,
    pub pricing: Pricing,
}

/// One row of a cart: product snapshot, optional unit type, quantity and the
/// unit price captured at the last add or unit-type change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub category: Category,
    pub unit_type: Option<UnitType>,
    pub quantity: i32,
    pub unit_price: i64,
}

impl CartLine {
    pub fn line_total(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

/// The cart for a single principal. Mutations keep two invariants: no two
/// lines share an id, and no quantity ever drops below 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    owner: Uuid,
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(owner: Uuid) -> Self {
        Self {
            owner,
            lines: Vec::new(),
        }
    }

    pub fn from_lines(owner: Uuid, lines: Vec<CartLine>) -> Self {
        Self { owner, lines }
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Adds a product. An existing line with the same derived id has its
    /// quantity incremented; otherwise a new line is appended with the unit
    /// price snapshotted now.
    pub fn add(
        &mut self,
        product: &ProductSnapshot,
        quantity: i32,
        requested_unit: Option<UnitType>,
    ) -> Result<&CartLine, DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        let unit_type = product.pricing.select_unit_type(requested_unit)?;
        let id = line_id(self.owner, product.product_id, unit_type);

        let pos = match self.lines.iter().position(|line| line.id == id) {
            Some(pos) => {
                self.lines[pos].quantity += quantity;
                pos
            }
            None => {
                self.lines.push(CartLine {
                    id,
                    product_id: product.product_id,
                    name: product.name.clone(),
                    image: product.image.clone(),
                    category: product.category,
                    unit_type,
                    quantity,
                    unit_price: product.pricing.resolve(unit_type),
                });
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[pos])
    }

    /// Sets a line's quantity. Values below 1 are rejected and leave the
    /// line untouched. The price snapshot is not re-resolved.
    pub fn update_quantity(&mut self, id: Uuid, quantity: i32) -> Result<&CartLine, DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        let pos = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(DomainError::LineNotFound)?;
        self.lines[pos].quantity = quantity;
        Ok(&self.lines[pos])
    }

    /// Switches a line's unit type and re-resolves its price snapshot in
    /// place. The line keeps its id: identity derivation is an add-time rule
    /// only. Book lines have no unit type to switch.
    pub fn update_unit_type(
        &mut self,
        id: Uuid,
        requested_unit: UnitType,
        pricing: &Pricing,
    ) -> Result<&CartLine, DomainError> {
        let pos = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(DomainError::LineNotFound)?;
        if matches!(pricing, Pricing::Book { .. }) {
            return Err(DomainError::UnitTypeNotApplicable);
        }
        let unit_type = pricing.select_unit_type(Some(requested_unit))?;
        let line = &mut self.lines[pos];
        line.unit_type = unit_type;
        line.unit_price = pricing.resolve(unit_type);
        Ok(&self.lines[pos])
    }

    /// Removes a line. Missing ids are a no-op, so the operation is
    /// idempotent. Returns whether anything was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Sum of line totals, recomputed on every call.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_book(price_to_sell: Option<i64>, market_price: Option<i64>) -> ProductSnapshot {
        ProductSnapshot {
            product_id: Uuid::new_v4(),
            name: "The Rust Programming Language".into(),
            image: Some("trpl.jpg".into()),
            category: Category::Book,
            pricing: Pricing::Book {
                price_to_sell,
                market_price,
                price: 700,
            },
        }
    }

    fn some_stationery(per_piece: Option<i64>, per_packet: Option<i64>) -> ProductSnapshot {
        ProductSnapshot {
            product_id: Uuid::new_v4(),
            name: "Ballpoint Pen".into(),
            image: None,
            category: Category::Stationery,
            pricing: Pricing::Unit {
                per_piece,
                per_packet,
                price: 20,
            },
        }
    }

    #[test]
    fn adding_same_product_and_unit_merges_quantities() {
        let mut cart = Cart::new(Uuid::new_v4());
        let pen = some_stationery(Some(15), Some(120));

        cart.add(&pen, 2, Some(UnitType::Piece)).unwrap();
        cart.add(&pen, 3, Some(UnitType::Piece)).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn different_unit_types_are_distinct_lines() {
        let mut cart = Cart::new(Uuid::new_v4());
        let pen = some_stationery(Some(15), Some(120));

        cart.add(&pen, 1, Some(UnitType::Piece)).unwrap();
        cart.add(&pen, 1, Some(UnitType::Packet)).unwrap();

        assert_eq!(cart.len(), 2);
        assert_ne!(cart.lines()[0].id, cart.lines()[1].id);
    }

    #[test]
    fn line_ids_never_collide_across_adds() {
        let mut cart = Cart::new(Uuid::new_v4());
        let pen = some_stationery(Some(15), Some(120));
        let book = some_book(Some(450), Some(600));

        cart.add(&pen, 1, Some(UnitType::Piece)).unwrap();
        cart.add(&pen, 2, Some(UnitType::Packet)).unwrap();
        cart.add(&book, 1, None).unwrap();
        cart.add(&pen, 1, Some(UnitType::Piece)).unwrap();
        cart.add(&book, 4, None).unwrap();

        let mut ids: Vec<Uuid> = cart.lines().iter().map(|l| l.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), cart.len());
    }

    #[test]
    fn book_lines_ignore_requested_unit_type() {
        let mut cart = Cart::new(Uuid::new_v4());
        let book = some_book(Some(450), None);

        let line = cart.add(&book, 1, Some(UnitType::Packet)).unwrap();
        assert_eq!(line.unit_type, None);
        assert_eq!(line.unit_price, 450);
    }

    #[test]
    fn quantity_below_one_is_rejected_and_line_unchanged() {
        let mut cart = Cart::new(Uuid::new_v4());
        let pen = some_stationery(Some(15), None);
        let id = cart.add(&pen, 2, None).unwrap().id;

        assert_eq!(
            cart.update_quantity(id, 0),
            Err(DomainError::InvalidQuantity(0))
        );
        assert_eq!(
            cart.update_quantity(id, -3),
            Err(DomainError::InvalidQuantity(-3))
        );
        assert_eq!(cart.line(id).map(|l| l.quantity), Some(2));
    }

    #[test]
    fn unit_type_change_reprices_in_place_and_keeps_id() {
        let mut cart = Cart::new(Uuid::new_v4());
        let pen = some_stationery(Some(15), Some(120));
        let id = cart.add(&pen, 3, Some(UnitType::Piece)).unwrap().id;

        let line = cart
            .update_unit_type(id, UnitType::Packet, &pen.pricing)
            .unwrap();
        assert_eq!(line.id, id);
        assert_eq!(line.unit_type, Some(UnitType::Packet));
        assert_eq!(line.unit_price, 120);
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn unit_type_change_on_book_line_is_rejected() {
        let mut cart = Cart::new(Uuid::new_v4());
        let book = some_book(Some(450), None);
        let id = cart.add(&book, 1, None).unwrap().id;

        assert_eq!(
            cart.update_unit_type(id, UnitType::Piece, &book.pricing),
            Err(DomainError::UnitTypeNotApplicable)
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cart = Cart::new(Uuid::new_v4());
        let pen = some_stationery(Some(15), None);
        let id = cart.add(&pen, 1, None).unwrap().id;

        assert!(cart.remove(id));
        assert!(!cart.remove(id));
        assert!(cart.is_empty());
    }

    #[test]
    fn total_reflects_the_worked_example() {
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add(&some_book(Some(450), Some(600)), 1, None).unwrap();
        cart.add(
            &some_stationery(Some(15), Some(120)),
            3,
            Some(UnitType::Packet),
        )
        .unwrap();

        assert_eq!(cart.total(), 450 + 120 * 3);
    }
}
