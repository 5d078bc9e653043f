//! Category-dependent price resolution. Books carry list/selling prices,
//! everything else may be sold per piece, per packet, or flat.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Book,
    Stationery,
    Gift,
    Sport,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Book => "book",
            Category::Stationery => "stationery",
            Category::Gift => "gift",
            Category::Sport => "sport",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "book" => Some(Category::Book),
            "stationery" => Some(Category::Stationery),
            "gift" => Some(Category::Gift),
            "sport" => Some(Category::Sport),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sale granularity for non-book products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Piece,
    Packet,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Piece => "piece",
            UnitType::Packet => "packet",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "piece" => Some(UnitType::Piece),
            "packet" => Some(UnitType::Packet),
            _ => None,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a product is priced, split by category so missing fields are handled
/// per variant instead of through optional-field probing. Amounts are integer
/// minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pricing {
    Book {
        price_to_sell: Option<i64>,
        market_price: Option<i64>,
        price: i64,
    },
    Unit {
        per_piece: Option<i64>,
        per_packet: Option<i64>,
        price: i64,
    },
}

impl Pricing {
    /// The unit price to charge. Absent fields fall back to the base price;
    /// this is policy, not an error, so resolution never fails.
    pub fn resolve(&self, unit_type: Option<UnitType>) -> i64 {
        match *self {
            Pricing::Book {
                price_to_sell,
                market_price,
                price,
            } => price_to_sell.or(market_price).unwrap_or(price),
            Pricing::Unit {
                per_piece,
                per_packet,
                price,
            } => match unit_type {
                Some(UnitType::Packet) => per_packet.unwrap_or(price),
                Some(UnitType::Piece) | None => per_piece.unwrap_or(price),
            },
        }
    }

    /// True when the buyer has to pick between piece and packet pricing.
    pub fn requires_unit_choice(&self) -> bool {
        matches!(
            self,
            Pricing::Unit {
                per_piece: Some(_),
                per_packet: Some(_),
                ..
            }
        )
    }

    /// Normalizes the requested unit type before resolution. Books never
    /// carry one. When both unit prices exist the buyer must have chosen;
    /// when only one exists it wins regardless of what was asked for.
    pub fn select_unit_type(
        &self,
        requested: Option<UnitType>,
    ) -> Result<Option<UnitType>, DomainError> {
        match *self {
            Pricing::Book { .. } => Ok(None),
            Pricing::Unit {
                per_piece,
                per_packet,
                ..
            } => match (per_piece, per_packet) {
                (Some(_), Some(_)) => match requested {
                    Some(unit) => Ok(Some(unit)),
                    None => Err(DomainError::UnitChoiceRequired),
                },
                (Some(_), None) => Ok(Some(UnitType::Piece)),
                (None, Some(_)) => Ok(Some(UnitType::Packet)),
                (None, None) => Ok(None),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_prefers_selling_price_over_market_and_base() {
        let pricing = Pricing::Book {
            price_to_sell: Some(450),
            market_price: Some(600),
            price: 700,
        };
        assert_eq!(pricing.resolve(None), 450);

        let pricing = Pricing::Book {
            price_to_sell: None,
            market_price: Some(600),
            price: 700,
        };
        assert_eq!(pricing.resolve(None), 600);

        let pricing = Pricing::Book {
            price_to_sell: None,
            market_price: None,
            price: 700,
        };
        assert_eq!(pricing.resolve(None), 700);
    }

    #[test]
    fn book_ignores_requested_unit_type() {
        let pricing = Pricing::Book {
            price_to_sell: Some(450),
            market_price: None,
            price: 700,
        };
        assert_eq!(pricing.select_unit_type(Some(UnitType::Packet)), Ok(None));
        assert_eq!(pricing.resolve(Some(UnitType::Packet)), 450);
    }

    #[test]
    fn single_unit_price_wins_regardless_of_request() {
        let pricing = Pricing::Unit {
            per_piece: Some(15),
            per_packet: None,
            price: 20,
        };
        let unit = pricing.select_unit_type(Some(UnitType::Packet)).unwrap();
        assert_eq!(unit, Some(UnitType::Piece));
        assert_eq!(pricing.resolve(unit), 15);

        let pricing = Pricing::Unit {
            per_piece: None,
            per_packet: Some(120),
            price: 20,
        };
        let unit = pricing.select_unit_type(None).unwrap();
        assert_eq!(unit, Some(UnitType::Packet));
        assert_eq!(pricing.resolve(unit), 120);
    }

    #[test]
    fn both_unit_prices_require_an_explicit_choice() {
        let pricing = Pricing::Unit {
            per_piece: Some(15),
            per_packet: Some(120),
            price: 20,
        };
        assert!(pricing.requires_unit_choice());
        assert_eq!(
            pricing.select_unit_type(None),
            Err(DomainError::UnitChoiceRequired)
        );
        assert_eq!(
            pricing.select_unit_type(Some(UnitType::Packet)),
            Ok(Some(UnitType::Packet))
        );
        assert_eq!(pricing.resolve(Some(UnitType::Packet)), 120);
        assert_eq!(pricing.resolve(Some(UnitType::Piece)), 15);
    }

    #[test]
    fn no_unit_prices_fall_back_to_base() {
        let pricing = Pricing::Unit {
            per_piece: None,
            per_packet: None,
            price: 20,
        };
        assert_eq!(pricing.select_unit_type(None), Ok(None));
        assert_eq!(pricing.resolve(None), 20);
    }
}
