use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(format!("Unknown discount type '{}'", other)),
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedDiscount {
    pub discount: Decimal,
    pub final_total: Decimal,
}

/// Computes the discount for a cart.
///
/// Percentage discounts are exact (`cart_total * value / 100`, no rounding)
/// and capped by `max_discount`; fixed discounts ignore the cap. The result always
/// satisfies `0 <= discount <= cart_total` and
/// `final_total == cart_total - discount`.
pub fn compute_discount(
    kind: DiscountType,
    value: Decimal,
    max_discount: Option<Decimal>,
    cart_total: Decimal,
) -> AppliedDiscount {
    let cart_total = cart_total.max(Decimal::ZERO);

    let raw = match kind {
        DiscountType::Percentage => {
            let percent = cart_total
                .checked_mul(value)
                .map(|v| v / Decimal::ONE_HUNDRED)
                .unwrap_or(cart_total);
            match max_discount {
                Some(cap) => percent.min(cap),
                None => percent,
            }
        }
        DiscountType::Fixed => value,
    };

    let discount = raw.max(Decimal::ZERO).min(cart_total);
    AppliedDiscount {
        discount,
        final_total: cart_total - discount,
    }
}
