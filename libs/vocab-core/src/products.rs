//! Purchasable products offered on the pricing page.

use serde::Serialize;

use crate::types::CheckoutMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub price_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mode: CheckoutMode,
    pub price: &'static str,
}

pub const PRODUCTS: &[Product] = &[Product {
    id: "prod_Sb1MzhaTax4Qyj",
    price_id: "price_1RfpJUB1RF635Q02uw6EhMUy",
    name: "VocabLog Premium",
    description: "Unlock premium features for your vocabulary learning journey",
    mode: CheckoutMode::Payment,
    price: "£2.99",
}];

pub fn product_by_id(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

pub fn product_by_price_id(price_id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.price_id == price_id)
}
