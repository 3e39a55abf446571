//! Order processing port trait.

use crate::domain::asset::AssetClass;

/// An order handed from the execution simulator to the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntent {
    pub symbol: String,
    pub class: AssetClass,
    pub quantity: i64,
}

/// Port for the caller-supplied order-processing collaborator.
///
/// The setup core only requires a registration call accepting it; order
/// matching and filling belong to the excluded execution subsystem.
pub trait OrderProcessor: Send + Sync {
    fn enqueue(&self, intent: OrderIntent);
}
