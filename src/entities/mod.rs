//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod final_price_history;
pub mod final_product;
pub mod final_product_ingredient;
pub mod menu;
pub mod middle_ingredient;
pub mod price_history;
pub mod primary_ingredient;
pub mod related_ingredient;
pub mod sell_price_history;
pub mod unit;

// Re-export specific types to avoid conflicts
pub use final_price_history::{
    Column as FinalPriceHistoryColumn, Entity as FinalPriceHistory, Model as FinalPriceHistoryModel,
};
pub use final_product::{
    Column as FinalProductColumn, Entity as FinalProduct, Model as FinalProductModel,
};
pub use final_product_ingredient::{
    Column as FinalProductIngredientColumn, Entity as FinalProductIngredient,
    Model as FinalProductIngredientModel,
};
pub use menu::{Column as MenuColumn, Entity as Menu, Model as MenuModel};
pub use middle_ingredient::{
    Column as MiddleIngredientColumn, CompositionKind, Entity as MiddleIngredient,
    Model as MiddleIngredientModel,
};
pub use price_history::{
    Column as PriceHistoryColumn, Entity as PriceHistory, Model as PriceHistoryModel,
};
pub use primary_ingredient::{
    Column as PrimaryIngredientColumn, Entity as PrimaryIngredient,
    Model as PrimaryIngredientModel,
};
pub use related_ingredient::{
    Column as RelatedIngredientColumn, Entity as RelatedIngredient,
    Model as RelatedIngredientModel,
};
pub use sell_price_history::{
    Column as SellPriceHistoryColumn, Entity as SellPriceHistory, Model as SellPriceHistoryModel,
};
pub use unit::{Column as UnitColumn, Entity as Unit, Model as UnitModel};
