mod handlers;
mod model;
mod store;

pub use handlers::{create_drink, delete_drink, drinks_detail, list_drinks, update_drink};
pub use model::{
    Drink, DrinkPayload, Ingredient, Recipe, ShortDrink, ShortIngredient, TITLE_MAX_LEN,
};
pub use store::{DrinkStore, StoreError};
