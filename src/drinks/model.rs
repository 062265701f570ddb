use serde::{Deserialize, Serialize};

pub const TITLE_MAX_LEN: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: u32,
}

/// A drink in its long form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drink {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortIngredient<'a> {
    pub color: &'a str,
    pub parts: u32,
}

/// Public view of a drink: the recipe without ingredient names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortDrink<'a> {
    pub id: u64,
    pub title: &'a str,
    pub recipe: Vec<ShortIngredient<'a>>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink<'_> {
        ShortDrink {
            id: self.id,
            title: &self.title,
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| ShortIngredient {
                    color: &ingredient.color,
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }
}

/// Clients send either a single ingredient or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Recipe {
    One(Ingredient),
    Many(Vec<Ingredient>),
}

impl From<Recipe> for Vec<Ingredient> {
    fn from(recipe: Recipe) -> Self {
        match recipe {
            Recipe::One(ingredient) => vec![ingredient],
            Recipe::Many(ingredients) => ingredients,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrinkPayload {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}
