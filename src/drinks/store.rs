use std::{collections::BTreeMap, sync::Arc};

use tokio::sync::RwLock;

use crate::error::ApiError;

use super::model::{Drink, Ingredient};

#[derive(Debug, Default)]
struct Drinks {
    last_id: u64,
    by_id: BTreeMap<u64, Drink>,
}

impl Drinks {
    fn title_taken(&self, title: &str, except: Option<u64>) -> bool {
        self.by_id
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except)
    }
}

/// In-memory drinks table. Titles are unique, ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct DrinkStore {
    inner: Arc<RwLock<Drinks>>,
}

impl DrinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Drink> {
        self.inner.read().await.by_id.values().cloned().collect()
    }

    #[tracing::instrument(skip(self, recipe))]
    pub async fn insert(
        &self,
        title: String,
        recipe: Vec<Ingredient>,
    ) -> Result<Drink, StoreError> {
        let mut drinks = self.inner.write().await;

        if drinks.title_taken(&title, None) {
            return Err(StoreError::DuplicateTitle);
        }

        drinks.last_id += 1;

        let drink = Drink {
            id: drinks.last_id,
            title,
            recipe,
        };

        drinks.by_id.insert(drink.id, drink.clone());

        Ok(drink)
    }

    #[tracing::instrument(skip(self, recipe))]
    pub async fn update(
        &self,
        id: u64,
        title: Option<String>,
        recipe: Option<Vec<Ingredient>>,
    ) -> Result<Drink, StoreError> {
        let mut drinks = self.inner.write().await;

        if !drinks.by_id.contains_key(&id) {
            return Err(StoreError::NotFound);
        }

        if let Some(title) = &title {
            if drinks.title_taken(title, Some(id)) {
                return Err(StoreError::DuplicateTitle);
            }
        }

        let drink = drinks.by_id.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(title) = title {
            drink.title = title;
        }

        if let Some(recipe) = recipe {
            drink.recipe = recipe;
        }

        Ok(drink.clone())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .by_id
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Title is not unique")]
    DuplicateTitle,
    #[error("drink not found")]
    NotFound,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateTitle => ApiError::Unprocessable(err.to_string()),
            StoreError::NotFound => ApiError::NotFound(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn espresso() -> Vec<Ingredient> {
        vec![Ingredient {
            color: String::from("brown"),
            name: String::from("espresso"),
            parts: 1,
        }]
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = DrinkStore::new();

        let first = store
            .insert(String::from("Espresso"), espresso())
            .await
            .expect("Failed to insert");
        let second = store
            .insert(String::from("Doppio"), espresso())
            .await
            .expect("Failed to insert");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.all().await, vec![first, second]);
    }

    #[tokio::test]
    async fn titles_are_unique() {
        let store = DrinkStore::new();

        store
            .insert(String::from("Espresso"), espresso())
            .await
            .expect("Failed to insert");

        assert_eq!(
            store.insert(String::from("Espresso"), espresso()).await,
            Err(StoreError::DuplicateTitle)
        );
    }

    #[tokio::test]
    async fn update_keeps_own_title_but_refuses_others() {
        let store = DrinkStore::new();

        let espresso_drink = store
            .insert(String::from("Espresso"), espresso())
            .await
            .expect("Failed to insert");
        store
            .insert(String::from("Doppio"), espresso())
            .await
            .expect("Failed to insert");

        let updated = store
            .update(espresso_drink.id, Some(String::from("Espresso")), None)
            .await
            .expect("Failed to update");

        assert_eq!(updated, espresso_drink);

        assert_eq!(
            store
                .update(espresso_drink.id, Some(String::from("Doppio")), None)
                .await,
            Err(StoreError::DuplicateTitle)
        );
    }

    #[tokio::test]
    async fn unknown_id_wins_over_duplicate_title() {
        let store = DrinkStore::new();

        store
            .insert(String::from("Espresso"), espresso())
            .await
            .expect("Failed to insert");

        assert_eq!(
            store
                .update(999, Some(String::from("Espresso")), None)
                .await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_never_reuses_ids() {
        let store = DrinkStore::new();

        let drink = store
            .insert(String::from("Espresso"), espresso())
            .await
            .expect("Failed to insert");

        store.delete(drink.id).await.expect("Failed to delete");

        assert!(store.all().await.is_empty());
        assert_eq!(store.delete(drink.id).await, Err(StoreError::NotFound));

        let next = store
            .insert(String::from("Espresso"), espresso())
            .await
            .expect("Failed to insert");

        assert_eq!(next.id, 2);
    }
}
