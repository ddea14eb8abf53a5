use crate::core::{adjust_rating_average, LarderError, Recipe, RecipeId};
use crate::seed::starter_catalog;
use crate::ui::log_warning;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

// Raw row shape. The three blob columns hold JSON text and may be NULL or
// garbage in old databases, so they stay as strings until decoded.
#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: i64,
    name: String,
    ingredients: Option<String>,
    dietary: String,
    difficulty: String,
    cook_time: i64,
    servings: i64,
    nutrition: Option<String>,
    substitutions: Option<String>,
    rating: f64,
    rating_count: i64,
}

// One malformed blob degrades to an empty container; it must never fail the
// whole catalog scan.
fn decode_or_default<T>(blob: Option<&str>, field: &str, recipe: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(text) = blob else {
        return T::default();
    };
    if text.trim().is_empty() {
        return T::default();
    }

    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => {
            log_warning(&format!(
                "Malformed {} data on '{}', treating as empty",
                field, recipe
            ));
            T::default()
        }
    }
}

impl RecipeRow {
    fn into_recipe(self) -> Recipe {
        Recipe {
            ingredients: decode_or_default(self.ingredients.as_deref(), "ingredient", &self.name),
            nutrition: decode_or_default(self.nutrition.as_deref(), "nutrition", &self.name),
            substitutions: decode_or_default(
                self.substitutions.as_deref(),
                "substitution",
                &self.name,
            ),
            id: RecipeId(self.id),
            name: self.name,
            dietary: self.dietary,
            difficulty: self.difficulty,
            cook_time: self.cook_time,
            servings: self.servings,
            rating: self.rating,
            rating_count: self.rating_count,
        }
    }
}

pub struct CatalogStore {
    pub db: SqlitePool,
}

impl CatalogStore {
    pub async fn new(db_url: &str) -> Result<Self, LarderError> {
        let db = SqlitePool::connect(db_url).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                ingredients TEXT,
                dietary TEXT NOT NULL DEFAULT '',
                difficulty TEXT NOT NULL DEFAULT 'medium',
                cook_time INTEGER NOT NULL DEFAULT 0,
                servings INTEGER NOT NULL DEFAULT 1,
                nutrition TEXT,
                substitutions TEXT,
                rating REAL NOT NULL DEFAULT 0,
                rating_count INTEGER NOT NULL DEFAULT 0
            );",
        )
        .execute(&db)
        .await?;

        Ok(Self { db })
    }

    // First run leaves an empty table; fill it with the starter catalog so
    // there is something to search. Returns how many recipes were added.
    pub async fn ensure_seeded(&self) -> Result<usize, LarderError> {
        if self.count().await? > 0 {
            return Ok(0);
        }

        let starters = starter_catalog();
        for recipe in &starters {
            self.insert(recipe).await?;
        }
        Ok(starters.len())
    }

    pub async fn count(&self) -> Result<i64, LarderError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    // Full scan, fresh on every call. Scan order is the id order, which is
    // also the tie-break order downstream.
    pub async fn load_all(&self) -> Result<Vec<Recipe>, LarderError> {
        let rows: Vec<RecipeRow> = sqlx::query_as(
            "SELECT id, name, ingredients, dietary, difficulty, cook_time,
                    servings, nutrition, substitutions, rating, rating_count
             FROM recipes ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(RecipeRow::into_recipe).collect())
    }

    pub async fn insert(&self, recipe: &Recipe) -> Result<RecipeId, LarderError> {
        let result = sqlx::query(
            "INSERT INTO recipes
                (name, ingredients, dietary, difficulty, cook_time, servings,
                 nutrition, substitutions, rating, rating_count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&recipe.name)
        .bind(serde_json::to_string(&recipe.ingredients)?)
        .bind(&recipe.dietary)
        .bind(&recipe.difficulty)
        .bind(recipe.cook_time)
        .bind(recipe.servings)
        .bind(serde_json::to_string(&recipe.nutrition)?)
        .bind(serde_json::to_string(&recipe.substitutions)?)
        .bind(recipe.rating)
        .bind(recipe.rating_count)
        .execute(&self.db)
        .await?;

        Ok(RecipeId(result.last_insert_rowid()))
    }

    // Fold a new vote into the running average inside one transaction.
    pub async fn rate(&self, id: RecipeId, rating: i64) -> Result<(f64, i64), LarderError> {
        let mut tx = self.db.begin().await?;

        let row: Option<(f64, i64)> =
            sqlx::query_as("SELECT rating, rating_count FROM recipes WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&mut *tx)
                .await?;
        let (old_avg, old_count) = row.ok_or(LarderError::NotFound(id.0))?;

        let (new_avg, new_count) = adjust_rating_average(old_avg, old_count, rating)?;

        sqlx::query("UPDATE recipes SET rating = ?, rating_count = ? WHERE id = ?")
            .bind(new_avg)
            .bind(new_count)
            .bind(id.0)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((new_avg, new_count))
    }

    pub async fn substitutions(
        &self,
        id: RecipeId,
    ) -> Result<BTreeMap<String, Vec<String>>, LarderError> {
        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT name, substitutions FROM recipes WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&self.db)
                .await?;
        let (name, blob) = row.ok_or(LarderError::NotFound(id.0))?;

        Ok(decode_or_default(blob.as_deref(), "substitution", &name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir) -> CatalogStore {
        let url = format!("sqlite://{}/catalog.db?mode=rwc", dir.path().display());
        CatalogStore::new(&url).await.unwrap()
    }

    fn sample_recipe() -> Recipe {
        Recipe {
            id: RecipeId(0),
            name: "Chicken Rice Bowl".to_string(),
            ingredients: vec![
                "chicken breast".to_string(),
                "rice".to_string(),
                "broccoli".to_string(),
            ],
            dietary: String::new(),
            difficulty: "easy".to_string(),
            cook_time: 20,
            servings: 2,
            nutrition: BTreeMap::from([
                ("calories".to_string(), 400.0),
                ("protein_g".to_string(), 32.0),
            ]),
            substitutions: BTreeMap::from([(
                "rice".to_string(),
                vec!["quinoa".to_string(), "couscous".to_string()],
            )]),
            rating: 4.0,
            rating_count: 1,
        }
    }

    #[tokio::test]
    async fn inserted_recipes_round_trip_through_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let id = store.insert(&sample_recipe()).await.unwrap();
        let catalog = store.load_all().await.unwrap();

        assert_eq!(catalog.len(), 1);
        let loaded = &catalog[0];
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.ingredients, sample_recipe().ingredients);
        assert_eq!(loaded.nutrition, sample_recipe().nutrition);
        assert_eq!(loaded.substitutions, sample_recipe().substitutions);
    }

    #[tokio::test]
    async fn seeding_runs_once_on_an_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let seeded = store.ensure_seeded().await.unwrap();
        assert!(seeded > 0);
        assert_eq!(store.count().await.unwrap(), seeded as i64);

        // Second run must not duplicate anything.
        assert_eq!(store.ensure_seeded().await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), seeded as i64);
    }

    #[tokio::test]
    async fn malformed_blobs_degrade_to_empty_containers() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        sqlx::query(
            "INSERT INTO recipes (name, ingredients, nutrition, substitutions)
             VALUES ('Corrupt Row', 'not json at all', '{broken', NULL)",
        )
        .execute(&store.db)
        .await
        .unwrap();

        let catalog = store.load_all().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog[0].ingredients.is_empty());
        assert!(catalog[0].nutrition.is_empty());
        assert!(catalog[0].substitutions.is_empty());
    }

    #[tokio::test]
    async fn rating_updates_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let id = store.insert(&sample_recipe()).await.unwrap();

        let (avg, count) = store.rate(id, 5).await.unwrap();
        assert_eq!(avg, 4.5);
        assert_eq!(count, 2);

        let catalog = store.load_all().await.unwrap();
        assert_eq!(catalog[0].rating, 4.5);
        assert_eq!(catalog[0].rating_count, 2);
    }

    #[tokio::test]
    async fn rating_an_unknown_recipe_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let result = store.rate(RecipeId(42), 5).await;
        assert!(matches!(result, Err(LarderError::NotFound(42))));
    }

    #[tokio::test]
    async fn out_of_range_rating_leaves_the_row_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let id = store.insert(&sample_recipe()).await.unwrap();

        let result = store.rate(id, 9).await;
        assert!(matches!(result, Err(LarderError::InvalidRating(9))));

        let catalog = store.load_all().await.unwrap();
        assert_eq!(catalog[0].rating, 4.0);
        assert_eq!(catalog[0].rating_count, 1);
    }

    #[tokio::test]
    async fn substitutions_lookup_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let id = store.insert(&sample_recipe()).await.unwrap();

        let subs = store.substitutions(id).await.unwrap();
        assert_eq!(subs["rice"], vec!["quinoa", "couscous"]);

        let missing = store.substitutions(RecipeId(999)).await;
        assert!(matches!(missing, Err(LarderError::NotFound(999))));
    }

    #[tokio::test]
    async fn catalog_survives_reopening_the_store() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open_store(&dir).await;
            store.insert(&sample_recipe()).await.unwrap();
            store.db.close().await;
        }

        let reopened = open_store(&dir).await;
        assert_eq!(reopened.count().await.unwrap(), 1);
    }
}
