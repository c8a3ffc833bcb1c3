//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{BimilError, BimilResult};
use crate::models::{Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::CategoryStore;

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), BimilError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for category in file_data.categories {
            data.insert(category.id.clone(), category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        self.persist(&data)
    }

    fn persist(&self, data: &HashMap<CategoryId, Category>) -> Result<(), BimilError> {
        let categories = sorted_categories(data);
        write_json_atomic(&self.path, &CategoryData { categories })
    }

    /// Get a category by ID
    pub fn get(&self, id: &CategoryId) -> Result<Option<Category>, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(id).cloned())
    }

    /// Get all categories ordered by sort order, then name
    pub fn get_all(&self) -> Result<Vec<Category>, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted_categories(&data))
    }

    /// Validate a new category, then insert and persist it
    pub fn create(&self, category: Category) -> Result<(), BimilError> {
        category
            .validate()
            .map_err(|e| BimilError::Validation(e.to_string()))?;

        self.insert_record(category)
    }

    /// Insert a category as-is; fails only on an id collision or a write error
    pub fn insert_record(&self, category: Category) -> Result<(), BimilError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if data.contains_key(&category.id) {
            return Err(BimilError::duplicate("Category", category.id.as_str()));
        }

        let id = category.id.clone();
        data.insert(id.clone(), category);
        if let Err(e) = self.persist(&data) {
            data.remove(&id);
            return Err(e);
        }
        Ok(())
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

fn sorted_categories(data: &HashMap<CategoryId, Category>) -> Vec<Category> {
    let mut categories: Vec<_> = data.values().cloned().collect();
    categories.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
    categories
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn read_all(&self) -> BimilResult<Vec<Category>> {
        self.get_all()
    }

    async fn insert(&self, category: Category) -> BimilResult<()> {
        self.insert_record(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        let repo = CategoryRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_create_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category = Category::new("Games");
        let id = category.id.clone();
        repo.create(category).unwrap();

        let repo2 = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(&id).unwrap().unwrap().name, "Games");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category = Category::new("Games");
        repo.create(category.clone()).unwrap();

        let err = repo.create(category).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_invalid_category_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut category = Category::new("Bad");
        category.color = "blue".into();
        assert!(matches!(
            repo.create(category),
            Err(BimilError::Validation(_))
        ));
    }

    #[test]
    fn test_ordering() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut b = Category::new("Beta");
        b.sort_order = 1;
        let mut a = Category::new("Alpha");
        a.sort_order = 1;
        let mut z = Category::new("Zulu");
        z.sort_order = 0;

        repo.create(b).unwrap();
        repo.create(a).unwrap();
        repo.create(z).unwrap();

        let names: Vec<_> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn test_store_insert() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let store: &dyn CategoryStore = &repo;
        let finance = Category::defaults().remove(0);
        store.insert(finance.clone()).await.unwrap();
        assert!(store.insert(finance).await.unwrap_err().is_duplicate());
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_insert_keeps_foreign_shapes() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut category = Category::new("가".repeat(60));
        category.color = "#FF10B981".into();
        assert!(repo.create(category.clone()).is_err());

        let store: &dyn CategoryStore = &repo;
        store.insert(category.clone()).await.unwrap();
        assert_eq!(repo.get(&category.id).unwrap().unwrap().color, "#FF10B981");
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let (temp_dir, repo) = create_test_repo();
        let path = temp_dir.path().join("categories.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();

        assert!(repo.insert_record(Category::new("Games")).is_err());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
