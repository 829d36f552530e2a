//! Read-only access to centers and shops
//!
//! The [`Repository`] trait is the seam between data storage and the rest of
//! the crate. [`InMemoryRepository`] serves a validated [`Dataset`] loaded
//! from a JSON file.

use crate::error::{Error, Result, ResultExt};
use crate::model::{Center, RiskLevel, Shop};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Read-only source of centers and shops
///
/// Missing ids are `Ok(None)`, not errors.
pub trait Repository {
    /// All centers in storage order
    fn list_centers(&self) -> Result<Vec<Center>>;

    fn get_center(&self, id: i64) -> Result<Option<Center>>;

    /// All shops in storage order
    fn list_shops(&self) -> Result<Vec<Shop>>;

    fn get_shop(&self, id: i64) -> Result<Option<Shop>>;

    /// Shops with the given risk level, in storage order
    fn shops_by_risk(&self, level: RiskLevel) -> Result<Vec<Shop>> {
        Ok(self
            .list_shops()?
            .into_iter()
            .filter(|shop| shop.risk == level)
            .collect())
    }
}

/// Raw dataset as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub centers: Vec<Center>,
    #[serde(default)]
    pub shops: Vec<Shop>,
}

impl Dataset {
    /// Parse a dataset from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a dataset file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::file_not_found(path)
                .with_suggestion("Pass --data <file> or set data.path in .riskmap.toml"));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).context(format!("Reading dataset {}", path.display()))
    }

    /// Check coordinates and id uniqueness
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for center in &self.centers {
            if !center.location.is_valid() {
                return Err(Error::invalid_coordinate(
                    "Center",
                    center.id,
                    center.location.latitude,
                    center.location.longitude,
                ));
            }
            if !seen.insert(center.id) {
                return Err(Error::duplicate_id("center", center.id));
            }
        }

        seen.clear();
        for shop in &self.shops {
            if !shop.location.is_valid() {
                return Err(Error::invalid_coordinate(
                    "Shop",
                    shop.id,
                    shop.location.latitude,
                    shop.location.longitude,
                ));
            }
            if !seen.insert(shop.id) {
                return Err(Error::duplicate_id("shop", shop.id));
            }
        }

        Ok(())
    }
}

/// Repository over a validated in-memory dataset
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    dataset: Dataset,
    center_index: HashMap<i64, usize>,
    shop_index: HashMap<i64, usize>,
}

impl InMemoryRepository {
    /// Validate and index a dataset
    pub fn from_dataset(dataset: Dataset) -> Result<Self> {
        dataset.validate()?;

        let center_index = dataset
            .centers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        let shop_index = dataset
            .shops
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();

        tracing::debug!(
            centers = dataset.centers.len(),
            shops = dataset.shops.len(),
            "Dataset indexed"
        );

        Ok(Self {
            dataset,
            center_index,
            shop_index,
        })
    }

    /// Load, validate and index a dataset file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::from_json_file(path)?;
        Self::from_dataset(dataset).context(format!("Validating dataset {}", path.display()))
    }

    /// Borrow the centers without cloning
    pub fn centers(&self) -> &[Center] {
        &self.dataset.centers
    }

    /// Borrow the shops without cloning
    pub fn shops(&self) -> &[Shop] {
        &self.dataset.shops
    }
}

impl Repository for InMemoryRepository {
    fn list_centers(&self) -> Result<Vec<Center>> {
        Ok(self.dataset.centers.clone())
    }

    fn get_center(&self, id: i64) -> Result<Option<Center>> {
        Ok(self
            .center_index
            .get(&id)
            .map(|&i| self.dataset.centers[i].clone()))
    }

    fn list_shops(&self) -> Result<Vec<Shop>> {
        Ok(self.dataset.shops.clone())
    }

    fn get_shop(&self, id: i64) -> Result<Option<Shop>> {
        Ok(self.shop_index.get(&id).map(|&i| self.dataset.shops[i].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "centers": [
            {"id": 1, "name": "Dallas", "location": {"latitude": 32.7767, "longitude": -96.7970}},
            {"id": 2, "name": "Houston", "location": {"latitude": 29.7604, "longitude": -95.3698}}
        ],
        "shops": [
            {"id": 10, "name": "Tech Electronics Store", "location": {"latitude": 32.7850, "longitude": -96.8000}, "risk": "high", "analysis": "Inventory gaps"},
            {"id": 11, "name": "Gulf Coast Seafood", "location": {"latitude": 29.7500, "longitude": -95.3600}, "risk": "LOW", "analysis": "Reliable"},
            {"id": 12, "name": "Energy Tech Solutions", "location": {"latitude": 29.7700, "longitude": -95.3800}, "risk": "High", "analysis": ""}
        ]
    }"#;

    fn repository() -> InMemoryRepository {
        InMemoryRepository::from_dataset(Dataset::from_json_str(SAMPLE).unwrap()).unwrap()
    }

    #[test]
    fn test_lookup_by_id() {
        let repo = repository();
        assert_eq!(repo.get_center(2).unwrap().unwrap().name, "Houston");
        assert_eq!(repo.get_shop(11).unwrap().unwrap().risk, RiskLevel::Low);
    }

    #[test]
    fn test_missing_ids_are_none() {
        let repo = repository();
        assert!(repo.get_center(99).unwrap().is_none());
        assert!(repo.get_shop(99).unwrap().is_none());
    }

    #[test]
    fn test_lists_keep_storage_order() {
        let repo = repository();
        let ids: Vec<i64> = repo.list_shops().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        assert_eq!(repo.list_centers().unwrap().len(), 2);
    }

    #[test]
    fn test_shops_by_risk() {
        let repo = repository();
        let high: Vec<i64> = repo
            .shops_by_risk(RiskLevel::High)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(high, vec![10, 12]);
        assert!(repo.shops_by_risk(RiskLevel::Medium).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_invalid_coordinate() {
        let mut dataset = Dataset::from_json_str(SAMPLE).unwrap();
        dataset.shops[1].location.latitude = 123.0;
        let err = InMemoryRepository::from_dataset(dataset).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCoordinate);
        assert!(err.message.contains("Shop 11"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut dataset = Dataset::from_json_str(SAMPLE).unwrap();
        dataset.centers[1].id = 1;
        let err = InMemoryRepository::from_dataset(dataset).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateId);
    }

    #[test]
    fn test_same_id_across_tables_is_fine() {
        let mut dataset = Dataset::from_json_str(SAMPLE).unwrap();
        dataset.shops[0].id = 1;
        assert!(InMemoryRepository::from_dataset(dataset).is_ok());
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let repo = InMemoryRepository::open(file.path()).unwrap();
        assert_eq!(repo.shops().len(), 3);
        assert_eq!(repo.centers().len(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        let err = InMemoryRepository::open("/no/such/dataset.json").unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[test]
    fn test_open_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ \"centers\": [ }").unwrap();

        let err = InMemoryRepository::open(file.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatasetParseError);
        assert!(err.context.is_some());
    }
}
