use crate::config::toml_config::{Prefecture, RateConfig, RegionDistance, TruckTier};
use crate::domain::model::{OptionalService, PackageCategory};
use crate::domain::ports::RateLookupProvider;
use crate::utils::error::{EstimateError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::path::Path;

/// 以設定檔內容建立的費率表，載入後唯讀
#[derive(Debug, Clone)]
pub struct RateTable {
    box_factors: HashMap<u32, u32>,
    truck_tiers: Vec<TruckTier>,
    service_fees: HashMap<u32, u64>,
    season_by_month: HashMap<u32, f64>,
    prefectures: Vec<Prefecture>,
    region_distances: HashMap<(String, String), f64>,
}

impl RateTable {
    /// 設定檔未通過驗證時不建立費率表
    pub fn from_config(config: &RateConfig) -> Result<Self> {
        config.validate()?;

        let mut distances = config.region_distances.clone();
        if let Some(table) = &config.distance_table {
            let loaded = load_distance_csv(&table.csv)?;
            tracing::debug!("Loaded {} region distances from {}", loaded.len(), table.csv);
            distances.extend(loaded);
        }

        let mut region_distances = HashMap::new();
        for entry in distances {
            region_distances.insert(region_key(&entry.from, &entry.to), entry.km);
        }

        let mut season_by_month = HashMap::new();
        for season in &config.seasons {
            for &month in &season.months {
                season_by_month.insert(month, season.coefficient);
            }
        }

        Ok(Self {
            box_factors: config
                .packages
                .iter()
                .map(|p| (p.code, p.box_factor))
                .collect(),
            truck_tiers: config.truck_tiers.clone(),
            service_fees: config
                .optional_services
                .iter()
                .map(|s| (s.code, s.fee))
                .collect(),
            season_by_month,
            prefectures: config.prefectures.clone(),
            region_distances,
        })
    }

    pub fn prefectures(&self) -> &[Prefecture] {
        &self.prefectures
    }

    fn is_known_region(&self, id: &str) -> bool {
        self.prefectures.iter().any(|p| p.id == id)
            || self
                .region_distances
                .keys()
                .any(|(a, b)| a == id || b == id)
    }
}

#[async_trait]
impl RateLookupProvider for RateTable {
    async fn box_factor(&self, category: PackageCategory) -> Result<u32> {
        self.box_factors
            .get(&category.code())
            .copied()
            .ok_or_else(|| EstimateError::not_found("box factor", category))
    }

    async fn truck_price(&self, total_boxes: u64) -> Result<u64> {
        // 第一個容量足夠的級距
        self.truck_tiers
            .iter()
            .find(|tier| total_boxes <= tier.max_boxes)
            .map(|tier| tier.price)
            .ok_or_else(|| EstimateError::not_found("truck tier", total_boxes))
    }

    async fn optional_service_fee(&self, service: OptionalService) -> Result<u64> {
        self.service_fees
            .get(&service.code())
            .copied()
            .ok_or_else(|| EstimateError::not_found("optional service fee", service))
    }

    async fn season_coefficient(&self, date: NaiveDate) -> Result<f64> {
        self.season_by_month
            .get(&date.month())
            .copied()
            .ok_or_else(|| EstimateError::not_found("season coefficient", date))
    }

    async fn distance_between_regions(
        &self,
        origin_id: &str,
        destination_id: &str,
    ) -> Result<f64> {
        if let Some(km) = self.region_distances.get(&region_key(origin_id, destination_id)) {
            return Ok(*km);
        }
        if origin_id == destination_id && self.is_known_region(origin_id) {
            return Ok(0.0);
        }
        Err(EstimateError::not_found(
            "region distance",
            format!("{} -> {}", origin_id, destination_id),
        ))
    }
}

/// 距離表不分方向
fn region_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

pub fn load_distance_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RegionDistance>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut distances = Vec::new();
    for row in reader.deserialize() {
        let entry: RegionDistance = row?;
        if !entry.km.is_finite() || entry.km < 0.0 {
            return Err(EstimateError::InvalidConfigValueError {
                field: "distance_table.km".to_string(),
                value: entry.km.to_string(),
                reason: "distance must be a non-negative number".to_string(),
            });
        }
        distances.push(entry);
    }
    Ok(distances)
}
