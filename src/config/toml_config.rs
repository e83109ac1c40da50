use crate::domain::model::{OptionalService, PackageCategory};
use crate::utils::error::{EstimateError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_POSTAL_ENDPOINT: &str =
    "https://geoapi.heartrails.com/api/json?method=searchByPostal";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    pub packages: Vec<PackageRate>,
    pub truck_tiers: Vec<TruckTier>,
    #[serde(default)]
    pub optional_services: Vec<OptionalServiceRate>,
    pub seasons: Vec<SeasonRate>,
    #[serde(default)]
    pub prefectures: Vec<Prefecture>,
    #[serde(default)]
    pub region_distances: Vec<RegionDistance>,
    pub distance_table: Option<DistanceTableConfig>,
    pub postal: Option<PostalConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRate {
    pub code: u32,
    pub name: Option<String>,
    pub box_factor: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckTier {
    pub max_boxes: u64,
    pub price: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionalServiceRate {
    pub code: u32,
    pub name: Option<String>,
    pub fee: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRate {
    pub name: Option<String>,
    pub months: Vec<u32>,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefecture {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDistance {
    pub from: String,
    pub to: String,
    pub km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceTableConfig {
    /// CSV 檔 (from,to,km)，相對路徑以設定檔所在目錄為準
    pub csv: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

impl RateConfig {
    /// 從 TOML 檔案載入費率設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EstimateError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;

        // 距離表路徑改成以設定檔目錄為基準
        if let (Some(table), Some(dir)) = (config.distance_table.as_mut(), path.as_ref().parent())
        {
            if Path::new(&table.csv).is_relative() {
                table.csv = dir.join(&table.csv).to_string_lossy().into_owned();
            }
        }

        Ok(config)
    }

    /// 從 TOML 字串解析費率設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EstimateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${POSTAL_API_ENDPOINT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EstimateError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證費率表的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.validate_packages()?;
        self.validate_truck_tiers()?;
        self.validate_optional_services()?;
        self.validate_seasons()?;
        self.validate_regions()?;

        if let Some(table) = &self.distance_table {
            crate::utils::validation::validate_path("distance_table.csv", &table.csv)?;
            crate::utils::validation::validate_file_extensions(
                "distance_table.csv",
                std::slice::from_ref(&table.csv),
                &["csv"],
            )?;
        }

        if let Some(postal) = &self.postal {
            crate::utils::validation::validate_url("postal.endpoint", &postal.endpoint)?;
            if let Some(timeout) = postal.timeout_seconds {
                crate::utils::validation::validate_range(
                    "postal.timeout_seconds",
                    timeout,
                    1,
                    120,
                )?;
            }
        }

        Ok(())
    }

    fn validate_packages(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for package in &self.packages {
            if PackageCategory::from_code(package.code).is_none() {
                return Err(invalid("packages.code", package.code, "unknown package code"));
            }
            if !seen.insert(package.code) {
                return Err(invalid("packages.code", package.code, "duplicate package code"));
            }
        }
        Ok(())
    }

    fn validate_truck_tiers(&self) -> Result<()> {
        if self.truck_tiers.is_empty() {
            return Err(EstimateError::MissingConfigError {
                field: "truck_tiers".to_string(),
            });
        }
        // 級距必須依箱數遞增，價格不可下降
        for pair in self.truck_tiers.windows(2) {
            if pair[1].max_boxes <= pair[0].max_boxes {
                return Err(invalid(
                    "truck_tiers.max_boxes",
                    pair[1].max_boxes,
                    "tiers must be listed in ascending max_boxes order",
                ));
            }
            if pair[1].price < pair[0].price {
                return Err(invalid(
                    "truck_tiers.price",
                    pair[1].price,
                    "price must not decrease as max_boxes grows",
                ));
            }
        }
        Ok(())
    }

    fn validate_optional_services(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for service in &self.optional_services {
            if OptionalService::from_code(service.code).is_none() {
                return Err(invalid(
                    "optional_services.code",
                    service.code,
                    "unknown optional service code",
                ));
            }
            if !seen.insert(service.code) {
                return Err(invalid(
                    "optional_services.code",
                    service.code,
                    "duplicate optional service code",
                ));
            }
        }
        Ok(())
    }

    fn validate_seasons(&self) -> Result<()> {
        let mut covered = HashSet::new();
        for season in &self.seasons {
            if !season.coefficient.is_finite() || season.coefficient <= 0.0 {
                return Err(invalid(
                    "seasons.coefficient",
                    season.coefficient,
                    "coefficient must be a positive number",
                ));
            }
            for &month in &season.months {
                crate::utils::validation::validate_range("seasons.months", month, 1, 12)?;
                if !covered.insert(month) {
                    return Err(invalid("seasons.months", month, "month listed in two seasons"));
                }
            }
        }
        Ok(())
    }

    fn validate_regions(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for prefecture in &self.prefectures {
            crate::utils::validation::validate_numeric("prefectures.id", &prefecture.id)?;
            if !seen.insert(prefecture.id.as_str()) {
                return Err(invalid("prefectures.id", &prefecture.id, "duplicate prefecture id"));
            }
        }
        for distance in &self.region_distances {
            if !distance.km.is_finite() || distance.km < 0.0 {
                return Err(invalid(
                    "region_distances.km",
                    distance.km,
                    "distance must be a non-negative number",
                ));
            }
        }
        Ok(())
    }

    pub fn postal_endpoint(&self) -> &str {
        self.postal
            .as_ref()
            .map(|p| p.endpoint.as_str())
            .unwrap_or(DEFAULT_POSTAL_ENDPOINT)
    }

    pub fn postal_timeout_seconds(&self) -> u64 {
        self.postal
            .as_ref()
            .and_then(|p| p.timeout_seconds)
            .unwrap_or(10)
    }
}

impl Validate for RateConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> EstimateError {
    EstimateError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
