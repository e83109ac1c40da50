use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 物品種類，每種都有固定代碼，用來查詢紙箱換算係數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageCategory {
    Box,
    Bed,
    Bicycle,
    WashingMachine,
}

impl PackageCategory {
    pub const ALL: [PackageCategory; 4] = [
        PackageCategory::Box,
        PackageCategory::Bed,
        PackageCategory::Bicycle,
        PackageCategory::WashingMachine,
    ];

    pub fn code(self) -> u32 {
        match self {
            PackageCategory::Box => 1,
            PackageCategory::Bed => 2,
            PackageCategory::Bicycle => 3,
            PackageCategory::WashingMachine => 4,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            PackageCategory::Box => "box",
            PackageCategory::Bed => "bed",
            PackageCategory::Bicycle => "bicycle",
            PackageCategory::WashingMachine => "washing_machine",
        }
    }
}

impl fmt::Display for PackageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalService {
    WashingMachineInstallation,
}

impl OptionalService {
    pub const ALL: [OptionalService; 1] = [OptionalService::WashingMachineInstallation];

    pub fn code(self) -> u32 {
        match self {
            OptionalService::WashingMachineInstallation => 1,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            OptionalService::WashingMachineInstallation => "washing_machine_installation",
        }
    }
}

impl fmt::Display for OptionalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}

/// 搬出地與搬入地。郵遞區號需先查座標，地區 ID 則直接查距離表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Location {
    PostalCode(String),
    Region(String),
}

impl Location {
    pub fn id(&self) -> &str {
        match self {
            Location::PostalCode(code) => code,
            Location::Region(id) => id,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::PostalCode(code) => write!(f, "postal:{}", code),
            Location::Region(id) => write!(f, "region:{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCounts {
    #[serde(rename = "box")]
    pub boxes: u32,
    pub bed: u32,
    pub bicycle: u32,
    pub washing_machine: u32,
}

impl ItemCounts {
    pub fn get(&self, category: PackageCategory) -> u32 {
        match category {
            PackageCategory::Box => self.boxes,
            PackageCategory::Bed => self.bed,
            PackageCategory::Bicycle => self.bicycle,
            PackageCategory::WashingMachine => self.washing_machine,
        }
    }

    /// 數量不為 0 的種類
    pub fn non_zero(&self) -> impl Iterator<Item = (PackageCategory, u32)> + '_ {
        PackageCategory::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
            .filter(|(_, n)| *n > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub origin: Location,
    pub destination: Location,
    pub moving_date: NaiveDate,
    pub items: ItemCounts,
    pub washing_machine_installation: bool,
}

impl MoveRequest {
    pub fn requested_services(&self) -> Vec<OptionalService> {
        if self.washing_machine_installation {
            vec![OptionalService::WashingMachineInstallation]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// 單次計價時取得的費率，計算期間不變
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub box_factors: Vec<(PackageCategory, u32)>,
    pub total_boxes: u64,
    pub truck_price: u64,
    pub option_fee: u64,
    pub season_coefficient: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub total: u64,
    pub distance_component: u64,
    pub cargo_component: u64,
    pub option_component: u64,
}

impl PriceBreakdown {
    /// `[total, distance, cargo, option]`
    pub fn as_array(&self) -> [u64; 4] {
        [
            self.total,
            self.distance_component,
            self.cargo_component,
            self.option_component,
        ]
    }

    pub fn component_sum(&self) -> u64 {
        self.distance_component + self.cargo_component + self.option_component
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
    pub tel: String,
    pub email: String,
    pub old_prefecture_id: String,
    pub old_address: String,
    pub new_prefecture_id: String,
    pub new_address: String,
    pub moving_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOptionService {
    pub customer_id: String,
    pub service_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPackage {
    pub customer_id: String,
    pub package_id: u32,
    pub package_number: u32,
}

/// 客戶接受報價後的訂單，整筆一起保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub customer: Customer,
    pub option_services: Vec<CustomerOptionService>,
    pub packages: Vec<CustomerPackage>,
    pub price: PriceBreakdown,
}
