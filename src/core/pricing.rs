use crate::domain::model::{
    Location, MoveRequest, OptionalService, PackageCategory, PriceBreakdown, RateSnapshot,
};
use crate::domain::ports::RateLookupProvider;
use crate::utils::error::{EstimateError, Result};

/// 每 1 km 的距離費用
pub const PRICE_PER_DISTANCE_KM: u64 = 100;

/// 搬家費用計算，每次呼叫各自獨立，不保留狀態
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine;

impl PricingEngine {
    pub fn new() -> Self {
        Self
    }

    pub async fn price_from_distance<R>(
        &self,
        request: &MoveRequest,
        distance_km: f64,
        rates: &R,
    ) -> Result<PriceBreakdown>
    where
        R: RateLookupProvider + ?Sized,
    {
        let distance_int = truncate_distance(distance_km)?;
        let snapshot = Self::fetch_rates(request, rates).await?;
        tracing::debug!(
            "Rates: factors {:?}, {} boxes, truck {}, option {}, coefficient {}",
            snapshot.box_factors,
            snapshot.total_boxes,
            snapshot.truck_price,
            snapshot.option_fee,
            snapshot.season_coefficient
        );
        Self::apply_formula(distance_int, &snapshot)
    }

    /// 地區 ID 之間的距離由費率表提供，不經過座標計算
    pub async fn price_from_locations<R>(
        &self,
        request: &MoveRequest,
        rates: &R,
    ) -> Result<PriceBreakdown>
    where
        R: RateLookupProvider + ?Sized,
    {
        let (origin, destination) = match (&request.origin, &request.destination) {
            (Location::Region(origin), Location::Region(destination)) => (origin, destination),
            (Location::PostalCode(_), Location::PostalCode(_)) => {
                return Err(EstimateError::invalid_input(
                    "origin",
                    &request.origin,
                    "postal codes need coordinate resolution before pricing",
                ));
            }
            _ => return Err(EstimateError::MixedLocationKinds),
        };

        let distance_km = rates.distance_between_regions(origin, destination).await?;
        self.price_from_distance(request, distance_km, rates).await
    }

    /// 依序查詢一次計價所需的費率
    pub async fn fetch_rates<R>(request: &MoveRequest, rates: &R) -> Result<RateSnapshot>
    where
        R: RateLookupProvider + ?Sized,
    {
        let mut box_factors = Vec::with_capacity(PackageCategory::ALL.len());
        let mut total_boxes: u64 = 0;
        for category in PackageCategory::ALL {
            let factor = rates.box_factor(category).await?;
            total_boxes += u64::from(request.items.get(category)) * u64::from(factor);
            box_factors.push((category, factor));
        }

        let truck_price = rates.truck_price(total_boxes).await?;

        let option_fee = if request.washing_machine_installation {
            rates
                .optional_service_fee(OptionalService::WashingMachineInstallation)
                .await?
        } else {
            0
        };

        let season_coefficient = rates.season_coefficient(request.moving_date).await?;
        if !season_coefficient.is_finite() || season_coefficient <= 0.0 {
            return Err(EstimateError::not_found(
                "positive season coefficient",
                request.moving_date,
            ));
        }

        Ok(RateSnapshot {
            box_factors,
            total_boxes,
            truck_price,
            option_fee,
            season_coefficient,
        })
    }

    /// 總額由合計前的金額乘上季節係數後捨去，
    /// 因此可能和各項目捨去後的合計差 1。
    pub fn apply_formula(distance_int: u64, rates: &RateSnapshot) -> Result<PriceBreakdown> {
        let distance_price = distance_int
            .checked_mul(PRICE_PER_DISTANCE_KM)
            .ok_or_else(|| {
                EstimateError::invalid_input("distance_km", distance_int, "distance too large")
            })?;
        let coefficient = rates.season_coefficient;

        let distance_component = scale(distance_price, coefficient);
        let cargo_component = scale(rates.truck_price, coefficient);
        let option_component = rates.option_fee;
        let total = distance_price
            .checked_add(rates.truck_price)
            .map(|subtotal| scale(subtotal, coefficient))
            .and_then(|scaled| scaled.checked_add(option_component))
            .ok_or_else(|| {
                EstimateError::invalid_input("distance_km", distance_int, "price too large")
            })?;

        Ok(PriceBreakdown {
            total,
            distance_component,
            cargo_component,
            option_component,
        })
    }
}

/// 小數點以下捨去
pub fn truncate_distance(distance_km: f64) -> Result<u64> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(EstimateError::invalid_input(
            "distance_km",
            distance_km,
            "distance must be a non-negative finite number",
        ));
    }
    Ok(distance_km.trunc() as u64)
}

fn scale(amount: u64, coefficient: f64) -> u64 {
    (amount as f64 * coefficient).trunc() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ItemCounts;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 固定費率: 紙箱=1, 床=3, 腳踏車=2, 洗衣機=2
    struct FixedRates {
        coefficient: f64,
        option_fee: u64,
        tiers: Vec<(u64, u64)>,
        region_km: Option<f64>,
        lookups: AtomicUsize,
    }

    impl FixedRates {
        fn new(coefficient: f64) -> Self {
            Self {
                coefficient,
                option_fee: 500,
                tiers: vec![(5, 2000), (10, 3000), (40, 8000), (100, 15000)],
                region_km: Some(10.7),
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RateLookupProvider for FixedRates {
        async fn box_factor(&self, category: PackageCategory) -> Result<u32> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(match category {
                PackageCategory::Box => 1,
                PackageCategory::Bed => 3,
                PackageCategory::Bicycle => 2,
                PackageCategory::WashingMachine => 2,
            })
        }

        async fn truck_price(&self, total_boxes: u64) -> Result<u64> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.tiers
                .iter()
                .find(|(max, _)| total_boxes <= *max)
                .map(|(_, price)| *price)
                .ok_or_else(|| EstimateError::not_found("truck tier", total_boxes))
        }

        async fn optional_service_fee(&self, _service: OptionalService) -> Result<u64> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.option_fee)
        }

        async fn season_coefficient(&self, _date: NaiveDate) -> Result<f64> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.coefficient)
        }

        async fn distance_between_regions(&self, origin: &str, destination: &str) -> Result<f64> {
            self.region_km.ok_or_else(|| {
                EstimateError::not_found("region distance", format!("{}-{}", origin, destination))
            })
        }
    }

    /// 換算 6 箱，對應 3000 的級距
    fn six_box_request(installation: bool) -> MoveRequest {
        MoveRequest {
            origin: Location::Region("11".to_string()),
            destination: Location::Region("13".to_string()),
            moving_date: NaiveDate::from_ymd_opt(2026, 6, 10).unwrap(),
            items: ItemCounts {
                boxes: 3,
                bed: 1,
                bicycle: 0,
                washing_machine: 0,
            },
            washing_machine_installation: installation,
        }
    }

    #[tokio::test]
    async fn test_distance_price_per_km() {
        let rates = FixedRates::new(1.0);
        let breakdown = PricingEngine::new()
            .price_from_distance(&six_box_request(false), 10.0, &rates)
            .await
            .unwrap();
        assert_eq!(breakdown.distance_component, 1000);
    }

    #[tokio::test]
    async fn test_neutral_season_without_option() {
        let rates = FixedRates::new(1.0);
        let breakdown = PricingEngine::new()
            .price_from_distance(&six_box_request(false), 10.0, &rates)
            .await
            .unwrap();
        assert_eq!(breakdown.as_array(), [4000, 1000, 3000, 0]);
    }

    #[tokio::test]
    async fn test_option_fee_added_unscaled() {
        let rates = FixedRates::new(1.0);
        let breakdown = PricingEngine::new()
            .price_from_distance(&six_box_request(true), 10.0, &rates)
            .await
            .unwrap();
        assert_eq!(breakdown.as_array(), [4500, 1000, 3000, 500]);

        let peak = FixedRates::new(1.5);
        let breakdown = PricingEngine::new()
            .price_from_distance(&six_box_request(true), 10.0, &peak)
            .await
            .unwrap();
        assert_eq!(breakdown.option_component, 500);
        assert_eq!(breakdown.total, 6000 + 500);
    }

    #[tokio::test]
    async fn test_peak_season_coefficient() {
        let rates = FixedRates::new(1.1);
        let breakdown = PricingEngine::new()
            .price_from_distance(&six_box_request(false), 10.0, &rates)
            .await
            .unwrap();
        assert_eq!(breakdown.distance_component, 1100);
        assert_eq!(breakdown.cargo_component, 3300);
        assert_eq!(breakdown.total, 4400);
    }

    #[tokio::test]
    async fn test_fractional_distance_is_truncated() {
        let rates = FixedRates::new(1.0);
        let breakdown = PricingEngine::new()
            .price_from_distance(&six_box_request(false), 10.99, &rates)
            .await
            .unwrap();
        assert_eq!(breakdown.distance_component, 1000);
    }

    #[test]
    fn test_total_uses_combined_sum() {
        // 112.5 -> 112, 3379.5 -> 3379, 3492.0 -> 3492
        let snapshot = RateSnapshot {
            box_factors: Vec::new(),
            total_boxes: 6,
            truck_price: 3004,
            option_fee: 0,
            season_coefficient: 1.125,
        };
        let breakdown = PricingEngine::apply_formula(1, &snapshot).unwrap();
        assert_eq!(breakdown.distance_component, 112);
        assert_eq!(breakdown.cargo_component, 3379);
        assert_eq!(breakdown.total, 3492);
        assert_eq!(breakdown.total - breakdown.component_sum(), 1);
    }

    #[test]
    fn test_price_overflow_is_an_input_error() {
        let snapshot = RateSnapshot {
            box_factors: Vec::new(),
            total_boxes: 6,
            truck_price: u64::MAX - 50,
            option_fee: 0,
            season_coefficient: 1.0,
        };
        assert!(matches!(
            PricingEngine::apply_formula(1, &snapshot),
            Err(EstimateError::InvalidInput { .. })
        ));

        let snapshot = RateSnapshot {
            box_factors: Vec::new(),
            total_boxes: 6,
            truck_price: 3000,
            option_fee: u64::MAX,
            season_coefficient: 1.0,
        };
        assert!(matches!(
            PricingEngine::apply_formula(1, &snapshot),
            Err(EstimateError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_snapshot_records_factor_per_category() {
        let rates = FixedRates::new(1.0);
        let snapshot = PricingEngine::fetch_rates(&six_box_request(false), &rates)
            .await
            .unwrap();
        assert_eq!(
            snapshot.box_factors,
            vec![
                (PackageCategory::Box, 1),
                (PackageCategory::Bed, 3),
                (PackageCategory::Bicycle, 2),
                (PackageCategory::WashingMachine, 2),
            ]
        );
        assert_eq!(snapshot.total_boxes, 6);
        assert_eq!(snapshot.truck_price, 3000);
    }

    #[test]
    fn test_truncation_bound_holds() {
        for coefficient in [1.0, 1.05, 1.1, 1.125, 1.2, 1.3, 1.5, 0.9] {
            for distance in [0u64, 1, 7, 33, 250] {
                for truck_price in [0u64, 2999, 3004, 15001] {
                    let snapshot = RateSnapshot {
                        box_factors: Vec::new(),
                        total_boxes: 0,
                        truck_price,
                        option_fee: 700,
                        season_coefficient: coefficient,
                    };
                    let b = PricingEngine::apply_formula(distance, &snapshot).unwrap();
                    let diff = b.total as i64 - b.component_sum() as i64;
                    assert!(diff.abs() <= 1, "coefficient {} gave diff {}", coefficient, diff);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_more_items_never_cost_less() {
        let rates = FixedRates::new(1.3);
        let engine = PricingEngine::new();
        let mut request = six_box_request(false);
        let mut previous = 0;
        for boxes in 0..=60 {
            request.items.boxes = boxes;
            let breakdown = engine.price_from_distance(&request, 25.0, &rates).await.unwrap();
            assert!(breakdown.total >= previous);
            previous = breakdown.total;
        }
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_output() {
        let rates = FixedRates::new(1.2);
        let engine = PricingEngine::new();
        let request = six_box_request(true);
        let first = engine.price_from_distance(&request, 42.5, &rates).await.unwrap();
        let second = engine.price_from_distance(&request, 42.5, &rates).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_neutral_season_keeps_raw_prices() {
        let rates = FixedRates::new(1.0);
        let mut request = six_box_request(false);
        request.items.bicycle = 4;
        let breakdown = PricingEngine::new()
            .price_from_distance(&request, 37.2, &rates)
            .await
            .unwrap();
        // 3 + 3 + 8 = 14 箱 -> 8000
        assert_eq!(breakdown.distance_component, 3700);
        assert_eq!(breakdown.cargo_component, 8000);
    }

    #[tokio::test]
    async fn test_box_total_outside_tiers_fails() {
        let rates = FixedRates::new(1.0);
        let mut request = six_box_request(false);
        request.items.boxes = 500;
        let result = PricingEngine::new()
            .price_from_distance(&request, 10.0, &rates)
            .await;
        assert!(matches!(result, Err(EstimateError::LookupNotFound { .. })));
    }

    #[tokio::test]
    async fn test_negative_distance_rejected_before_lookups() {
        let rates = FixedRates::new(1.0);
        let result = PricingEngine::new()
            .price_from_distance(&six_box_request(false), -1.0, &rates)
            .await;
        assert!(matches!(result, Err(EstimateError::InvalidInput { .. })));
        assert_eq!(rates.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_positive_coefficient_rejected() {
        let rates = FixedRates::new(0.0);
        let result = PricingEngine::new()
            .price_from_distance(&six_box_request(false), 10.0, &rates)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_price_from_region_locations() {
        let rates = FixedRates::new(1.0);
        let breakdown = PricingEngine::new()
            .price_from_locations(&six_box_request(false), &rates)
            .await
            .unwrap();
        assert_eq!(breakdown.as_array(), [4000, 1000, 3000, 0]);
    }

    #[tokio::test]
    async fn test_unknown_region_pair_gives_no_breakdown() {
        let mut rates = FixedRates::new(1.0);
        rates.region_km = None;
        let result = PricingEngine::new()
            .price_from_locations(&six_box_request(false), &rates)
            .await;
        assert!(matches!(result, Err(EstimateError::LookupNotFound { .. })));
    }

    #[tokio::test]
    async fn test_postal_locations_rejected_by_region_path() {
        let rates = FixedRates::new(1.0);
        let mut request = six_box_request(false);
        request.origin = Location::PostalCode("3300854".to_string());
        request.destination = Location::PostalCode("3590000".to_string());
        let result = PricingEngine::new().price_from_locations(&request, &rates).await;
        assert!(matches!(result, Err(EstimateError::InvalidInput { .. })));

        request.destination = Location::Region("13".to_string());
        let result = PricingEngine::new().price_from_locations(&request, &rates).await;
        assert!(matches!(result, Err(EstimateError::MixedLocationKinds)));
    }
}
