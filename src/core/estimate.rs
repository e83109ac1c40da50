use crate::core::distance;
use crate::core::pricing::PricingEngine;
use crate::domain::model::{Location, MoveRequest, PriceBreakdown};
use crate::domain::ports::{CoordinateResolver, RateLookupProvider};
use crate::utils::error::{EstimateError, Result};

/// 依地點種類決定距離來源，再交給 PricingEngine 計價
pub struct EstimateService<R: RateLookupProvider, C: CoordinateResolver> {
    rates: R,
    resolver: C,
    engine: PricingEngine,
}

impl<R: RateLookupProvider, C: CoordinateResolver> EstimateService<R, C> {
    pub fn new(rates: R, resolver: C) -> Self {
        Self {
            rates,
            resolver,
            engine: PricingEngine::new(),
        }
    }

    pub async fn estimate(&self, request: &MoveRequest) -> Result<PriceBreakdown> {
        tracing::debug!(
            "Estimating move {} -> {} on {}",
            request.origin,
            request.destination,
            request.moving_date
        );

        let breakdown = match (&request.origin, &request.destination) {
            (Location::Region(_), Location::Region(_)) => {
                self.engine.price_from_locations(request, &self.rates).await?
            }
            (Location::PostalCode(_), Location::PostalCode(_)) => {
                let distance_km = self.distance_for(request).await?;
                self.engine
                    .price_from_distance(request, distance_km, &self.rates)
                    .await?
            }
            _ => return Err(EstimateError::MixedLocationKinds),
        };

        tracing::info!(
            "💴 Estimate: total={} distance={} cargo={} option={}",
            breakdown.total,
            breakdown.distance_component,
            breakdown.cargo_component,
            breakdown.option_component
        );
        Ok(breakdown)
    }

    /// 搬出地到搬入地的距離 (km，未捨去)
    pub async fn distance_for(&self, request: &MoveRequest) -> Result<f64> {
        match (&request.origin, &request.destination) {
            (Location::Region(origin), Location::Region(destination)) => {
                self.rates.distance_between_regions(origin, destination).await
            }
            (Location::PostalCode(origin), Location::PostalCode(destination)) => {
                let from = self.resolver.resolve(origin).await?;
                tracing::debug!("📍 {} -> ({}, {})", origin, from.latitude, from.longitude);
                let to = self.resolver.resolve(destination).await?;
                tracing::debug!("📍 {} -> ({}, {})", destination, to.latitude, to.longitude);

                let km = distance::distance_between(&from, &to)?;
                tracing::debug!("Great-circle distance: {:.3} km", km);
                Ok(km)
            }
            _ => Err(EstimateError::MixedLocationKinds),
        }
    }
}
