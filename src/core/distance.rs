use crate::domain::model::Coordinates;
use crate::utils::error::{EstimateError, Result};

/// 地球平均半徑 [km]
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 兩點間的大圓距離 (haversine)，單位 km。
///
/// 回傳實數，捨去小數由呼叫端負責。座標超出範圍時回傳錯誤，不會當成 0 km。
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64> {
    check_coordinate(lat1, lon1)?;
    check_coordinate(lat2, lon2)?;

    if lat1 == lat2 && lon1 == lon2 {
        return Ok(0.0);
    }

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // 浮點誤差可能讓 a 稍微超過 1
    let c = 2.0 * a.sqrt().min(1.0).asin();

    Ok(EARTH_RADIUS_KM * c)
}

pub fn distance_between(from: &Coordinates, to: &Coordinates) -> Result<f64> {
    distance(from.latitude, from.longitude, to.latitude, to.longitude)
}

fn check_coordinate(latitude: f64, longitude: f64) -> Result<()> {
    let reason = if !latitude.is_finite() || !longitude.is_finite() {
        "coordinates must be finite numbers"
    } else if !(-90.0..=90.0).contains(&latitude) {
        "latitude out of range"
    } else if !(-180.0..=180.0).contains(&longitude) {
        "longitude out of range"
    } else {
        return Ok(());
    };

    Err(EstimateError::InvalidCoordinate {
        latitude,
        longitude,
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKYO: (f64, f64) = (35.6812, 139.7671);
    const OSAKA: (f64, f64) = (34.7025, 135.4959);
    const SAITAMA: (f64, f64) = (35.8617, 139.6455);

    #[test]
    fn test_identical_points_are_zero() {
        let d = distance(TOKYO.0, TOKYO.1, TOKYO.0, TOKYO.1).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_known_distance_tokyo_osaka() {
        let d = distance(TOKYO.0, TOKYO.1, OSAKA.0, OSAKA.1).unwrap();
        assert!(d > 395.0 && d < 410.0, "unexpected distance: {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = distance(TOKYO.0, TOKYO.1, SAITAMA.0, SAITAMA.1).unwrap();
        let back = distance(SAITAMA.0, SAITAMA.1, TOKYO.0, TOKYO.1).unwrap();
        assert!((there - back).abs() < 1e-9);
        assert!(there > 0.0);
    }

    #[test]
    fn test_antipodal_points() {
        let d = distance(0.0, 0.0, 0.0, 180.0).unwrap();
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_coordinates_fail() {
        assert!(matches!(
            distance(91.0, 0.0, 0.0, 0.0),
            Err(EstimateError::InvalidCoordinate { .. })
        ));
        assert!(distance(0.0, 0.0, 0.0, -180.5).is_err());
        assert!(distance(f64::NAN, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_distance_between_coordinates() {
        let from = Coordinates {
            latitude: TOKYO.0,
            longitude: TOKYO.1,
        };
        let to = Coordinates {
            latitude: OSAKA.0,
            longitude: OSAKA.1,
        };
        assert_eq!(
            distance_between(&from, &to).unwrap(),
            distance(TOKYO.0, TOKYO.1, OSAKA.0, OSAKA.1).unwrap()
        );
    }
}
