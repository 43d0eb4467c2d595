//! Great-circle distance between two coordinate pairs.

use serde::{Deserialize, Serialize};

use crate::search::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;
const MILES_PER_KM: f64 = 0.621_371;
const METERS_PER_KM: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi")]
    Miles,
    #[serde(rename = "m")]
    Meters,
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceUnit::Kilometers => write!(f, "km"),
            DistanceUnit::Miles => write!(f, "mi"),
            DistanceUnit::Meters => write!(f, "m"),
        }
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "km" | "kilometers" => Ok(DistanceUnit::Kilometers),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            "m" | "meters" => Ok(DistanceUnit::Meters),
            other => Err(format!("unknown distance unit '{other}'")),
        }
    }
}

/// Haversine distance between `a` and `b`, rounded to two decimal places.
///
/// Inputs are signed decimal degrees. No range validation is performed.
#[must_use]
pub fn distance(a: Coordinates, b: Coordinates, unit: DistanceUnit) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    let km = EARTH_RADIUS_KM * c;

    let value = match unit {
        DistanceUnit::Kilometers => km,
        DistanceUnit::Miles => km * MILES_PER_KM,
        DistanceUnit::Meters => km * METERS_PER_KM,
    };

    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAN_FRANCISCO: Coordinates = Coordinates {
        latitude: 37.774_9,
        longitude: -122.419_4,
    };
    const LOS_ANGELES: Coordinates = Coordinates {
        latitude: 34.052_2,
        longitude: -118.243_7,
    };
    const SYDNEY: Coordinates = Coordinates {
        latitude: -33.868_8,
        longitude: 151.209_3,
    };

    #[test]
    fn same_point_is_zero() {
        assert!(
            distance(SAN_FRANCISCO, SAN_FRANCISCO, DistanceUnit::Kilometers).abs() < f64::EPSILON
        );
        assert!(distance(SYDNEY, SYDNEY, DistanceUnit::Meters).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (SAN_FRANCISCO, LOS_ANGELES),
            (LOS_ANGELES, SYDNEY),
            (SYDNEY, SAN_FRANCISCO),
        ];
        for (a, b) in pairs {
            let ab = distance(a, b, DistanceUnit::Kilometers);
            let ba = distance(b, a, DistanceUnit::Kilometers);
            assert!((ab - ba).abs() < 0.011, "{ab} vs {ba}");
        }
    }

    #[test]
    fn san_francisco_to_los_angeles_is_about_559_km() {
        let km = distance(SAN_FRANCISCO, LOS_ANGELES, DistanceUnit::Kilometers);
        assert!((km - 559.1).abs() < 1.0, "got {km}");
    }

    #[test]
    fn miles_track_kilometers() {
        let pairs = [(SAN_FRANCISCO, LOS_ANGELES), (LOS_ANGELES, SYDNEY)];
        for (a, b) in pairs {
            let km = distance(a, b, DistanceUnit::Kilometers);
            let mi = distance(a, b, DistanceUnit::Miles);
            assert!((mi - km * MILES_PER_KM).abs() < 0.02, "{mi} vs {km}");
        }
    }

    #[test]
    fn meters_track_kilometers() {
        let km = distance(SAN_FRANCISCO, LOS_ANGELES, DistanceUnit::Kilometers);
        let m = distance(SAN_FRANCISCO, LOS_ANGELES, DistanceUnit::Meters);
        assert!((m - km * 1000.0).abs() < 10.0, "{m} vs {km}");
    }

    #[test]
    fn result_is_rounded_to_two_decimals() {
        let km = distance(SAN_FRANCISCO, LOS_ANGELES, DistanceUnit::Kilometers);
        assert!(((km * 100.0).round() - km * 100.0).abs() < 1e-6);
    }

    #[test]
    fn unit_round_trips_through_str() {
        for unit in [DistanceUnit::Kilometers, DistanceUnit::Miles, DistanceUnit::Meters] {
            assert_eq!(unit.to_string().parse::<DistanceUnit>().unwrap(), unit);
        }
        assert!("furlongs".parse::<DistanceUnit>().is_err());
    }
}
