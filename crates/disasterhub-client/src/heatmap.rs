use std::f64::consts::PI;

use rand::Rng;

use disasterhub_types::geo::{Coordinates, Feature, FeatureCollection, GeoPoint, SeverityProperties};

pub const DEFAULT_RADIUS_KM: f64 = 2.0;
pub const DEFAULT_SAMPLES: usize = 100;

const KM_PER_DEGREE_LAT: f64 = 110.574;
const KM_PER_DEGREE_LNG_AT_EQUATOR: f64 = 111.320;

/// Random severity points around `center`. Severity falls off linearly
/// with distance; the center itself is appended with severity 1.
pub fn severity_heatmap<R: Rng + ?Sized>(
    center: Coordinates,
    radius_km: f64,
    samples: usize,
    rng: &mut R,
) -> FeatureCollection {
    let mut features = Vec::with_capacity(samples + 1);
    let lng_scale = KM_PER_DEGREE_LNG_AT_EQUATOR * (center.lat * PI / 180.0).cos();

    for _ in 0..samples {
        let angle = rng.random::<f64>() * 2.0 * PI;
        let distance = rng.random::<f64>() * radius_km;

        let lat = center.lat + (distance / KM_PER_DEGREE_LAT) * angle.cos();
        let lng = center.lng + (distance / lng_scale) * angle.sin();

        let severity = if radius_km > 0.0 { 1.0 - distance / radius_km } else { 1.0 };
        features.push(point_feature(Coordinates { lat, lng }, severity));
    }

    features.push(point_feature(center, 1.0));

    FeatureCollection {
        kind: "FeatureCollection".into(),
        features,
    }
}

fn point_feature(at: Coordinates, severity: f64) -> Feature {
    Feature {
        kind: "Feature".into(),
        geometry: GeoPoint::from(at),
        properties: SeverityProperties { severity },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn points_stay_within_radius() {
        let center = Coordinates { lat: 26.9, lng: 75.8 };
        let mut rng = StdRng::seed_from_u64(7);
        let fc = severity_heatmap(center, 2.0, 50, &mut rng);

        assert_eq!(fc.kind, "FeatureCollection");
        assert_eq!(fc.features.len(), 51);

        for f in &fc.features {
            let s = f.properties.severity;
            assert!((0.0..=1.0).contains(&s));
            let dlat_km = (f.geometry.coordinates[1] - center.lat) * KM_PER_DEGREE_LAT;
            assert!(dlat_km.abs() <= 2.0 + 1e-9);
        }

        let last = fc.features.last().unwrap();
        assert_eq!(last.properties.severity, 1.0);
        assert_eq!(last.geometry.coordinates, [75.8, 26.9]);
    }

    #[test]
    fn zero_radius_collapses_to_center() {
        let center = Coordinates { lat: 0.0, lng: 0.0 };
        let fc = severity_heatmap(center, 0.0, 3, &mut StdRng::seed_from_u64(1));
        assert!(fc.features.iter().all(|f| f.properties.severity == 1.0));
    }
}
