use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use thiserror::Error;

use disasterhub_types::geo::Coordinates;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Geolocation is not supported in this environment")]
    Unsupported,

    #[error("Unable to retrieve your location")]
    Unavailable,
}

/// One-shot position lookup. No retries, no tracking.
pub trait GeolocationProvider: Send + Sync {
    fn resolve(&self) -> BoxFuture<'_, Result<Coordinates, GeolocationError>>;
}

/// Position configured at startup. Without one, lookups are unsupported.
#[derive(Debug, Clone, Default)]
pub struct FixedLocation {
    position: Option<(f64, f64)>,
}

impl FixedLocation {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self {
            position: latitude.zip(longitude),
        }
    }

    pub fn unsupported() -> Self {
        Self::default()
    }
}

impl GeolocationProvider for FixedLocation {
    fn resolve(&self) -> BoxFuture<'_, Result<Coordinates, GeolocationError>> {
        let result = match self.position {
            None => Err(GeolocationError::Unsupported),
            Some((lat, lng)) => Coordinates::new(lat, lng).ok_or(GeolocationError::Unavailable),
        };
        async move { result }.boxed()
    }
}
