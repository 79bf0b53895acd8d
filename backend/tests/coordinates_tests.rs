//! Coordinate handling properties
//!
//! Covers:
//! - Any in-range coordinate pair in query form is accepted as written
//! - Out-of-range latitudes are rejected and name the `lat` field
//! - Saved coordinates keep their string form and stay owner-only

use proptest::prelude::*;
use std::sync::Arc;

use shared::NewSavedLocation;
use weather_server::handlers::query::CoordinatesQuery;
use weather_server::services::SavedLocationService;
use weather_server::storage::MemoryStorage;
use weather_server::AppError;

/// Four-decimal coordinate strings within `[-limit, limit]`
fn coordinate_strategy(limit: i32) -> impl Strategy<Value = String> {
    (-limit * 10_000..=limit * 10_000).prop_map(|v| format!("{:.4}", v as f64 / 10_000.0))
}

fn query(lat: &str, lon: &str) -> CoordinatesQuery {
    CoordinatesQuery {
        lat: Some(lat.to_string()),
        lon: Some(lon.to_string()),
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn test_in_range_coordinates_accepted(
        lat in coordinate_strategy(90),
        lon in coordinate_strategy(180),
    ) {
        let (parsed_lat, parsed_lon) = query(&lat, &lon).coordinates().unwrap();
        prop_assert_eq!(parsed_lat, lat.parse::<f64>().unwrap());
        prop_assert_eq!(parsed_lon, lon.parse::<f64>().unwrap());
    }

    #[test]
    fn test_out_of_range_latitude_names_field(
        excess in 1i32..10_000_000,
        negative in any::<bool>(),
        lon in coordinate_strategy(180),
    ) {
        let magnitude = 90.0 + excess as f64 / 10_000.0;
        let lat = format!("{:.4}", if negative { -magnitude } else { magnitude });

        let err = query(&lat, &lon).coordinates().unwrap_err();
        prop_assert!(matches!(err, AppError::Validation { ref field, .. } if field == "lat"), "expected Validation error on field lat, got {:?}", err);
    }

    #[test]
    fn test_saved_location_owner_only(
        lat in coordinate_strategy(90),
        lon in coordinate_strategy(180),
        owner in 1i64..1_000,
        other in 1_000i64..2_000,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let service = SavedLocationService::new(Arc::new(MemoryStorage::new()));
            let saved = service
                .create(
                    owner,
                    NewSavedLocation {
                        name: "Somewhere".to_string(),
                        city: "Somewhere".to_string(),
                        country: "XX".to_string(),
                        lat: lat.clone(),
                        lon: lon.clone(),
                    },
                )
                .await
                .unwrap();

            assert_eq!(saved.lat, lat);
            assert_eq!(saved.lon, lon);
            assert!(matches!(
                service.get_owned(other, saved.id).await,
                Err(AppError::Forbidden(_))
            ));
            assert!(matches!(
                service.delete(other, saved.id).await,
                Err(AppError::Forbidden(_))
            ));
            assert_eq!(service.get_owned(owner, saved.id).await.unwrap().id, saved.id);
        });
    }
}
