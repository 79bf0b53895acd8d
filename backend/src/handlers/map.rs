//! Weather map tile proxy
//!
//! Tiles are fetched server-side so the provider credential never reaches
//! the browser.

use axum::{
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use shared::{MapLayer, TileCoordinate};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// `GET /api/map/tiles/:layer/:z/:x/:y[.png]`
pub async fn get_map_tile(
    State(state): State<AppState>,
    WithRejection(Path((layer, z, x, y)), _): WithRejection<
        Path<(String, String, String, String)>,
        AppError,
    >,
) -> AppResult<impl IntoResponse> {
    let layer: MapLayer = layer
        .parse()
        .map_err(|e: shared::ParseMapLayerError| AppError::InvalidRequest(e.to_string()))?;
    let tile = parse_tile(&z, &x, &y)?;

    let png = state.gateway.fetch_tile(layer, tile).await?;

    Ok((
        [
            (CONTENT_TYPE, "image/png"),
            (CACHE_CONTROL, "public, max-age=600"),
        ],
        png,
    ))
}

fn parse_tile(z: &str, x: &str, y: &str) -> AppResult<TileCoordinate> {
    let y = y.strip_suffix(".png").unwrap_or(y);
    let invalid = || AppError::InvalidRequest("Invalid tile coordinates".to_string());

    Ok(TileCoordinate {
        z: z.parse().map_err(|_| invalid())?,
        x: x.parse().map_err(|_| invalid())?,
        y: y.parse().map_err(|_| invalid())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tile_strips_extension() {
        assert_eq!(
            parse_tile("3", "2", "5.png").unwrap(),
            TileCoordinate { z: 3, x: 2, y: 5 }
        );
        assert_eq!(parse_tile("0", "0", "0").unwrap(), TileCoordinate { z: 0, x: 0, y: 0 });
        assert!(parse_tile("z", "0", "0").is_err());
        assert!(parse_tile("1", "-1", "0").is_err());
    }
}
