//! HTTP surface: route registration and the three sprite endpoints

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use image::{ImageFormat, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use crate::assets::{AssetCatalog, AssetClass};
use crate::compositor;
use crate::error::RequestError;
use crate::params::{validate, Field};
use crate::tint::{tint_image, Tint};

const ICON_FIELDS: [Field; 4] = [
    Field::channel("r", "R"),
    Field::channel("g", "G"),
    Field::channel("b", "B"),
    Field::id("id", "ID", -4, 8),
];

const OVERLAY_FIELDS: [Field; 4] = [
    Field::channel("r", "R"),
    Field::channel("g", "G"),
    Field::channel("b", "B"),
    Field::id("id", "ID", 1, 14),
];

// Declaration order fixes the error-reporting order: the six color
// channels first, then the two ids.
const COMBINED_FIELDS: [Field; 8] = [
    Field::channel("br", "Bird R"),
    Field::channel("bg", "Bird G"),
    Field::channel("bb", "Bird B"),
    Field::channel("or", "Overlay R"),
    Field::channel("og", "Overlay G"),
    Field::channel("ob", "Overlay B"),
    Field::id("bid", "Bird ID", -4, 8),
    Field::id("oid", "Overlay ID", 1, 14),
];

/// Build the service router over an immutable asset catalog.
pub fn router(catalog: AssetCatalog) -> Router {
    Router::new()
        .route("/icon", get(icon))
        .route("/overlay", get(overlay))
        .route("/iconandoverlay", get(icon_and_overlay))
        .with_state(Arc::new(catalog))
}

type RawQuery = Query<HashMap<String, String>>;

async fn icon(
    State(catalog): State<Arc<AssetCatalog>>,
    Query(query): RawQuery,
) -> Result<Response, RequestError> {
    let values = validate(&query, &ICON_FIELDS)?;
    let mut image = catalog.load(AssetClass::Icon, values[3])?;
    tint_image(&mut image, channel_tint(&values[0..3]));
    png_response(&image)
}

async fn overlay(
    State(catalog): State<Arc<AssetCatalog>>,
    Query(query): RawQuery,
) -> Result<Response, RequestError> {
    let values = validate(&query, &OVERLAY_FIELDS)?;
    let mut image = catalog.load(AssetClass::Overlay, values[3])?;
    tint_image(&mut image, channel_tint(&values[0..3]));
    png_response(&image)
}

async fn icon_and_overlay(
    State(catalog): State<Arc<AssetCatalog>>,
    Query(query): RawQuery,
) -> Result<Response, RequestError> {
    let values = validate(&query, &COMBINED_FIELDS)?;
    let (bird_id, overlay_id) = (values[6], values[7]);

    let mut base = catalog.load(AssetClass::Icon, bird_id)?;
    let mut overlay = catalog.load(AssetClass::Overlay, overlay_id)?;
    tint_image(&mut base, channel_tint(&values[0..3]));
    tint_image(&mut overlay, channel_tint(&values[3..6]));
    compositor::composite(&mut base, &overlay, overlay_id);
    png_response(&base)
}

/// Validated channel values are 0-255 by construction.
fn channel_tint(channels: &[i64]) -> Tint {
    Tint::from_rgb(channels[0] as u8, channels[1] as u8, channels[2] as u8)
}

fn png_response(image: &RgbaImage) -> Result<Response, RequestError> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok((
        [(header::CONTENT_TYPE, "image/png")],
        bytes.into_inner(),
    )
        .into_response())
}
