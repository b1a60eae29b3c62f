use crate::analyzers::labels::marker_text;
use crate::analyzers::GeoView;
use crate::error::Result;
use crate::utils::constants::{MAP_MARKER_RADIUS, MAP_MAX_ZOOM, MAP_MIN_ZOOM, MAP_ZOOM_START};
use crate::utils::GeographicExtent;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const MARKER_CLUSTER_CSS: &[&str] = &[
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css",
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css",
];
const MARKER_CLUSTER_JS: &str =
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js";
const MARKER_COLOR: &str = "blue";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

#[derive(Serialize)]
struct Marker<'a> {
    station: &'a str,
    lat: f64,
    lon: f64,
    label: String,
}

/// Renders a geographic view as a standalone Leaflet page with clustered markers
#[derive(Debug, Default)]
pub struct MapWriter;

impl MapWriter {
    pub fn new() -> Self {
        Self
    }

    /// HTML document for the view; `None` when it has no points
    pub fn render(&self, view: &GeoView) -> Result<Option<String>> {
        let extent = match GeographicExtent::from_points(
            view.points.iter().map(|p| (p.latitude, p.longitude)),
        ) {
            Some(extent) => extent,
            None => return Ok(None),
        };

        let markers: Vec<Marker<'_>> = view
            .points
            .iter()
            .map(|p| Marker {
                station: &p.station,
                lat: p.latitude,
                lon: p.longitude,
                label: marker_text(&p.station, p.value),
            })
            .collect();
        // Keep "</script>" inside labels from closing the script block
        let markers_json = serde_json::to_string(&markers)?.replace("</", "<\\/");

        let (center_lat, center_lon) = extent.center;
        let (south, west) = extent.south_west;
        let (north, east) = extent.north_east;

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="{css}">
<link rel="stylesheet" href="{cluster_css}">
<link rel="stylesheet" href="{cluster_default_css}">
<script src="{js}"></script>
<script src="{cluster_js}"></script>
<style>html, body, #map {{ width: 100%; height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map", {{center: [{center_lat}, {center_lon}], zoom: {zoom}, minZoom: {min_zoom}, maxZoom: {max_zoom}}});
L.tileLayer("{tiles}", {{attribution: "{attribution}"}}).addTo(map);
map.fitBounds([[{south}, {west}], [{north}, {east}]]);
var cluster = L.markerClusterGroup();
var markers = {markers};
markers.forEach(function (m) {{
    L.circleMarker([m.lat, m.lon], {{radius: {radius}, color: "{color}", fill: true, fillColor: "{color}", fillOpacity: 0.6}})
        .bindTooltip(m.label)
        .bindPopup(m.label)
        .addTo(cluster);
}});
map.addLayer(cluster);
</script>
</body>
</html>
"#,
            title = html_escape(&view.heading),
            css = LEAFLET_CSS,
            js = LEAFLET_JS,
            cluster_css = MARKER_CLUSTER_CSS[0],
            cluster_default_css = MARKER_CLUSTER_CSS[1],
            cluster_js = MARKER_CLUSTER_JS,
            center_lat = center_lat,
            center_lon = center_lon,
            zoom = MAP_ZOOM_START,
            min_zoom = MAP_MIN_ZOOM,
            max_zoom = MAP_MAX_ZOOM,
            tiles = TILE_URL,
            attribution = TILE_ATTRIBUTION,
            south = south,
            west = west,
            north = north,
            east = east,
            markers = markers_json,
            radius = MAP_MARKER_RADIUS,
            color = MARKER_COLOR,
        );

        Ok(Some(html))
    }
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// How a map request was satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOutcome {
    /// Existing file returned unchanged
    Cached(String),
    /// Newly rendered and written
    Rendered(String),
    /// Nothing to draw; no file written
    NoData,
}

impl MapOutcome {
    pub fn html(&self) -> Option<&str> {
        match self {
            MapOutcome::Cached(html) | MapOutcome::Rendered(html) => Some(html),
            MapOutcome::NoData => None,
        }
    }
}

/// File-backed map document cache.
///
/// Only an existence check guards the file, so concurrent processes may race.
pub struct MapCache {
    path: PathBuf,
}

impl MapCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached document if present, otherwise render, write and return it
    pub async fn get_or_render(&self, view: &GeoView, writer: &MapWriter) -> Result<MapOutcome> {
        if fs::try_exists(&self.path).await? {
            let html = fs::read_to_string(&self.path).await?;
            debug!(path = %self.path.display(), "Map cache hit");
            return Ok(MapOutcome::Cached(html));
        }

        let html = match writer.render(view)? {
            Some(html) => html,
            None => return Ok(MapOutcome::NoData),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, &html).await?;
        info!(path = %self.path.display(), markers = view.points.len(), "Wrote map document");

        Ok(MapOutcome::Rendered(html))
    }

    /// Remove the cached document; `true` if one existed
    pub async fn invalidate(&self) -> Result<bool> {
        if fs::try_exists(&self.path).await? {
            fs::remove_file(&self.path).await?;
            debug!(path = %self.path.display(), "Map cache cleared");
            return Ok(true);
        }
        Ok(false)
    }
}
