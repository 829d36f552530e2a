//! Map scene construction and rendering sinks
//!
//! A [`MapScene`] is the complete, renderer-agnostic description of what the
//! map shows: the focused center, its coverage circle, one marker per visible
//! shop and, when a shop is selected, the path to its nearest center. Any
//! [`MapRenderer`] can draw it; [`GeoJsonRenderer`] emits a GeoJSON
//! `FeatureCollection` for web map libraries.

use crate::config::MapConfig;
use crate::filter::RiskFilter;
use crate::model::{Center, Shop};
use crate::resolver::NearestResult;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Position, Value as GeoValue};
use riskmap_geo::GeoPoint;
use serde::Serialize;
use serde_json::{json, Value};

/// Color used for center markers and the coverage circle
pub const CENTER_COLOR: &str = "blue";

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Center,
    Shop,
}

/// A point marker with its popup text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub id: i64,
    pub point: GeoPoint,
    pub label: String,
    pub color: &'static str,
    pub icon: &'static str,
    pub popup: Vec<(String, String)>,
}

/// A circle around a point, radius in meters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub label: String,
    pub color: &'static str,
}

/// The line from a selected shop to its nearest center
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSegment {
    pub shop_id: i64,
    pub center_id: i64,
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub distance_km: f64,
    pub label: String,
}

/// One drawable element of the scene
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    Marker(Marker),
    Circle(Circle),
    Path(PathSegment),
}

/// Everything a renderer needs to draw the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub view_center: GeoPoint,
    pub zoom: u8,
    pub tiles: String,
    pub layers: Vec<Layer>,
}

impl MapScene {
    /// Build the scene around `focus`.
    ///
    /// `shops` is the full list; `filter` decides which of them get markers.
    /// A `selection` adds the path to its nearest center, plus a marker for
    /// that center when it is not the focused one. A selected shop hidden by
    /// `filter` adds nothing.
    pub fn build(
        focus: &Center,
        shops: &[Shop],
        filter: &RiskFilter,
        selection: Option<&NearestResult>,
        config: &MapConfig,
    ) -> Self {
        let mut layers = vec![
            Layer::Marker(center_marker(focus)),
            Layer::Circle(Circle {
                center: focus.location,
                radius_m: config.coverage_radius_m,
                label: format!("Coverage Area ({} radius)", format_radius(config.coverage_radius_m)),
                color: CENTER_COLOR,
            }),
        ];

        layers.extend(
            filter
                .apply(shops)
                .into_iter()
                .map(|shop| Layer::Marker(shop_marker(shop, config.analysis_preview_chars))),
        );

        if let Some(result) = selection.filter(|r| filter.allows(r.shop.risk)) {
            if result.center.id != focus.id {
                layers.push(Layer::Marker(center_marker(&result.center)));
            }
            layers.push(Layer::Path(PathSegment {
                shop_id: result.shop.id,
                center_id: result.center.id,
                from: result.shop.location,
                to: result.center.location,
                distance_km: result.distance_km,
                label: result.label().to_string(),
            }));
        }

        Self {
            view_center: focus.location,
            zoom: config.zoom,
            tiles: config.tiles.clone(),
            layers,
        }
    }

    /// Feed every layer to `renderer`, in scene order
    pub fn render_to<R: MapRenderer + ?Sized>(&self, renderer: &mut R) {
        renderer.begin(self);
        for layer in &self.layers {
            match layer {
                Layer::Marker(marker) => renderer.marker(marker),
                Layer::Circle(circle) => renderer.circle(circle),
                Layer::Path(path) => renderer.path(path),
            }
        }
    }

    /// Markers for shops only
    pub fn shop_markers(&self) -> impl Iterator<Item = &Marker> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Marker(m) if m.kind == MarkerKind::Shop => Some(m),
            _ => None,
        })
    }

    pub fn path(&self) -> Option<&PathSegment> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Path(p) => Some(p),
            _ => None,
        })
    }
}

/// Sink that draws a [`MapScene`]
pub trait MapRenderer {
    /// Called once before any layer
    fn begin(&mut self, _scene: &MapScene) {}

    fn marker(&mut self, marker: &Marker);

    fn circle(&mut self, circle: &Circle);

    fn path(&mut self, path: &PathSegment);
}

/// Renders a scene as a GeoJSON `FeatureCollection`
///
/// Positions follow GeoJSON order, `[longitude, latitude]`. Circles become
/// points with a `radius_m` property. The view (center, zoom, tiles) is kept
/// in the collection's `properties` member.
#[derive(Debug, Default)]
pub struct GeoJsonRenderer {
    view: Option<JsonObject>,
    features: Vec<Feature>,
}

impl GeoJsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `scene` and return the collection
    pub fn render(scene: &MapScene) -> FeatureCollection {
        let mut renderer = Self::new();
        scene.render_to(&mut renderer);
        renderer.finish()
    }

    pub fn finish(self) -> FeatureCollection {
        let foreign_members = self.view.map(|view| {
            let mut members = JsonObject::new();
            members.insert("properties".to_string(), Value::Object(view));
            members
        });
        FeatureCollection {
            bbox: None,
            features: self.features,
            foreign_members,
        }
    }

    fn push(&mut self, geometry: GeoValue, properties: Value) {
        self.features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(geometry)),
            id: None,
            properties: object(properties),
            foreign_members: None,
        });
    }
}

impl MapRenderer for GeoJsonRenderer {
    fn begin(&mut self, scene: &MapScene) {
        self.view = object(json!({
            "view_center": position(scene.view_center),
            "zoom": scene.zoom,
            "tiles": scene.tiles,
        }));
    }

    fn marker(&mut self, marker: &Marker) {
        let popup: JsonObject = marker
            .popup
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        self.push(
            GeoValue::Point(position(marker.point)),
            json!({
                "kind": marker.kind,
                "id": marker.id,
                "label": marker.label,
                "color": marker.color,
                "icon": marker.icon,
                "popup": popup,
            }),
        );
    }

    fn circle(&mut self, circle: &Circle) {
        self.push(
            GeoValue::Point(position(circle.center)),
            json!({
                "kind": "coverage",
                "label": circle.label,
                "color": circle.color,
                "radius_m": circle.radius_m,
            }),
        );
    }

    fn path(&mut self, path: &PathSegment) {
        self.push(
            GeoValue::LineString(vec![position(path.from), position(path.to)]),
            json!({
                "kind": "path",
                "shop_id": path.shop_id,
                "center_id": path.center_id,
                "distance_km": path.distance_km,
                "label": path.label,
            }),
        );
    }
}

fn position(point: GeoPoint) -> Position {
    vec![point.longitude, point.latitude]
}

fn object(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn format_radius(radius_m: f64) -> String {
    if radius_m >= 1000.0 {
        format!("{}km", radius_m / 1000.0)
    } else {
        format!("{radius_m}m")
    }
}

fn center_marker(center: &Center) -> Marker {
    Marker {
        kind: MarkerKind::Center,
        id: center.id,
        point: center.location,
        label: format!("Center: {}", center.name),
        color: CENTER_COLOR,
        icon: "shopping-cart",
        popup: vec![
            ("Center ID".to_string(), center.id.to_string()),
            ("Name".to_string(), center.name.clone()),
            ("Location".to_string(), format!("{:.4}", center.location)),
        ],
    }
}

fn shop_marker(shop: &Shop, preview_chars: usize) -> Marker {
    Marker {
        kind: MarkerKind::Shop,
        id: shop.id,
        point: shop.location,
        label: format!("{} {} (Risk: {})", shop.risk.emoji(), shop.name, shop.risk),
        color: shop.risk.color(),
        icon: shop.risk.icon(),
        popup: vec![
            ("Shop ID".to_string(), shop.id.to_string()),
            ("Risk Level".to_string(), shop.risk.label().to_string()),
            ("Location".to_string(), format!("{:.4}", shop.location)),
            ("Analysis Preview".to_string(), shop.analysis_preview(preview_chars)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskLevel;
    use crate::resolver::resolve;

    fn dallas() -> Center {
        Center {
            id: 1,
            name: "Dallas".to_string(),
            location: GeoPoint::new(32.7767, -96.7970),
        }
    }

    fn houston() -> Center {
        Center {
            id: 2,
            name: "Houston".to_string(),
            location: GeoPoint::new(29.7604, -95.3698),
        }
    }

    fn shops() -> Vec<Shop> {
        vec![
            Shop {
                id: 1,
                name: "Tech Electronics Store".to_string(),
                location: GeoPoint::new(32.7850, -96.8000),
                risk: RiskLevel::High,
                analysis: "x".repeat(150),
            },
            Shop {
                id: 2,
                name: "Fresh Grocery Mart".to_string(),
                location: GeoPoint::new(32.7700, -96.7800),
                risk: RiskLevel::Low,
                analysis: "Reliable".to_string(),
            },
            Shop {
                id: 3,
                name: "Bayou Outdoor Gear".to_string(),
                location: GeoPoint::new(29.7680, -95.3780),
                risk: RiskLevel::Unknown,
                analysis: String::new(),
            },
        ]
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl MapRenderer for Recorder {
        fn begin(&mut self, _scene: &MapScene) {
            self.calls.push("begin".to_string());
        }
        fn marker(&mut self, marker: &Marker) {
            self.calls.push(format!("marker:{}:{}", marker.id, marker.color));
        }
        fn circle(&mut self, circle: &Circle) {
            self.calls.push(format!("circle:{}", circle.radius_m));
        }
        fn path(&mut self, path: &PathSegment) {
            self.calls.push(format!("path:{}->{}", path.shop_id, path.center_id));
        }
    }

    #[test]
    fn test_scene_without_selection() {
        let scene = MapScene::build(&dallas(), &shops(), &RiskFilter::all(), None, &MapConfig::default());

        assert_eq!(scene.view_center, dallas().location);
        assert_eq!(scene.shop_markers().count(), 3);
        assert!(scene.path().is_none());
    }

    #[test]
    fn test_filter_hides_markers() {
        let filter = RiskFilter::hiding(false, false, true);
        let scene = MapScene::build(&dallas(), &shops(), &filter, None, &MapConfig::default());

        let ids: Vec<i64> = scene.shop_markers().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_shop_marker_colors_and_preview() {
        let scene = MapScene::build(&dallas(), &shops(), &RiskFilter::all(), None, &MapConfig::default());
        let markers: Vec<&Marker> = scene.shop_markers().collect();

        assert_eq!(markers[0].color, "red");
        assert_eq!(markers[1].color, "green");
        assert_eq!(markers[2].color, "gray");

        let preview = &markers[0].popup.iter().find(|(k, _)| k == "Analysis Preview").unwrap().1;
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_selection_draws_path_and_far_center() {
        let all_shops = shops();
        let centers = vec![dallas(), houston()];
        let selection = resolve(&all_shops[2], &centers).unwrap();

        let scene = MapScene::build(
            &dallas(),
            &all_shops,
            &RiskFilter::all(),
            Some(&selection),
            &MapConfig::default(),
        );

        let path = scene.path().unwrap();
        assert_eq!(path.shop_id, 3);
        assert_eq!(path.center_id, 2);
        assert_eq!(path.label, selection.label().to_string());

        let mut recorder = Recorder::default();
        scene.render_to(&mut recorder);
        assert_eq!(recorder.calls.first().unwrap(), "begin");
        assert!(recorder.calls.contains(&"marker:2:blue".to_string()));
        assert_eq!(recorder.calls.last().unwrap(), "path:3->2");
    }

    #[test]
    fn test_selection_at_focus_adds_no_extra_center() {
        let all_shops = shops();
        let selection = resolve(&all_shops[0], &[dallas()]).unwrap();
        let scene = MapScene::build(
            &dallas(),
            &all_shops,
            &RiskFilter::all(),
            Some(&selection),
            &MapConfig::default(),
        );

        let centers = scene
            .layers
            .iter()
            .filter(|l| matches!(l, Layer::Marker(m) if m.kind == MarkerKind::Center))
            .count();
        assert_eq!(centers, 1);
    }

    #[test]
    fn test_hidden_selection_draws_no_path() {
        let all_shops = shops();
        let selection = resolve(&all_shops[0], &[dallas(), houston()]).unwrap();
        assert_eq!(selection.center.id, 1);

        let scene = MapScene::build(
            &houston(),
            &all_shops,
            &RiskFilter::hiding(true, false, false),
            Some(&selection),
            &MapConfig::default(),
        );

        assert!(scene.path().is_none());
        assert!(scene.shop_markers().all(|m| m.id != 1));
        let centers: Vec<i64> = scene
            .layers
            .iter()
            .filter_map(|l| match l {
                Layer::Marker(m) if m.kind == MarkerKind::Center => Some(m.id),
                _ => None,
            })
            .collect();
        assert_eq!(centers, vec![2]);
    }

    #[test]
    fn test_geojson_output() {
        let all_shops = shops();
        let selection = resolve(&all_shops[0], &[dallas(), houston()]).unwrap();
        let scene = MapScene::build(
            &dallas(),
            &all_shops,
            &RiskFilter::all(),
            Some(&selection),
            &MapConfig::default(),
        );

        let collection = GeoJsonRenderer::render(&scene);
        assert_eq!(collection.features.len(), 6);
        assert!(matches!(
            collection.features[5].geometry.as_ref().map(|g| &g.value),
            Some(GeoValue::LineString(line)) if line.len() == 2
        ));

        let geojson = serde_json::to_value(&collection).unwrap();
        assert_eq!(geojson["type"], "FeatureCollection");
        assert_eq!(geojson["properties"]["zoom"], 13);

        let features = geojson["features"].as_array().unwrap();
        // center, coverage, three shops, path
        assert_eq!(features.len(), 6);

        let center = &features[0];
        assert_eq!(center["properties"]["kind"], "center");
        assert_eq!(center["geometry"]["coordinates"][0], -96.7970);
        assert_eq!(center["geometry"]["coordinates"][1], 32.7767);

        let coverage = &features[1];
        assert_eq!(coverage["properties"]["radius_m"], 2000.0);
        assert_eq!(coverage["properties"]["label"], "Coverage Area (2km radius)");

        let path = features.last().unwrap();
        assert_eq!(path["geometry"]["type"], "LineString");
        assert_eq!(path["properties"]["label"], "965 m (0.965 km)");
        assert_eq!(path["properties"]["shop_id"], 1);
    }
}
