//! GeoJSON output for marker layers.

use crate::error::Result;
use crate::partition::ClusterLayers;
use geocluster_types::point::{ClusterSummary, LabeledPoint};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, json};

pub const ID_PROPERTY: &str = "id";
pub const LABEL_PROPERTY: &str = "label";
pub const COUNT_PROPERTY: &str = "count";
/// Index of the group a member belongs to in the flattened collection
pub const GROUP_PROPERTY: &str = "group";

fn feature(x: f64, y: f64, props: Map<String, serde_json::Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![x, y]))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// A point feature carrying the document id and label.
pub fn point_feature(point: &LabeledPoint) -> Feature {
    let mut props = Map::new();
    props.insert(ID_PROPERTY.to_string(), json!(point.id));
    props.insert(LABEL_PROPERTY.to_string(), json!(point.label));
    feature(point.x(), point.y(), props)
}

/// A point feature at the centroid carrying only the count.
pub fn cluster_feature(cluster: &ClusterSummary) -> Feature {
    let mut props = Map::new();
    props.insert(COUNT_PROPERTY.to_string(), json!(cluster.count));
    feature(cluster.centroid.x(), cluster.centroid.y(), props)
}

/// One collection per layer; every group gets its own collection.
pub fn layer_collections(
    layers: &ClusterLayers,
) -> (FeatureCollection, Vec<FeatureCollection>, FeatureCollection) {
    let points = collection(layers.points.iter().map(point_feature).collect());
    let groups = layers
        .groups
        .iter()
        .map(|g| collection(g.iter().map(point_feature).collect()))
        .collect();
    let clusters = collection(layers.clusters.iter().map(cluster_feature).collect());
    (points, groups, clusters)
}

/// Serialize layers as `{"points": FC, "groups": [FC, ..], "clusters": FC}`.
pub fn layers_to_geojson(layers: &ClusterLayers) -> Result<String> {
    let (points, groups, clusters) = layer_collections(layers);
    let mut body = Map::new();
    body.insert("points".to_string(), serde_json::to_value(points)?);
    body.insert("groups".to_string(), serde_json::to_value(groups)?);
    body.insert("clusters".to_string(), serde_json::to_value(clusters)?);
    Ok(serde_json::to_string(&body)?)
}

/// Everything in a single collection. Group members carry the index of
/// their group so a client can still tell them apart from lone points.
pub fn layers_to_feature_collection(layers: &ClusterLayers) -> FeatureCollection {
    let mut features: Vec<Feature> = layers.points.iter().map(point_feature).collect();

    for (idx, group) in layers.groups.iter().enumerate() {
        for member in group {
            let mut f = point_feature(member);
            if let Some(props) = f.properties.as_mut() {
                props.insert(GROUP_PROPERTY.to_string(), json!(idx));
            }
            features.push(f);
        }
    }

    features.extend(layers.clusters.iter().map(cluster_feature));
    collection(features)
}
