use geocluster::ingest::cell_center;
use geocluster::request::parse_bounds;
use geocluster::{
    BoundingBox2D, CellResult, ClusterError, ClusterRequest, Clusterer, Config, GroupedQuery,
    MemoryBackend, Point, SearchBackend, SearchDocument, resolution_table,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn maritimes_and_vancouver() -> MemoryBackend {
    MemoryBackend::with_documents(vec![
        SearchDocument::new("1", "Halifax", Point::new(-63.57, 44.65)),
        SearchDocument::new("2", "Dartmouth", Point::new(-63.57, 44.67)),
        SearchDocument::new("3", "Vancouver", Point::new(-123.12, 49.28)),
    ])
    .unwrap()
}

/// Documents on a regular lattice around Manhattan.
fn lattice(rows: usize, cols: usize, step: f64) -> MemoryBackend {
    let mut backend = MemoryBackend::new();
    for r in 0..rows {
        for c in 0..cols {
            let lon = -74.05 + c as f64 * step;
            let lat = 40.65 + r as f64 * step;
            backend
                .insert(SearchDocument::new(
                    format!("doc-{}-{}", r, c),
                    format!("Site {}/{}", r, c),
                    Point::new(lon, lat),
                ))
                .unwrap();
        }
    }
    backend
}

struct UnavailableBackend;

impl SearchBackend for UnavailableBackend {
    fn grouped_cells(&self, _query: &GroupedQuery) -> geocluster::Result<Vec<CellResult>> {
        Err(ClusterError::Backend("connection refused".to_string()))
    }
}

#[test]
fn test_world_view_clusters_nearby_documents() {
    init_logging();
    let clusterer = Clusterer::new(Config::default()).unwrap();
    let request = ClusterRequest::new(parse_bounds(None), 3);

    let outcome = clusterer.cluster(&maritimes_and_vancouver(), &request).unwrap();

    assert_eq!(outcome.layers.clusters.len(), 1);
    assert_eq!(outcome.layers.clusters[0].count, 2);
    assert_eq!(outcome.layers.points.len(), 1);
    assert_eq!(outcome.layers.points[0].label, "Vancouver");
    assert!(outcome.layers.groups.is_empty());
}

#[test]
fn test_cluster_centroid_uses_cell_mean() {
    init_logging();
    let clusterer = Clusterer::default();
    let request = ClusterRequest::new(parse_bounds(None), 3);

    let outcome = clusterer.cluster(&maritimes_and_vancouver(), &request).unwrap();
    let centroid = outcome.layers.clusters[0].centroid;

    assert!((centroid.x() - -63.57).abs() < 1e-9);
    assert!((centroid.y() - 44.66).abs() < 1e-9);
}

#[test]
fn test_cluster_centroid_without_stats_is_cell_center() {
    init_logging();
    let clusterer = Clusterer::builder().stats_enabled(false).build().unwrap();
    let request = ClusterRequest::new(parse_bounds(None), 3);

    let outcome = clusterer.cluster(&maritimes_and_vancouver(), &request).unwrap();

    let length = resolution_table().geohash_length(3);
    let hash = geohash::encode(geohash::Coord { x: -63.57, y: 44.65 }, length).unwrap();
    assert_eq!(outcome.layers.clusters[0].centroid, cell_center(&hash).unwrap());
}

#[test]
fn test_request_stats_flag_turns_off_means() {
    let clusterer = Clusterer::default();
    let request = ClusterRequest::parse(None, Some("3"), Some("false"));
    assert!(!clusterer.query_for(&request).with_stats);

    let request = ClusterRequest::parse(None, Some("3"), Some("null"));
    assert!(clusterer.query_for(&request).with_stats);
}

#[test]
fn test_street_level_keeps_individual_points() {
    init_logging();
    let backend = MemoryBackend::with_documents(vec![
        SearchDocument::new("lib", "Library", Point::new(-73.9822, 40.7532)),
        SearchDocument::new("mus", "Museum", Point::new(-73.9632, 40.7794)),
    ])
    .unwrap();
    let clusterer = Clusterer::default();
    let request = ClusterRequest::parse(Some("-74.1,40.6,-73.8,40.9"), Some("16"), None);

    let outcome = clusterer.cluster(&backend, &request).unwrap();

    assert_eq!(outcome.layers.points.len(), 2);
    assert!(outcome.layers.clusters.is_empty());
    assert_eq!(outcome.stats.merges, 0);
}

#[test]
fn test_high_zoom_colocated_documents_form_group() {
    init_logging();
    let shared = Point::new(2.2945, 48.8584);
    let backend = MemoryBackend::with_documents(vec![
        SearchDocument::new("a", "Ticket office", shared),
        SearchDocument::new("b", "Lift", shared),
        SearchDocument::new("c", "Restaurant", shared),
    ])
    .unwrap();
    let clusterer = Clusterer::default();
    let request = ClusterRequest::new(parse_bounds(None), 19);

    let outcome = clusterer.cluster(&backend, &request).unwrap();

    assert_eq!(outcome.layers.groups.len(), 1);
    assert_eq!(outcome.layers.groups[0].len(), 3);
    assert!(outcome.layers.points.is_empty());
    assert!(outcome.layers.clusters.is_empty());
}

#[test]
fn test_same_documents_cluster_below_group_threshold() {
    let shared = Point::new(2.2945, 48.8584);
    let backend = MemoryBackend::with_documents(vec![
        SearchDocument::new("a", "Ticket office", shared),
        SearchDocument::new("b", "Lift", shared),
    ])
    .unwrap();
    let clusterer = Clusterer::default();

    let outcome = clusterer
        .cluster(&backend, &ClusterRequest::new(parse_bounds(None), 17))
        .unwrap();

    assert!(outcome.layers.groups.is_empty());
    assert_eq!(outcome.layers.clusters.len(), 1);
    assert_eq!(outcome.layers.clusters[0].count, 2);
}

#[test]
fn test_document_count_conserved_across_zooms() {
    init_logging();
    let backend = lattice(20, 20, 0.005);
    let clusterer = Clusterer::default();

    for zoom in [0u8, 4, 8, 11, 13, 15, 18] {
        let request = ClusterRequest::new(parse_bounds(None), zoom);
        let outcome = clusterer.cluster(&backend, &request).unwrap();

        assert_eq!(outcome.layers.document_count(), 400, "zoom {}", zoom);
        assert_eq!(outcome.stats.input_documents, 400);
        assert!(outcome.stats.is_conserved());
        assert_eq!(outcome.stats.output_markers(), outcome.layers.marker_count());
    }
}

#[test]
fn test_markers_shrink_as_zoom_decreases() {
    let backend = lattice(20, 20, 0.005);
    let clusterer = Clusterer::default();

    let far = clusterer
        .cluster(&backend, &ClusterRequest::new(parse_bounds(None), 4))
        .unwrap();
    let near = clusterer
        .cluster(&backend, &ClusterRequest::new(parse_bounds(None), 18))
        .unwrap();

    assert!(far.layers.marker_count() < near.layers.marker_count());
}

#[test]
fn test_sorted_and_unsorted_backends_agree() {
    let backend = lattice(15, 15, 0.01);
    let request = ClusterRequest::new(parse_bounds(None), 12);

    let unsorted = Clusterer::builder().backend_sorted(false).build().unwrap();
    let sorted = Clusterer::builder().backend_sorted(true).build().unwrap();

    let a = unsorted.cluster(&backend, &request).unwrap();
    let b = sorted.cluster(&backend, &request).unwrap();

    assert_eq!(a.layers, b.layers);
    assert_eq!(a.stats, b.stats);
}

#[test]
fn test_bounds_filter_documents() {
    let clusterer = Clusterer::default();
    let request = ClusterRequest::parse(Some("-130,40,-100,60"), Some("3"), None);

    let outcome = clusterer.cluster(&maritimes_and_vancouver(), &request).unwrap();

    assert_eq!(outcome.layers.document_count(), 1);
    assert_eq!(outcome.layers.points[0].id, "3");
}

#[test]
fn test_row_cap_truncates_cells() {
    let clusterer = Clusterer::builder().max_rows(1).build().unwrap();
    let request = ClusterRequest::new(parse_bounds(None), 3);

    let outcome = clusterer.cluster(&maritimes_and_vancouver(), &request).unwrap();

    assert_eq!(outcome.stats.input_cells, 1);
    assert_eq!(outcome.layers.marker_count(), 1);
}

#[test]
fn test_backend_failure_renders_nothing() {
    init_logging();
    let clusterer = Clusterer::default();
    let request = ClusterRequest::new(BoundingBox2D::world(), 10);

    let outcome = clusterer.cluster(&UnavailableBackend, &request).unwrap();

    assert!(outcome.layers.is_empty());
    assert_eq!(outcome.stats.input_cells, 0);
}

#[test]
fn test_boxed_backend() {
    let backend: Box<dyn SearchBackend> = Box::new(maritimes_and_vancouver());
    let clusterer = Clusterer::default();

    let outcome = clusterer
        .cluster(backend.as_ref(), &ClusterRequest::new(BoundingBox2D::world(), 3))
        .unwrap();

    assert_eq!(outcome.layers.document_count(), 3);
}

#[test]
fn test_location_string_documents() {
    let doc = SearchDocument::from_location_str("42", "Office", "40.7532, -73.9822").unwrap();
    assert_eq!(doc.location.x(), -73.9822);
    assert_eq!(doc.location.y(), 40.7532);

    assert!(SearchDocument::from_location_str("43", "Broken", "north").is_err());
}

#[cfg(feature = "geojson")]
#[test]
fn test_geojson_layers() {
    let clusterer = Clusterer::default();
    let outcome = clusterer
        .cluster(
            &maritimes_and_vancouver(),
            &ClusterRequest::new(BoundingBox2D::world(), 3),
        )
        .unwrap();

    let json = geocluster::geojson::layers_to_geojson(&outcome.layers).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["points"]["type"], "FeatureCollection");
    assert_eq!(value["points"]["features"][0]["properties"]["label"], "Vancouver");
    assert_eq!(value["clusters"]["features"][0]["properties"]["count"], 2);
    assert!(value["groups"].as_array().unwrap().is_empty());
}
