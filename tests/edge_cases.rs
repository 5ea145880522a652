use geocluster::request::{parse_bounds, parse_zoom, restrict_latitude, restrict_longitude};
use geocluster::resolution::{MAX_GEOHASH_LENGTH, MAX_ZOOM};
use geocluster::{
    BoundingBox2D, CellResult, ClusterRequest, Clusterer, MemoryBackend, Point, SearchDocument,
    resolution_table,
};

/// Malformed request parameters degrade instead of failing
#[test]
fn test_garbage_request_parameters() {
    let request = ClusterRequest::parse(Some("west,south,east"), Some("-4"), Some("yes"));

    assert!(request.bounds.is_world());
    assert_eq!(request.zoom, 0);
    assert!(!request.stats);
}

#[test]
fn test_out_of_range_coordinates_clamped() {
    assert_eq!(restrict_longitude("200"), 180.0);
    assert_eq!(restrict_longitude("-181.5"), -180.0);
    assert_eq!(restrict_latitude("-200"), -90.0);
    assert_eq!(restrict_latitude("89.5"), 89.5);

    let bounds = parse_bounds(Some("-500, -95, 500, 95"));
    assert!(bounds.is_world());
}

#[test]
fn test_zoom_clamped_to_table() {
    assert_eq!(parse_zoom(Some("99")), MAX_ZOOM);
    assert_eq!(ClusterRequest::new(BoundingBox2D::world(), 200).zoom, MAX_ZOOM);

    let top = resolution_table().level(MAX_ZOOM);
    assert_eq!(top.geohash_length, MAX_GEOHASH_LENGTH);
}

#[test]
fn test_documents_at_world_corners() {
    let backend = MemoryBackend::with_documents(vec![
        SearchDocument::new("ne", "North-east corner", Point::new(180.0, 90.0)),
        SearchDocument::new("sw", "South-west corner", Point::new(-180.0, -90.0)),
        SearchDocument::new("np", "North pole", Point::new(0.0, 90.0)),
    ])
    .unwrap();
    let clusterer = Clusterer::default();

    for zoom in [0u8, 2, 9, 20, MAX_ZOOM] {
        let outcome = clusterer
            .cluster(&backend, &ClusterRequest::new(BoundingBox2D::world(), zoom))
            .unwrap();
        assert_eq!(outcome.layers.document_count(), 3, "zoom {}", zoom);
    }
}

#[test]
fn test_invalid_documents_rejected_by_memory_backend() {
    let mut backend = MemoryBackend::new();
    assert!(
        backend
            .insert(SearchDocument::new("x", "Nowhere", Point::new(0.0, 91.0)))
            .is_err()
    );
    assert!(
        backend
            .insert(SearchDocument::new("y", "Nowhere", Point::new(f64::NAN, 0.0)))
            .is_err()
    );
    assert!(backend.is_empty());
}

#[test]
fn test_malformed_rows_skipped() {
    let clusterer = Clusterer::default();
    let rows = vec![
        CellResult::new("u09t!", 4),
        CellResult::new("", 2),
        CellResult::new("u09tv", 0),
        CellResult::new("u09tw", 3),
    ];

    let outcome = clusterer.cluster_cells(rows, 12).unwrap();

    assert_eq!(outcome.stats.input_cells, 1);
    assert_eq!(outcome.layers.clusters.len(), 1);
    assert_eq!(outcome.layers.clusters[0].count, 3);
}

#[test]
fn test_short_document_sample_becomes_cluster() {
    let clusterer = Clusterer::default();
    let docs = vec![
        SearchDocument::new("1", "One", Point::new(2.35, 48.85)),
        SearchDocument::new("2", "Two", Point::new(2.35, 48.85)),
    ];
    let rows = vec![CellResult::new("u09tvw", 5).with_documents(docs)];

    let outcome = clusterer.cluster_cells(rows, 20).unwrap();

    assert!(outcome.layers.groups.is_empty());
    assert_eq!(outcome.layers.clusters.len(), 1);
    assert_eq!(outcome.layers.clusters[0].count, 5);
}

#[test]
fn test_duplicate_prefixes_merged() {
    let clusterer = Clusterer::default();
    let here = Point::new(2.3522, 48.8566);
    let rows = vec![
        CellResult::new("u09tvw", 1)
            .with_documents(vec![SearchDocument::new("1", "Left bank", here)]),
        CellResult::new("u09tvw", 1)
            .with_documents(vec![SearchDocument::new("2", "Right bank", here)]),
    ];

    let outcome = clusterer.cluster_cells(rows, 20).unwrap();

    assert_eq!(outcome.stats.input_cells, 1);
    assert_eq!(outcome.layers.groups.len(), 1);
    assert_eq!(outcome.layers.groups[0].len(), 2);
}

#[test]
fn test_single_cell_input() {
    let clusterer = Clusterer::default();
    let rows = vec![CellResult::new("dr5ru", 7).with_mean(Point::new(-73.98, 40.75))];

    let outcome = clusterer.cluster_cells(rows, 10).unwrap();

    assert_eq!(outcome.stats.merges, 0);
    assert_eq!(outcome.layers.clusters[0].centroid, Point::new(-73.98, 40.75));
}

#[test]
fn test_empty_viewport() {
    let backend = MemoryBackend::with_documents(vec![SearchDocument::new(
        "1",
        "Reykjavik",
        Point::new(-21.94, 64.15),
    )])
    .unwrap();
    let clusterer = Clusterer::default();
    let request = ClusterRequest::parse(Some("100,-40,150,-10"), Some("5"), None);

    let outcome = clusterer.cluster(&backend, &request).unwrap();

    assert!(outcome.layers.is_empty());
    assert!(outcome.stats.is_conserved());
}

#[test]
fn test_large_lattice_at_every_zoom() {
    let mut backend = MemoryBackend::new();
    for i in 0..2_500 {
        let lon = -0.5 + (i % 50) as f64 * 0.02;
        let lat = 51.0 + (i / 50) as f64 * 0.02;
        backend
            .insert(SearchDocument::new(i.to_string(), "site", Point::new(lon, lat)))
            .unwrap();
    }
    let clusterer = Clusterer::default();

    for zoom in 0..=MAX_ZOOM {
        let outcome = clusterer
            .cluster(&backend, &ClusterRequest::new(BoundingBox2D::world(), zoom))
            .unwrap();
        assert_eq!(outcome.layers.document_count(), 2_500, "zoom {}", zoom);
    }
}
