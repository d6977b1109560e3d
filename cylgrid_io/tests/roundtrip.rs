//! Write/read round-trips through container files.

use std::f64::consts::PI;
use std::path::Path;

use approx::assert_relative_eq;
use cylgrid_core::GridError;
use cylgrid_io::{
    read_from_file, read_grid, write_grid, write_to_file, ArrayData, ContainerFile,
    CylindricalPolarGrid, ExternalLink, IoError, Node, Precision, Quantity, Selection,
    WriteOptions, GEOMETRY_GROUP, QUANTITIES_GROUP,
};
use ndarray::Array3;

fn grid() -> CylindricalPolarGrid {
    CylindricalPolarGrid::new(&[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, PI]).unwrap()
}

fn populated() -> CylindricalPolarGrid {
    let mut g = grid();
    g.insert(
        "temperature",
        Array3::from_shape_fn((1, 1, 2), |(_, _, k)| 10.0 + k as f64),
    );
    g.insert(
        "density",
        vec![
            Array3::from_elem((1, 1, 2), 1.0e-20),
            Array3::from_elem((1, 1, 2), 3.0e-21),
        ],
    );
    g
}

#[test]
fn test_roundtrip_reproduces_grid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.cyl");
    let g = populated();

    for compression in [true, false] {
        let options = WriteOptions::default().with_compression(compression);
        write_to_file(&g, &path, &options).unwrap();
        let loaded = read_from_file(&path, &Selection::All).unwrap();

        assert_eq!(loaded.w_wall(), g.w_wall());
        assert_eq!(loaded.z_wall(), g.z_wall());
        assert_eq!(loaded.p_wall(), g.p_wall());
        assert_eq!(loaded.shape(), [1, 1, 2]);
        assert_eq!(loaded.geometry_id(), g.geometry_id());
        assert_eq!(loaded.quantities(), g.quantities());
        assert_eq!(loaded.n_dust().unwrap(), Some(2));
    }
}

#[test]
fn test_single_precision_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.cyl");
    let g = populated();

    let options = WriteOptions::default()
        .with_wall_precision(Precision::F32)
        .with_physics_precision(Precision::F32);
    write_to_file(&g, &path, &options).unwrap();

    let file = ContainerFile::open(&path).unwrap();
    let geometry = file.root().group(GEOMETRY_GROUP).unwrap();
    assert_eq!(
        geometry.dataset("Walls 3").unwrap().data().precision(),
        Precision::F32
    );

    // The fingerprint covers the stored walls, so the read still verifies
    let loaded = read_from_file(&path, &Selection::All).unwrap();
    assert_eq!(loaded.p_wall()[1], PI as f32 as f64);
    assert_ne!(loaded.geometry_id(), g.geometry_id());
    assert_relative_eq!(loaded.volumes().sum(), 2.0 * PI, max_relative = 1e-6);

    let temperature = loaded.get("temperature").and_then(Quantity::as_single).unwrap();
    assert_eq!(temperature[[0, 0, 1]], 11.0);
}

#[test]
fn test_corrupted_wall_fails_integrity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.cyl");
    write_to_file(&populated(), &path, &WriteOptions::default()).unwrap();

    let mut file = ContainerFile::open(&path).unwrap();
    let walls = file
        .root_mut()
        .group_mut(GEOMETRY_GROUP)
        .unwrap()
        .dataset_mut("Walls 1")
        .unwrap();
    match walls.data_mut() {
        ArrayData::F64(values) => {
            if let Some(value) = values.iter_mut().nth(1) {
                *value = 1.5;
            }
        }
        ArrayData::F32(_) => panic!("walls were written at double precision"),
    }
    file.flush().unwrap();

    match read_from_file(&path, &Selection::All) {
        Err(IoError::Integrity { stored, computed }) => assert_ne!(stored, computed),
        other => panic!("expected integrity error, got {:?}", other),
    }
}

#[test]
fn test_unordered_corrupted_wall_fails_integrity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.cyl");
    write_to_file(&populated(), &path, &WriteOptions::default()).unwrap();

    // Walls become [0, 5, 2]: no longer increasing, still caught by the hash
    let mut file = ContainerFile::open(&path).unwrap();
    let walls = file
        .root_mut()
        .group_mut(GEOMETRY_GROUP)
        .unwrap()
        .dataset_mut("Walls 1")
        .unwrap();
    match walls.data_mut() {
        ArrayData::F64(values) => {
            if let Some(value) = values.iter_mut().nth(1) {
                *value = 5.0;
            }
        }
        ArrayData::F32(_) => panic!("walls were written at double precision"),
    }
    file.flush().unwrap();

    assert!(matches!(
        read_from_file(&path, &Selection::All),
        Err(IoError::Integrity { .. })
    ));
}

#[test]
fn test_mis_shaped_quantity_is_not_written() {
    let mut g = grid();
    g.insert("density", Array3::<f64>::zeros((1, 2, 2)));

    let mut root = cylgrid_io::Group::new();
    let err = write_grid(&g, &mut root, &WriteOptions::default()).unwrap_err();

    assert!(matches!(err, IoError::Grid(GridError::ShapeMismatch { .. })));
    assert!(root
        .group(QUANTITIES_GROUP)
        .map(|q| !q.contains("density"))
        .unwrap_or(true));
}

#[test]
fn test_selection() {
    let mut root = cylgrid_io::Group::new();
    let options =
        WriteOptions::default().with_quantities(Selection::names(["temperature", "missing"]));
    write_grid(&populated(), &mut root, &options).unwrap();

    let quantities = root.group(QUANTITIES_GROUP).unwrap();
    assert_eq!(quantities.names().collect::<Vec<_>>(), ["temperature"]);

    write_grid(&populated(), &mut root, &WriteOptions::default()).unwrap();
    let loaded = read_grid(&root, &Selection::names(["density", "energy"])).unwrap();
    assert_eq!(loaded.names().collect::<Vec<_>>(), ["density"]);
}

#[test]
fn test_header_magic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.cyl");
    write_to_file(&grid(), &path, &WriteOptions::default()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..4], b"CYLG");

    let mut corrupt = bytes.clone();
    corrupt[0..4].copy_from_slice(b"\x89HDF");
    std::fs::write(&path, corrupt).unwrap();
    assert!(matches!(
        read_from_file(&path, &Selection::All),
        Err(IoError::InvalidFormat { .. })
    ));
}

fn write_source(dir: &Path) -> ExternalLink {
    let mut source = grid();
    source.insert("density", Array3::from_elem((1, 1, 2), 7.0));
    write_to_file(&source, dir.join("source.cyl"), &WriteOptions::default()).unwrap();
    ExternalLink::new(dir.join("source.cyl"), "/Quantities/density")
}

#[test]
fn test_external_link_copied() {
    let dir = tempfile::tempdir().unwrap();
    let link = write_source(dir.path());
    let mut g = grid();
    g.insert_link("density", link);

    let path = dir.path().join("model.cyl");
    write_to_file(&g, &path, &WriteOptions::default()).unwrap();

    let file = ContainerFile::open(&path).unwrap();
    let node = file.root().get_path("Quantities/density").unwrap();
    assert!(matches!(node, Node::Dataset(_)));

    let loaded = read_from_file(&path, &Selection::All).unwrap();
    assert_eq!(
        loaded.get("density").and_then(Quantity::as_single),
        Some(&Array3::from_elem((1, 1, 2), 7.0))
    );
}

#[test]
fn test_external_link_relative_and_absolute() {
    let dir = tempfile::tempdir().unwrap();
    let link = write_source(dir.path());
    let mut g = grid();
    g.insert_link("density", link);
    let path = dir.path().join("model.cyl");

    let options = WriteOptions::default().with_copy(false);
    write_to_file(&g, &path, &options).unwrap();
    let file = ContainerFile::open(&path).unwrap();
    match file.root().get_path("/Quantities/density").unwrap() {
        Node::Link(stored) => {
            assert_eq!(stored.filename, Path::new("source.cyl"));
            assert_eq!(stored.path, "/Quantities/density");
        }
        other => panic!("expected a link, got {}", other.kind()),
    }

    // Relative links resolve against the directory holding the file
    let loaded = read_from_file(&path, &Selection::All).unwrap();
    assert_eq!(
        loaded.get("density").and_then(Quantity::as_single),
        Some(&Array3::from_elem((1, 1, 2), 7.0))
    );

    write_to_file(&g, &path, &options.clone().with_absolute_paths(true)).unwrap();
    let file = ContainerFile::open(&path).unwrap();
    match file.root().get_path("/Quantities/density").unwrap() {
        Node::Link(stored) => {
            assert!(stored.filename.is_absolute());
            assert!(stored.filename.ends_with("source.cyl"));
        }
        other => panic!("expected a link, got {}", other.kind()),
    }
}

#[test]
fn test_broken_link_fails_write() {
    let dir = tempfile::tempdir().unwrap();
    let mut g = grid();
    g.insert_link(
        "density",
        ExternalLink::new(dir.path().join("absent.cyl"), "/Quantities/density"),
    );
    let path = dir.path().join("model.cyl");

    let err = write_to_file(&g, &path, &WriteOptions::default()).unwrap_err();
    assert!(matches!(err, IoError::Grid(GridError::UnresolvedLink { .. })));
    assert!(!path.exists());
}
