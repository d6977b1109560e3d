//! Reading and writing grids in containers.
//!
//! # Layout
//!
//! ```text
//! <group>
//! ├── Geometry            attrs: grid_type = "cyl_pol", geometry = <fingerprint>
//! │   ├── Walls 1         field "w", attr Unit = "cm"
//! │   ├── Walls 2         field "z", attr Unit = "cm"
//! │   └── Walls 3         field "p", attr Unit = "cm"
//! └── Quantities
//!     ├── <name>          3-D or 4-D dataset, attr geometry = <fingerprint>
//!     └── <name>          or a link { filename, path }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cylgrid_core::{
    check_quantity, check_walls, fingerprint, stack_components, Axis, CellGeometry,
    CylindricalPolarGrid, ExternalLink, Quantity,
};
use ndarray::{Array1, ArrayD};

use crate::config::{Selection, WriteOptions};
use crate::container::{ArrayData, AttrValue, Dataset, Group, Node, Precision};
use crate::error::{IoError, Result};
use crate::format::ContainerFile;
use crate::resolve::ContainerResolver;

/// Name of the geometry sub-group.
pub const GEOMETRY_GROUP: &str = "Geometry";
/// Name of the quantities sub-group.
pub const QUANTITIES_GROUP: &str = "Quantities";
/// Value of the `grid_type` attribute for cylindrical-polar grids.
pub const GRID_TYPE: &str = "cyl_pol";
/// Unit recorded on every wall dataset.
pub const WALL_UNIT: &str = "cm";

const GRID_TYPE_ATTR: &str = "grid_type";
const GEOMETRY_ATTR: &str = "geometry";
const UNIT_ATTR: &str = "Unit";

/// Wall dataset name per axis.
fn wall_dataset(axis: Axis) -> &'static str {
    match axis {
        Axis::Radius => "Walls 1",
        Axis::Height => "Walls 2",
        Axis::Azimuth => "Walls 3",
    }
}

/// Write a grid into `group`, resolving links against the working directory.
///
/// See [`write_grid_with`].
pub fn write_grid(grid: &CylindricalPolarGrid, group: &mut Group, options: &WriteOptions) -> Result<()> {
    write_grid_with(grid, group, options, &ContainerResolver::new())
}

/// Write a grid into `group`.
///
/// All quantities are validated against the grid shape, and every dataset
/// is prepared, before `group` is modified: on error the container is left
/// untouched. Existing datasets with the same names are replaced.
///
/// # Errors
/// - `Grid(ShapeMismatch)` / `Grid(UnsupportedRank)` if a quantity does not
///   fit the grid
/// - `Grid(NonMonotonic)` if storing the walls at the requested precision
///   collapses two walls
/// - `NotAGroup` if `Geometry` or `Quantities` exist but are not groups
pub fn write_grid_with(
    grid: &CylindricalPolarGrid,
    group: &mut Group,
    options: &WriteOptions,
    resolver: &ContainerResolver,
) -> Result<()> {
    write_grid_inner(grid, group, options, resolver, None)
}

/// Write a grid to a new container file, replacing any existing file.
///
/// Relative link paths are made relative to the directory of `path`.
pub fn write_to_file(
    grid: &CylindricalPolarGrid,
    path: impl AsRef<Path>,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let target_dir = std::path::absolute(path)?
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut root = Group::new();
    write_grid_inner(
        grid,
        &mut root,
        options,
        &ContainerResolver::new(),
        Some(&target_dir),
    )?;
    ContainerFile::from_root(path, root).flush()
}

fn write_grid_inner(
    grid: &CylindricalPolarGrid,
    group: &mut Group,
    options: &WriteOptions,
    resolver: &ContainerResolver,
    target_dir: Option<&Path>,
) -> Result<()> {
    grid.check_array_dimensions(resolver)?;

    for name in [GEOMETRY_GROUP, QUANTITIES_GROUP] {
        if let Some(node) = group.node(name) {
            if !matches!(node, Node::Group(_)) {
                return Err(IoError::NotAGroup { path: name.into() });
            }
        }
    }

    // Walls as they will read back, so the stored fingerprint reproduces
    let stored = Axis::ALL.map(|axis| stored_walls(grid.geometry().walls(axis), options.wall_precision));
    for (axis, walls) in Axis::ALL.iter().zip(&stored) {
        check_walls(*axis, &walls.to_vec())?;
    }
    let geometry_id = fingerprint(stored[0].view(), stored[1].view(), stored[2].view());

    let mut wall_datasets = Vec::with_capacity(3);
    for (axis, walls) in Axis::ALL.iter().zip(&stored) {
        let dataset = Dataset::new(ArrayData::from_f64(walls.view().into_dyn(), options.wall_precision))
            .with_field(axis.symbol())
            .with_compression(options.compression)
            .with_attr(UNIT_ATTR, WALL_UNIT);
        wall_datasets.push((wall_dataset(*axis), dataset));
    }

    let mut quantity_nodes = Vec::new();
    for (name, quantity) in grid.quantities() {
        if !options.quantities.includes(name) {
            continue;
        }
        let node = match quantity {
            Quantity::Single(array) => Node::Dataset(quantity_dataset(
                ArrayData::from_f64(array.view().into_dyn(), options.physics_precision),
                options,
                &geometry_id,
            )),
            Quantity::MultiComponent(components) => {
                let stacked = stack_components(name, components, grid.shape())?;
                Node::Dataset(quantity_dataset(
                    ArrayData::from_f64(stacked.view().into_dyn(), options.physics_precision),
                    options,
                    &geometry_id,
                ))
            }
            Quantity::ExternalRef(link) if options.copy => {
                Node::Dataset(resolver.resolve_dataset(link)?)
            }
            Quantity::ExternalRef(link) => {
                let filename = link_filename(link, resolver, target_dir, options.absolute_paths)?;
                Node::Link(ExternalLink::new(filename, link.path.clone()))
            }
        };
        log::debug!("writing {} '{}' as {}", quantity.kind(), name, node.kind());
        quantity_nodes.push((name.clone(), node));
    }

    if let Selection::Names(names) = &options.quantities {
        for name in names.iter().filter(|name| !grid.contains(name)) {
            log::warn!("requested quantity '{}' is not defined on the grid", name);
        }
    }

    let geometry = group.require_group(GEOMETRY_GROUP)?;
    geometry.set_attr(GRID_TYPE_ATTR, GRID_TYPE);
    geometry.set_attr(GEOMETRY_ATTR, geometry_id.as_str());
    for (name, dataset) in wall_datasets {
        geometry.insert_dataset(name, dataset);
    }

    let quantities = group.require_group(QUANTITIES_GROUP)?;
    let written = quantity_nodes.len();
    for (name, node) in quantity_nodes {
        match node {
            Node::Dataset(dataset) => quantities.insert_dataset(name, dataset),
            Node::Link(link) => quantities.insert_link(name, link),
            Node::Group(sub) => quantities.insert_group(name, sub),
        };
    }

    log::info!(
        "wrote grid {:?} with {} quantities (geometry {})",
        grid.shape(),
        written,
        geometry_id
    );
    Ok(())
}

fn stored_walls(walls: &Array1<f64>, precision: Precision) -> Array1<f64> {
    walls.mapv(|v| precision.round(v))
}

fn quantity_dataset(data: ArrayData, options: &WriteOptions, geometry_id: &str) -> Dataset {
    Dataset::new(data)
        .with_compression(options.compression)
        .with_attr(GEOMETRY_ATTR, geometry_id)
}

/// Filename to record in a link node.
fn link_filename(
    link: &ExternalLink,
    resolver: &ContainerResolver,
    target_dir: Option<&Path>,
    absolute_paths: bool,
) -> Result<PathBuf> {
    let located = resolver.locate(link);
    if absolute_paths {
        return Ok(std::path::absolute(&located)?);
    }
    let Some(dir) = target_dir else {
        return Ok(located);
    };

    let absolute = std::path::absolute(&located)?;
    match absolute.strip_prefix(dir) {
        Ok(relative) => Ok(relative.to_path_buf()),
        Err(_) => {
            log::warn!(
                "cannot make link {} relative to {}, writing absolute path",
                absolute.display(),
                dir.display()
            );
            Ok(absolute)
        }
    }
}

/// Read a grid from `group`, resolving links against the working directory.
///
/// See [`read_grid_with`].
pub fn read_grid(group: &Group, selection: &Selection) -> Result<CylindricalPolarGrid> {
    read_grid_with(group, selection, &ContainerResolver::new())
}

/// Read a grid from `group`.
///
/// Rank-3 datasets become single arrays and rank-4 datasets component
/// lists. Links are resolved and their data loaded. Selected names that do
/// not exist are skipped.
///
/// # Errors
/// - `MissingNode` if `Geometry` or `Quantities` is absent
/// - `GeometryType` if the grid is not cylindrical polar
/// - `Integrity` if the stored fingerprint does not match the stored walls
/// - `Grid(UnsupportedRank)` / `Grid(ShapeMismatch)` for a quantity that
///   does not fit the grid
pub fn read_grid_with(
    group: &Group,
    selection: &Selection,
    resolver: &ContainerResolver,
) -> Result<CylindricalPolarGrid> {
    let geometry = group.group(GEOMETRY_GROUP)?;
    let quantities = group.group(QUANTITIES_GROUP)?;

    let grid_type = string_attr(geometry.attr(GRID_TYPE_ATTR), GEOMETRY_GROUP, GRID_TYPE_ATTR)?;
    if grid_type != GRID_TYPE {
        return Err(IoError::GeometryType {
            found: grid_type.to_string(),
        });
    }

    let [w_wall, z_wall, p_wall] = Axis::ALL.map(|axis| read_walls(geometry, axis));
    let (w_wall, z_wall, p_wall) = (w_wall?, z_wall?, p_wall?);

    // Verify the walls before deriving anything from them
    let flat = |walls: &ArrayD<f64>| walls.iter().copied().collect::<Array1<f64>>();
    let computed = fingerprint(
        flat(&w_wall).view(),
        flat(&z_wall).view(),
        flat(&p_wall).view(),
    );
    let stored = string_attr(geometry.attr(GEOMETRY_ATTR), GEOMETRY_GROUP, GEOMETRY_ATTR)?;
    if stored != computed {
        return Err(IoError::Integrity {
            stored: stored.to_string(),
            computed,
        });
    }

    let cells = CellGeometry::from_dyn_walls(w_wall.view(), z_wall.view(), p_wall.view())?;
    let mut grid = CylindricalPolarGrid::from_geometry(Arc::new(cells));

    for (name, node) in quantities.children() {
        if !selection.includes(name) {
            continue;
        }
        let array = match node {
            Node::Dataset(dataset) => {
                let tag = dataset.attr(GEOMETRY_ATTR).and_then(AttrValue::as_str);
                if tag.is_some_and(|tag| tag != computed) {
                    log::warn!("quantity '{}' was written for a different geometry", name);
                }
                dataset.data().to_f64()
            }
            Node::Link(link) => resolver.resolve_array(link)?,
            Node::Group(_) => {
                return Err(IoError::NotADataset {
                    path: format!("{}/{}", QUANTITIES_GROUP, name),
                })
            }
        };
        let quantity = Quantity::from_dyn(name, array)?;
        check_quantity(name, &quantity, grid.shape(), resolver)?;
        grid.insert(name.clone(), quantity);
    }

    log::info!(
        "read grid {:?} with {} quantities",
        grid.shape(),
        grid.quantities().len()
    );
    Ok(grid)
}

/// Read a grid from a container file.
///
/// Relative links are resolved against the directory holding `path`.
pub fn read_from_file(path: impl AsRef<Path>, selection: &Selection) -> Result<CylindricalPolarGrid> {
    let path = path.as_ref();
    let file = ContainerFile::open(path)?;
    let resolver = match path.parent() {
        Some(dir) => ContainerResolver::relative_to(dir),
        None => ContainerResolver::new(),
    };
    read_grid_with(file.root(), selection, &resolver)
}

fn read_walls(geometry: &Group, axis: Axis) -> Result<ArrayD<f64>> {
    let name = wall_dataset(axis);
    let dataset = geometry.dataset(name)?;
    if dataset.field() != Some(axis.symbol()) {
        return Err(IoError::InvalidFormat {
            message: format!(
                "dataset '{}' should hold field '{}', found {:?}",
                name,
                axis.symbol(),
                dataset.field()
            ),
        });
    }
    Ok(dataset.data().to_f64())
}

fn string_attr<'a>(value: Option<&'a AttrValue>, node: &str, name: &str) -> Result<&'a str> {
    value
        .and_then(AttrValue::as_str)
        .ok_or_else(|| IoError::MissingAttribute {
            node: node.into(),
            name: name.into(),
        })
}
