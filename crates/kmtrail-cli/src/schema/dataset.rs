use kmtrail_engine::{BlobDataset, PointSet};
use serde::Deserialize;

/// Dataset accepted by `kmtrail run --input`.
///
/// Either a bare array of points, or a document written by `kmtrail generate`
/// (whose ground-truth labels are ignored).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DatasetFile {
    Points(PointSet),
    Blobs(BlobDataset),
}

impl DatasetFile {
    pub fn into_points(self) -> PointSet {
        match self {
            DatasetFile::Points(points) => points,
            DatasetFile::Blobs(dataset) => dataset.points,
        }
    }
}
