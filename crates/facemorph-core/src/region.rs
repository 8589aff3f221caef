//! Anatomical regions and the vertex region table.
//!
//! A [`VertexRegionTable`] maps each [`Region`] to the set of vertex indices it
//! covers in the head mesh's canonical topology. The table is loaded once from
//! a JSON document and is read-only afterwards.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};

/// A named anatomical feature of the head mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Nose,
    Eyes,
    Ears,
    Jaw,
    Chin,
}

impl Region {
    /// Every region, in panel order.
    pub const ALL: [Region; 5] = [
        Region::Nose,
        Region::Eyes,
        Region::Ears,
        Region::Jaw,
        Region::Chin,
    ];

    /// Returns the display name of this region.
    pub fn name(self) -> &'static str {
        match self {
            Region::Nose => "Nose",
            Region::Eyes => "Eyes",
            Region::Ears => "Ears",
            Region::Jaw => "Jaw",
            Region::Chin => "Chin",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = MorphError;

    fn from_str(s: &str) -> Result<Self> {
        Region::ALL
            .into_iter()
            .find(|region| region.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MorphError::UnknownRegion(s.to_string()))
    }
}

/// Index payload of one region in the JSON document.
///
/// Either a flat list, or named groups (e.g. `left`/`right`) whose union is
/// the region's set.
#[derive(Deserialize)]
#[serde(untagged)]
enum IndexGroups {
    Flat(Vec<u32>),
    Grouped(BTreeMap<String, Vec<u32>>),
}

impl IndexGroups {
    fn into_indices(self) -> Vec<u32> {
        match self {
            IndexGroups::Flat(indices) => indices,
            IndexGroups::Grouped(groups) => groups.into_values().flatten().collect(),
        }
    }
}

/// Static mapping from region to the vertex indices it covers.
#[derive(Debug, Clone, Default)]
pub struct VertexRegionTable {
    /// Sorted, deduplicated indices per region.
    regions: HashMap<Region, Vec<u32>>,
}

impl VertexRegionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a table from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, IndexGroups> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (name, groups) in raw {
            let region: Region = name.parse()?;
            table.insert(region, groups.into_indices());
        }
        Ok(table)
    }

    /// Reads and parses a table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Sets the index set of a region, replacing any previous one.
    pub fn insert(&mut self, region: Region, indices: impl IntoIterator<Item = u32>) {
        let set: BTreeSet<u32> = indices.into_iter().collect();
        self.regions.insert(region, set.into_iter().collect());
    }

    /// Returns the indices of a region. Regions absent from the table are empty.
    pub fn region_indices(&self, region: Region) -> &[u32] {
        self.regions.get(&region).map_or(&[][..], Vec::as_slice)
    }

    /// Looks up a region by name.
    pub fn region_indices_by_name(&self, name: &str) -> Result<&[u32]> {
        let region: Region = name.parse()?;
        Ok(self.region_indices(region))
    }

    /// Returns whether the region has at least one vertex.
    pub fn has_region(&self, region: Region) -> bool {
        !self.region_indices(region).is_empty()
    }

    /// Returns the indices of a region after checking them against a mesh's
    /// vertex count.
    pub fn checked_indices(&self, region: Region, vertex_count: usize) -> Result<&[u32]> {
        let indices = self.region_indices(region);
        // Sorted, so only the last index can be the largest.
        if let Some(&index) = indices.last() {
            if index as usize >= vertex_count {
                log::error!("{region} index {index} exceeds mesh with {vertex_count} vertices");
                return Err(MorphError::IndexOutOfRange {
                    index,
                    count: vertex_count,
                });
            }
        }
        Ok(indices)
    }

    /// Checks every region against a mesh's vertex count.
    pub fn validate(&self, vertex_count: usize) -> Result<()> {
        for region in Region::ALL {
            self.checked_indices(region, vertex_count)?;
        }
        Ok(())
    }
}

/// Something that can produce the region table at startup.
pub trait RegionTableSource {
    /// Loads the table.
    fn load_region_table(&self) -> Result<VertexRegionTable>;
}

impl<F> RegionTableSource for F
where
    F: Fn() -> Result<VertexRegionTable>,
{
    fn load_region_table(&self) -> Result<VertexRegionTable> {
        self()
    }
}

/// Region table stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct RegionFile(pub std::path::PathBuf);

impl RegionTableSource for RegionFile {
    fn load_region_table(&self) -> Result<VertexRegionTable> {
        VertexRegionTable::from_path(&self.0)
    }
}
