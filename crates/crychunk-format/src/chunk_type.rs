//! Chunk type codes.
//!
//! All descriptors use the 0x746 ("canonical") type space. Legacy files
//! number the same enumeration from different bases:
//!
//! | group            | legacy base  | canonical base |
//! |------------------|--------------|----------------|
//! | geometry         | `0xCCCC0000` | `0x1000`       |
//! | compiled         | `0xACDC0000` | `0x2000`       |
//! | physics/anim     | `0xAAFC0000` | `0x3000`       |

use std::fmt;

/// A chunk type in the canonical (0x746) type space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct ChunkType(pub u32);

struct TypeGroup {
    legacy_base: u32,
    canonical_base: u32,
    names: &'static [&'static str],
}

static TYPE_GROUPS: [TypeGroup; 3] = [
    TypeGroup {
        legacy_base: 0xCCCC_0000,
        canonical_base: 0x1000,
        names: &[
            "Mesh",
            "Helper",
            "VertAnim",
            "BoneAnim",
            "GeomNameList",
            "BoneNameList",
            "MtlList",
            "MRM",
            "SceneProps",
            "Light",
            "PatchMesh",
            "Node",
            "Mtl",
            "Controller",
            "Timing",
            "BoneMesh",
            "BoneLightBinding",
            "MeshMorphTarget",
            "BoneInitialPos",
            "SourceInfo",
            "MtlName",
            "ExportFlags",
            "DataStream",
            "MeshSubsets",
            "MeshPhysicsData",
        ],
    },
    TypeGroup {
        legacy_base: 0xACDC_0000,
        canonical_base: 0x2000,
        names: &[
            "CompiledBones",
            "CompiledPhysicalBones",
            "CompiledMorphTargets",
            "CompiledPhysicalProxies",
            "CompiledIntFaces",
            "CompiledIntSkinVertices",
            "CompiledExt2IntMap",
        ],
    },
    TypeGroup {
        legacy_base: 0xAAFC_0000,
        canonical_base: 0x3000,
        names: &[
            "BreakablePhysics",
            "FaceMap",
            "MotionParameters",
            "FootPlantInfo",
            "BonesBoxes",
            "FoliageInfo",
            "Timestamp",
            "GlobalAnimationHeaderCAF",
            "GlobalAnimationHeaderAIM",
            "BspTreeData",
        ],
    },
];

impl ChunkType {
    pub const ANY: Self = Self(0);

    pub const MESH: Self = Self(0x1000);
    pub const HELPER: Self = Self(0x1001);
    pub const VERT_ANIM: Self = Self(0x1002);
    pub const BONE_ANIM: Self = Self(0x1003);
    pub const GEOM_NAME_LIST: Self = Self(0x1004);
    pub const BONE_NAME_LIST: Self = Self(0x1005);
    pub const MTL_LIST: Self = Self(0x1006);
    pub const MRM: Self = Self(0x1007);
    pub const SCENE_PROPS: Self = Self(0x1008);
    pub const LIGHT: Self = Self(0x1009);
    pub const PATCH_MESH: Self = Self(0x100A);
    pub const NODE: Self = Self(0x100B);
    pub const MTL: Self = Self(0x100C);
    pub const CONTROLLER: Self = Self(0x100D);
    pub const TIMING: Self = Self(0x100E);
    pub const BONE_MESH: Self = Self(0x100F);
    pub const BONE_LIGHT_BINDING: Self = Self(0x1010);
    pub const MESH_MORPH_TARGET: Self = Self(0x1011);
    pub const BONE_INITIAL_POS: Self = Self(0x1012);
    pub const SOURCE_INFO: Self = Self(0x1013);
    pub const MTL_NAME: Self = Self(0x1014);
    pub const EXPORT_FLAGS: Self = Self(0x1015);
    pub const DATA_STREAM: Self = Self(0x1016);
    pub const MESH_SUBSETS: Self = Self(0x1017);
    pub const MESH_PHYSICS_DATA: Self = Self(0x1018);

    pub const COMPILED_BONES: Self = Self(0x2000);
    pub const COMPILED_PHYSICAL_BONES: Self = Self(0x2001);
    pub const COMPILED_MORPH_TARGETS: Self = Self(0x2002);
    pub const COMPILED_PHYSICAL_PROXIES: Self = Self(0x2003);
    pub const COMPILED_INT_FACES: Self = Self(0x2004);
    pub const COMPILED_INT_SKIN_VERTICES: Self = Self(0x2005);
    pub const COMPILED_EXT2INT_MAP: Self = Self(0x2006);

    pub const BREAKABLE_PHYSICS: Self = Self(0x3000);
    pub const FACE_MAP: Self = Self(0x3001);
    pub const MOTION_PARAMETERS: Self = Self(0x3002);
    pub const FOOT_PLANT_INFO: Self = Self(0x3003);
    pub const BONES_BOXES: Self = Self(0x3004);
    pub const FOLIAGE_INFO: Self = Self(0x3005);
    pub const TIMESTAMP: Self = Self(0x3006);
    pub const GLOBAL_ANIMATION_HEADER_CAF: Self = Self(0x3007);
    pub const GLOBAL_ANIMATION_HEADER_AIM: Self = Self(0x3008);
    pub const BSP_TREE_DATA: Self = Self(0x3009);

    /// Map a legacy (0x744/0x745) type code into the canonical space.
    ///
    /// Returns `None` for codes outside the known legacy enumeration.
    pub fn from_legacy(code: u32) -> Option<Self> {
        TYPE_GROUPS.iter().find_map(|group| {
            let index = code.checked_sub(group.legacy_base)?;
            ((index as usize) < group.names.len()).then(|| Self(group.canonical_base + index))
        })
    }

    /// The legacy (0x744/0x745) code for this type, if it has one.
    pub fn to_legacy(self) -> Option<u32> {
        let (group, index) = self.group()?;
        Some(group.legacy_base + index)
    }

    /// The enumerator name of a known canonical type.
    pub fn name(self) -> Option<&'static str> {
        let (group, index) = self.group()?;
        Some(group.names[index as usize])
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    fn group(self) -> Option<(&'static TypeGroup, u32)> {
        TYPE_GROUPS.iter().find_map(|group| {
            let index = self.0.checked_sub(group.canonical_base)?;
            ((index as usize) < group.names.len()).then_some((group, index))
        })
    }
}

impl From<u32> for ChunkType {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#06x}", self.0),
        }
    }
}
