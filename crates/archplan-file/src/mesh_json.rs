//! JSON 网格格式
//!
//! 体块模型求值后的平面多边形列表，附带元数据，供3D查看器读取或持久化。
//!
//! ```json
//! {
//!   "format": "archplan-mesh",
//!   "version": 1,
//!   "metadata": { "id": "...", "title": "dream", "units": "in", "created_at": "..." },
//!   "polygons": [ { "vertices": [[0.0, 0.0, 0.0], ...] } ]
//! }
//! ```

use crate::error::ExportError;
use archplan_core::math::Point3;
use archplan_core::solid::{Polygon3, Solid};
use archplan_core::units::Unit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// 格式标识
pub const FORMAT_NAME: &str = "archplan-mesh";

/// 当前文件格式版本
pub const FORMAT_VERSION: u32 = 1;

/// 网格元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshMetadata {
    /// 文档唯一标识
    pub id: Uuid,

    /// 标题
    pub title: String,

    /// 单位符号（in, ft, mm...）
    pub units: String,

    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Default for MeshMetadata {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Untitled".to_string(),
            units: Unit::Inch.symbol().to_string(),
            created_at: Utc::now(),
        }
    }
}

/// 网格文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDocument {
    pub format: String,
    pub version: u32,
    pub metadata: MeshMetadata,
    pub polygons: Vec<Polygon3>,
}

impl MeshDocument {
    pub fn new(metadata: MeshMetadata, polygons: Vec<Polygon3>) -> Self {
        Self {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            metadata,
            polygons,
        }
    }

    /// 对实体求值并生成文档
    pub fn from_solid(title: impl Into<String>, solid: &Solid) -> Self {
        let metadata = MeshMetadata {
            title: title.into(),
            ..Default::default()
        };
        Self::new(metadata, solid.polygons())
    }

    /// 三角面列表
    pub fn triangles(&self) -> Vec<[Point3; 3]> {
        self.polygons.iter().flat_map(|p| p.triangles()).collect()
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 解析并检查格式与版本
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let document: MeshDocument = serde_json::from_str(json)?;

        if document.format != FORMAT_NAME {
            return Err(ExportError::InvalidFormat(format!(
                "expected `{FORMAT_NAME}`, found `{}`",
                document.format
            )));
        }
        if document.version > FORMAT_VERSION {
            return Err(ExportError::UnsupportedVersion(format!(
                "file version {} is newer than supported version {FORMAT_VERSION}",
                document.version
            )));
        }
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), polygons = self.polygons.len(), "mesh JSON written");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
