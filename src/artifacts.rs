//! Output file naming and persistence for a finished run.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::PipelineError;
use crate::integration::PipelineOutput;

/// Container extensions accepted as input videos.
pub const SUPPORTED_VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

/// Whether `path` has a supported video extension (case-insensitive).
pub fn is_supported_video(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_VIDEO_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Where the three artifacts of one run are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub video: PathBuf,
    pub heatmap: PathBuf,
    pub insights: PathBuf,
}

impl ArtifactPaths {
    /// Name the artifacts after `input`'s file name inside `output_dir`:
    /// `tracked_<name>`, `heatmap_<name>.jpg` and `insights_<name>.json`.
    pub fn for_input(input: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        let name = input
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let dir = output_dir.as_ref();
        Self {
            video: dir.join(format!("tracked_{name}")),
            heatmap: dir.join(format!("heatmap_{name}.jpg")),
            insights: dir.join(format!("insights_{name}.json")),
        }
    }
}

impl PipelineOutput {
    /// Write the heatmap image, then the insights report.
    ///
    /// A failure writing the report leaves an already written heatmap in
    /// place.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(), PipelineError> {
        self.heatmap.image.save(&paths.heatmap)?;
        self.report.write_json(&paths.insights)?;
        info!(
            heatmap = %paths.heatmap.display(),
            insights = %paths.insights.display(),
            "artifacts written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_video("clip.mp4"));
        assert!(is_supported_video("uploads/CLIP.MKV"));
        assert!(!is_supported_video("notes.txt"));
        assert!(!is_supported_video("mp4"));
    }

    #[test]
    fn test_artifact_names() {
        let paths = ArtifactPaths::for_input("uploads/lobby.mp4", "processed");
        assert_eq!(paths.video, Path::new("processed/tracked_lobby.mp4"));
        assert_eq!(paths.heatmap, Path::new("processed/heatmap_lobby.mp4.jpg"));
        assert_eq!(paths.insights, Path::new("processed/insights_lobby.mp4.json"));
    }
}
