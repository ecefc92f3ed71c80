//! External media tool invocation.
//!
//! The pipeline talks to ffprobe and ffmpeg only through [MediaToolchain], so
//! control flow stays independent of process management and tests can
//! substitute a fake. Both invocations run under an explicit deadline.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ToolError;
use crate::geometry::{parse_stream_geometry, StreamGeometry};

/// Seam over the external media tools.
#[async_trait]
pub trait MediaToolchain: Send + Sync {
    /// Inspect a local media file and return its video stream geometry.
    async fn probe(&self, input: &Path) -> Result<StreamGeometry, ToolError>;

    /// Rewrite the container of a local media file for progressive playback
    /// (index atom up front, streams copied unmodified), writing to a new
    /// sibling path. The caller owns the returned file and must remove it
    /// once consumed.
    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, ToolError>;
}

/// ffprobe/ffmpeg-backed toolchain.
pub struct FfmpegToolchain {
    ffprobe_path: String,
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegToolchain {
    pub fn new(ffprobe_path: String, ffmpeg_path: String, timeout: Duration) -> Self {
        Self {
            ffprobe_path,
            ffmpeg_path,
            timeout,
        }
    }

    /// Run a prepared command to completion under the configured deadline.
    /// The child is killed if the deadline fires.
    pub(crate) async fn run_with_deadline(
        &self,
        tool: &'static str,
        mut command: Command,
    ) -> Result<Output, ToolError> {
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => Err(ToolError::TimedOut {
                tool,
                seconds: self.timeout.as_secs(),
            }),
            Ok(Err(source)) => Err(ToolError::Launch { tool, source }),
            Ok(Ok(output)) => Ok(output),
        }
    }
}

fn stderr_excerpt(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Sibling output path for a remux: `<input>.faststart.mp4`. The remux never
/// overwrites its input in place.
fn remux_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".faststart.mp4");
    PathBuf::from(name)
}

#[async_trait]
impl MediaToolchain for FfmpegToolchain {
    #[tracing::instrument(skip(self), fields(tool = "ffprobe"))]
    async fn probe(&self, input: &Path) -> Result<StreamGeometry, ToolError> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(input);

        let output = self.run_with_deadline("ffprobe", command).await?;

        if !output.status.success() {
            return Err(ToolError::Failed {
                tool: "ffprobe",
                status: output.status,
                stderr: stderr_excerpt(&output),
            });
        }

        let geometry = parse_stream_geometry(&output.stdout)?;

        tracing::debug!(
            width = geometry.width,
            height = geometry.height,
            ratio = %geometry.aspect_ratio(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "probed video geometry"
        );

        Ok(geometry)
    }

    #[tracing::instrument(skip(self), fields(tool = "ffmpeg"))]
    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, ToolError> {
        let start = std::time::Instant::now();
        let output_path = remux_output_path(input);

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4", "-y"])
            .arg(&output_path);

        let result = self.run_with_deadline("ffmpeg", command).await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                // A killed or unlaunchable ffmpeg may leave a partial file behind.
                let _ = tokio::fs::remove_file(&output_path).await;
                return Err(err);
            }
        };

        if !output.status.success() {
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(ToolError::Failed {
                tool: "ffmpeg",
                status: output.status,
                stderr: stderr_excerpt(&output),
            });
        }

        let metadata = tokio::fs::metadata(&output_path).await?;
        if metadata.len() == 0 {
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(ToolError::EmptyOutput { path: output_path });
        }

        tracing::debug!(
            output = %output_path.display(),
            size_bytes = metadata.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "remuxed video for fast start"
        );

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolchain(ffprobe: &str, ffmpeg: &str, timeout: Duration) -> FfmpegToolchain {
        FfmpegToolchain::new(ffprobe.to_string(), ffmpeg.to_string(), timeout)
    }

    #[test]
    fn test_remux_output_is_a_distinct_sibling() {
        let output = remux_output_path(Path::new("/tmp/upload-abc.mp4"));
        assert_eq!(output, PathBuf::from("/tmp/upload-abc.mp4.faststart.mp4"));
    }

    #[tokio::test]
    async fn test_launch_failure_is_typed() {
        let tools = toolchain(
            "/nonexistent/reelvault-ffprobe",
            "/nonexistent/reelvault-ffmpeg",
            Duration::from_secs(5),
        );
        let err = tools.probe(Path::new("/tmp/whatever.mp4")).await.unwrap_err();
        assert!(matches!(err, ToolError::Launch { tool: "ffprobe", .. }));
    }

    #[tokio::test]
    async fn test_unparseable_probe_output_is_typed() {
        // `echo` exits 0 and prints its arguments, which are not JSON.
        let tools = toolchain("echo", "echo", Duration::from_secs(5));
        let err = tools.probe(Path::new("input.mp4")).await.unwrap_err();
        assert!(matches!(err, ToolError::Parse(_)));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_typed() {
        let tools = toolchain("false", "false", Duration::from_secs(5));
        let err = tools.probe(Path::new("input.mp4")).await.unwrap_err();
        assert!(matches!(err, ToolError::Failed { tool: "ffprobe", .. }));
    }

    #[tokio::test]
    async fn test_deadline_kills_the_child() {
        let tools = toolchain("sleep", "sleep", Duration::from_millis(50));
        let mut command = Command::new("sleep");
        command.arg("5");
        let err = tools
            .run_with_deadline("ffprobe", command)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::TimedOut { tool: "ffprobe", .. }));
    }
}
