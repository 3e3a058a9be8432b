//! PLY to PTS conversion driver

use crate::error::ConvertError;
use crate::ply::{PlyHeader, parse_header, remap_vertex};
use crate::types::MAX_HEADER_LINES;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, error, info};

/// How many vertex lines follow the header in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataLoop {
    /// Every declared vertex. Missing lines are an error.
    #[default]
    AllVertices,
    /// Only the first data line, then stop. Matches the legacy converter,
    /// which wrote a single vertex regardless of the declared count.
    FirstVertexOnly,
}

/// Conversion options.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub max_header_lines: usize,
    pub data_loop: DataLoop,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many lines may be scanned for `end_header`.
    pub fn with_max_header_lines(mut self, lines: usize) -> Self {
        self.max_header_lines = lines;
        self
    }

    /// Set how many vertex lines are converted.
    pub fn with_data_loop(mut self, data_loop: DataLoop) -> Self {
        self.data_loop = data_loop;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_header_lines: MAX_HEADER_LINES,
            data_loop: DataLoop::AllVertices,
        }
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub header: PlyHeader,
    pub vertices_written: usize,
}

/// Convert PLY text from `reader` into PTS text on `writer`.
#[tracing::instrument(skip_all)]
pub fn convert<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    options: &ConvertOptions,
) -> Result<ConversionSummary, ConvertError> {
    info!("Starting conversion");
    report(write_pts(reader, writer, options))
}

/// Convert the PLY file at `source` into a PTS file at `target`.
///
/// The parent directory of `target` is created if needed. On failure a
/// partially written target is left in place.
#[tracing::instrument(skip_all, fields(source = %source.display(), target = %target.display()))]
pub fn convert_file(
    source: &Path,
    target: &Path,
    options: &ConvertOptions,
) -> Result<ConversionSummary, ConvertError> {
    info!("Starting conversion");
    report(convert_paths(source, target, options))
}

fn convert_paths(
    source: &Path,
    target: &Path,
    options: &ConvertOptions,
) -> Result<ConversionSummary, ConvertError> {
    let mut reader = BufReader::new(File::open(source)?);

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!("Creating output directory: {}", parent.display());
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(target)?);

    write_pts(&mut reader, &mut writer, options)
}

fn report(result: Result<ConversionSummary, ConvertError>) -> Result<ConversionSummary, ConvertError> {
    match &result {
        Ok(summary) => info!(
            vertex_count = summary.header.vertex_count,
            vertices_written = summary.vertices_written,
            "Conversion finished"
        ),
        Err(e) => error!("Conversion failed: {}", e),
    }
    result
}

fn write_pts<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    options: &ConvertOptions,
) -> Result<ConversionSummary, ConvertError> {
    let header = parse_header(reader, options.max_header_lines)?;
    writeln!(writer, "{}", header.vertex_count)?;

    let limit = match options.data_loop {
        DataLoop::AllVertices => header.vertex_count,
        DataLoop::FirstVertexOnly => 1,
    };

    let mut line_number = header.header_lines;
    let mut line = String::new();
    let mut written = 0;

    while written < limit {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_number += 1;

        if line.trim().is_empty() {
            debug!(line_number, "Skipping blank line");
            continue;
        }

        let pts = remap_vertex(&line, line_number, &header.source_order)?;
        writeln!(writer, "{}", pts)?;
        written += 1;
    }

    if options.data_loop == DataLoop::AllVertices && written < limit {
        return Err(ConvertError::TruncatedVertexData {
            expected: limit,
            found: written,
        });
    }

    writer.flush()?;

    Ok(ConversionSummary {
        header,
        vertices_written: written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TargetProperty;
    use std::io::Cursor;

    const SAMPLE: &str = "property float x\nproperty float y\nproperty float z\nproperty float foo\n\
                          element vertex 2\nend_header\n1.0 2.0 3.0 9\n4.0 5.0 6.0 8\n";

    fn run(input: &str, options: &ConvertOptions) -> (Result<ConversionSummary, ConvertError>, String) {
        let mut output = Vec::new();
        let result = convert(&mut Cursor::new(input.as_bytes()), &mut output, options);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_first_vertex_only() {
        let options = ConvertOptions::new().with_data_loop(DataLoop::FirstVertexOnly);
        let (result, output) = run(SAMPLE, &options);
        let summary = result.unwrap();

        assert_eq!(output, "2\n1.0 2.0 3.0 255 255 255 255\n");
        assert_eq!(summary.vertices_written, 1);
        assert_eq!(summary.header.source_order.get(TargetProperty::X), Some(0));
        assert_eq!(summary.header.source_order.get(TargetProperty::Y), Some(1));
        assert_eq!(summary.header.source_order.get(TargetProperty::Z), Some(2));
        assert!(summary.header.unsupported.contains("foo"));
    }

    #[test]
    fn test_all_vertices() {
        let (result, output) = run(SAMPLE, &ConvertOptions::default());

        assert_eq!(
            output,
            "2\n1.0 2.0 3.0 255 255 255 255\n4.0 5.0 6.0 255 255 255 255\n"
        );
        assert_eq!(result.unwrap().vertices_written, 2);
    }

    #[test]
    fn test_colored_cloud_with_faces() {
        let input = "ply\nformat ascii 1.0\ncomment test\nelement vertex 3\nproperty float x\n\
                     property float y\nproperty float z\nproperty uchar r\nproperty uchar g\n\
                     property uchar b\n\
                     element face 1\nproperty list uchar int vertex_indices\nend_header\n\
                     0 0 0 10 20 30\n1 0 0 40 50 60\n0 1 0 70 80 90\n3 0 1 2\n";
        let (result, output) = run(input, &ConvertOptions::default());

        assert_eq!(
            output,
            "3\n0 0 0 255 10 20 30\n1 0 0 255 40 50 60\n0 1 0 255 70 80 90\n"
        );
        assert_eq!(result.unwrap().vertices_written, 3);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = "element vertex 2\nproperty float x\nend_header\n\n1\n\n2\n";
        let (result, output) = run(input, &ConvertOptions::default());

        assert_eq!(output, "2\n1 255 255 255 255 255 255\n2 255 255 255 255 255 255\n");
        assert_eq!(result.unwrap().vertices_written, 2);
    }

    #[test]
    fn test_truncated_vertex_data() {
        let input = "element vertex 3\nproperty float x\nend_header\n1\n2\n";
        let (result, output) = run(input, &ConvertOptions::default());

        assert!(matches!(
            result,
            Err(ConvertError::TruncatedVertexData {
                expected: 3,
                found: 2
            })
        ));
        assert!(output.starts_with("3\n"));
    }

    #[test]
    fn test_first_vertex_only_without_data() {
        let options = ConvertOptions::new().with_data_loop(DataLoop::FirstVertexOnly);
        let (result, output) = run("element vertex 0\nend_header\n", &options);

        assert_eq!(output, "0\n");
        assert_eq!(result.unwrap().vertices_written, 0);
    }

    #[test]
    fn test_missing_vertex_count_writes_nothing() {
        let (result, output) = run("ply\nproperty float x\nend_header\n1.0\n", &ConvertOptions::default());

        assert!(matches!(result, Err(ConvertError::MissingVertexCount)));
        assert!(output.is_empty());
    }

    #[test]
    fn test_custom_header_bound() {
        let input = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nend_header\n1\n";
        let options = ConvertOptions::new().with_max_header_lines(4);
        let (result, output) = run(input, &options);

        assert!(matches!(result, Err(ConvertError::MalformedHeader { scanned: 4 })));
        assert!(output.is_empty());
    }

    #[test]
    fn test_short_vertex_line_reports_line_number() {
        let input = "ply\nelement vertex 2\nproperty float x\nproperty float y\nend_header\n1 2\n3\n";
        let (result, _) = run(input, &ConvertOptions::default());

        assert!(matches!(
            result,
            Err(ConvertError::ShortVertexLine { line: 7, index: 1, tokens: 1 })
        ));
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let (_, first) = run(SAMPLE, &ConvertOptions::default());
        let (_, second) = run(SAMPLE, &ConvertOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_convert_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("cloud.ply");
        let target = dir.path().join("out").join("nested").join("cloud.pts");
        std::fs::write(&source, SAMPLE).unwrap();

        let summary = convert_file(&source, &target, &ConvertOptions::default()).unwrap();
        assert_eq!(summary.vertices_written, 2);

        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(
            written,
            "2\n1.0 2.0 3.0 255 255 255 255\n4.0 5.0 6.0 255 255 255 255\n"
        );

        // Existing directory and target are fine on a second run.
        convert_file(&source, &target, &ConvertOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), written);
    }

    #[test]
    fn test_convert_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("missing.ply");
        let target = dir.path().join("out.pts");

        let err = convert_file(&source, &target, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
        assert!(!target.exists());
    }

    #[test]
    fn test_convert_file_keeps_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.ply");
        let target = dir.path().join("bad.pts");
        std::fs::write(&source, "ply\nproperty float x\nend_header\n").unwrap();

        let err = convert_file(&source, &target, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingVertexCount));
        assert!(target.exists());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "");
    }
}
