use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::schema::types::{Type, TypePtr};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::DatasetConfig;
use crate::constants::dataset::{COLUMN_TEXT, CONSUMED_COLUMNS};
use crate::errors::SeedError;
use crate::types::Row;

/// True when `path` has one of the `accepted` (normalized) extensions.
pub fn has_accepted_extension(path: &Path, accepted: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| accepted.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
}

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
}

/// True when a repository file path belongs to `split`.
///
/// Accepts the hub layouts `<split>/...` (as a whole directory component),
/// `...-<split>-...`, and file names starting with `<split>-`. An empty split
/// matches everything.
pub fn matches_split(remote_path: &str, split: &str) -> bool {
    if split.is_empty() {
        return true;
    }
    let path = Path::new(remote_path);
    let in_split_dir = path
        .parent()
        .is_some_and(|dir| dir.components().any(|component| component.as_os_str() == split));
    let split_token = format!("-{split}-");
    let split_prefix = format!("{split}-");
    in_split_dir
        || remote_path.contains(&split_token)
        || path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&split_prefix))
}

/// Shard files under `root`, sorted by path.
pub fn discover_shards(config: &DatasetConfig, root: &Path) -> Result<Vec<PathBuf>, SeedError> {
    if !root.is_dir() {
        return Err(SeedError::SourceUnavailable {
            source_id: config.source_id.clone(),
            reason: format!("snapshot directory {} does not exist", root.display()),
        });
    }
    let accepted = config.accepted_extensions();
    let mut shard_paths = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|err| SeedError::SourceUnavailable {
            source_id: config.source_id.clone(),
            reason: format!("failed walking {}: {err}", root.display()),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if has_accepted_extension(&path, &accepted) {
            shard_paths.push(path);
        }
    }
    shard_paths.sort();

    if shard_paths.is_empty() {
        return Err(SeedError::SourceUnavailable {
            source_id: config.source_id.clone(),
            reason: format!(
                "no shard files found under {} with extensions {:?}",
                root.display(),
                config.shard_extensions
            ),
        });
    }
    Ok(shard_paths)
}

/// Read every row of `shards` in order, stopping once `max_rows` rows are collected.
pub fn read_rows(
    source_id: &str,
    shards: &[PathBuf],
    max_rows: Option<usize>,
) -> Result<Vec<Row>, SeedError> {
    let started = Instant::now();
    let mut rows = Vec::new();
    for path in shards {
        let remaining = max_rows.map(|max| max.saturating_sub(rows.len()));
        if remaining == Some(0) {
            break;
        }
        let shard_rows = read_shard_rows(source_id, path, remaining)?;
        debug!(shard = %path.display(), rows = shard_rows.len(), "read shard");
        rows.extend(shard_rows);
    }
    info!(
        source = source_id,
        shards = shards.len(),
        rows = rows.len(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "rows loaded"
    );
    Ok(rows)
}

/// Read up to `limit` rows from a single parquet or JSON-lines shard.
pub fn read_shard_rows(
    source_id: &str,
    path: &Path,
    limit: Option<usize>,
) -> Result<Vec<Row>, SeedError> {
    if is_parquet(path) {
        read_parquet_rows(source_id, path, limit)
    } else {
        read_json_lines_rows(source_id, path, limit)
    }
}

fn read_parquet_rows(
    source_id: &str,
    path: &Path,
    limit: Option<usize>,
) -> Result<Vec<Row>, SeedError> {
    let file = File::open(path).map_err(|err| SeedError::SourceUnavailable {
        source_id: source_id.to_string(),
        reason: format!("failed opening parquet shard {}: {err}", path.display()),
    })?;
    let reader = SerializedFileReader::new(file).map_err(|err| SeedError::SourceUnavailable {
        source_id: source_id.to_string(),
        reason: format!("failed reading parquet metadata {}: {err}", path.display()),
    })?;

    let schema = reader.metadata().file_metadata().schema();
    let fields: Vec<TypePtr> = schema
        .get_fields()
        .iter()
        .filter(|field| CONSUMED_COLUMNS.contains(&field.name()))
        .cloned()
        .collect();
    if !fields.iter().any(|field| field.name() == COLUMN_TEXT) {
        return Err(SeedError::SourceInconsistent {
            source_id: source_id.to_string(),
            details: format!(
                "parquet shard {} has no '{COLUMN_TEXT}' column",
                path.display()
            ),
        });
    }
    let projection = Type::group_type_builder(schema.name())
        .with_fields(fields)
        .build()
        .map_err(|err| SeedError::SourceInconsistent {
            source_id: source_id.to_string(),
            details: format!("failed projecting parquet schema of {}: {err}", path.display()),
        })?;

    let iter = reader
        .get_row_iter(Some(projection))
        .map_err(|err| SeedError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: format!("failed iterating parquet shard {}: {err}", path.display()),
        })?;

    let mut rows = Vec::new();
    for (idx, row) in iter.enumerate() {
        if limit.is_some_and(|limit| rows.len() >= limit) {
            break;
        }
        let row = row.map_err(|err| SeedError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: format!(
                "failed reading parquet row {idx} in shard {}: {err}",
                path.display()
            ),
        })?;
        rows.push(into_row(source_id, path, idx, row.to_json_value())?);
    }
    Ok(rows)
}

fn read_json_lines_rows(
    source_id: &str,
    path: &Path,
    limit: Option<usize>,
) -> Result<Vec<Row>, SeedError> {
    let file = File::open(path).map_err(|err| SeedError::SourceUnavailable {
        source_id: source_id.to_string(),
        reason: format!("failed opening shard {}: {err}", path.display()),
    })?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        if limit.is_some_and(|limit| rows.len() >= limit) {
            break;
        }
        let line = line.map_err(|err| SeedError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: format!("failed reading shard {}: {err}", path.display()),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = serde_json::from_str::<Value>(trimmed).map_err(|err| {
            SeedError::SourceInconsistent {
                source_id: source_id.to_string(),
                details: format!(
                    "failed decoding JSON row from shard {} at line {}: {err}",
                    path.display(),
                    line_no + 1
                ),
            }
        })?;
        rows.push(into_row(source_id, path, line_no, value)?);
    }
    Ok(rows)
}

/// Unwrap an optional `{"row": {...}}` envelope and require a JSON object.
fn into_row(source_id: &str, path: &Path, idx: usize, value: Value) -> Result<Row, SeedError> {
    let payload = match value {
        Value::Object(mut object) if object.get("row").is_some_and(Value::is_object) => {
            object.remove("row").unwrap_or_default()
        }
        other => other,
    };
    match payload {
        Value::Object(row) => Ok(row),
        other => Err(SeedError::SourceInconsistent {
            source_id: source_id.to_string(),
            details: format!(
                "row {idx} of shard {} is not a JSON object: {other}",
                path.display()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_lines(path: &Path, lines: &[&str]) {
        let mut body = lines.join("\n");
        body.push('\n');
        fs::write(path, body).unwrap();
    }

    #[test]
    fn split_matching_covers_hub_layouts() {
        assert!(matches_split("data/test-00000-of-00001.parquet", "test"));
        assert!(matches_split("test/part-0.parquet", "test"));
        assert!(matches_split("speechocean-test-0.jsonl", "test"));
        assert!(!matches_split("data/train-00000-of-00001.parquet", "test"));
        assert!(!matches_split("data/contest.parquet", "test"));
        assert!(!matches_split("latest/part-0.parquet", "test"));
        assert!(matches_split("data/test/part-0.parquet", "test"));
        assert!(matches_split("anything.parquet", ""));
    }

    #[test]
    fn discover_shards_filters_extensions_and_sorts() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        write_lines(&temp.path().join("b.jsonl"), &["{}"]);
        write_lines(&temp.path().join("nested/a.ndjson"), &["{}"]);
        write_lines(&temp.path().join("README.md"), &["# readme"]);

        let config = DatasetConfig::new("local", "local/test", "test");
        let shards = discover_shards(&config, temp.path()).unwrap();
        let names: Vec<_> = shards
            .iter()
            .map(|path| path.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("b.jsonl"), PathBuf::from("nested/a.ndjson")]
        );
    }

    #[test]
    fn discover_shards_fails_for_missing_or_empty_dirs() {
        let temp = tempdir().unwrap();
        let config = DatasetConfig::new("local", "local/test", "test");

        let err = discover_shards(&config, &temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, SeedError::SourceUnavailable { .. }));

        let err = discover_shards(&config, temp.path()).unwrap_err();
        assert!(matches!(
            err,
            SeedError::SourceUnavailable { ref reason, .. } if reason.contains("no shard files")
        ));
    }

    #[cfg(unix)]
    #[test]
    fn discover_shards_fails_on_unreadable_entries() {
        let temp = tempdir().unwrap();
        write_lines(&temp.path().join("part-00000.jsonl"), &[r#"{"text":"one"}"#]);
        std::os::unix::fs::symlink(
            temp.path().join("gone.jsonl"),
            temp.path().join("part-00001.jsonl"),
        )
        .unwrap();

        let config = DatasetConfig::new("local", "local/test", "test");
        let err = discover_shards(&config, temp.path()).unwrap_err();
        assert!(matches!(
            err,
            SeedError::SourceUnavailable { ref reason, .. } if reason.contains("failed walking")
        ));
    }

    #[test]
    fn json_lines_skip_blanks_and_unwrap_row_envelopes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("rows.jsonl");
        write_lines(
            &path,
            &[
                r#"{"text":"plain","accuracy":0.9}"#,
                "",
                r#"{"row_idx":1,"row":{"text":"wrapped"}}"#,
            ],
        );

        let rows = read_shard_rows("local", &path, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["text"], "plain");
        assert_eq!(rows[1]["text"], "wrapped");
    }

    #[test]
    fn json_lines_reject_non_object_rows_and_bad_json() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("rows.jsonl");
        write_lines(&path, &[r#"["not","an","object"]"#]);
        let err = read_shard_rows("local", &path, None).unwrap_err();
        assert!(matches!(err, SeedError::SourceInconsistent { .. }));

        write_lines(&path, &["{broken"]);
        let err = read_shard_rows("local", &path, None).unwrap_err();
        assert!(matches!(
            err,
            SeedError::SourceInconsistent { ref details, .. } if details.contains("line 1")
        ));
    }

    #[test]
    fn read_rows_honors_max_rows_across_shards() {
        let temp = tempdir().unwrap();
        let first = temp.path().join("a.jsonl");
        let second = temp.path().join("b.jsonl");
        write_lines(&first, &[r#"{"text":"one"}"#, r#"{"text":"two"}"#]);
        write_lines(&second, &[r#"{"text":"three"}"#, r#"{"text":"four"}"#]);

        let rows = read_rows("local", &[first, second], Some(3)).unwrap();
        let texts: Vec<_> = rows.iter().map(|row| row["text"].clone()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    enum Cell {
        Bytes(&'static [u8]),
        Int64(i64),
        NullDouble,
    }

    /// Write a single-row parquet shard; `cells` follow the schema's column order.
    fn write_parquet_shard(path: &Path, message: &str, cells: &[Cell]) {
        use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int64Type};
        use parquet::file::properties::WriterProperties;
        use parquet::file::writer::SerializedFileWriter;
        use parquet::schema::parser::parse_message_type;
        use std::sync::Arc;

        let schema = Arc::new(parse_message_type(message).unwrap());
        let props = Arc::new(WriterProperties::builder().build());
        let file = fs::File::create(path).unwrap();
        let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();
        let mut row_group = writer.next_row_group().unwrap();
        let mut cells = cells.iter();
        while let Some(mut column) = row_group.next_column().unwrap() {
            match cells.next().unwrap() {
                Cell::Bytes(bytes) => {
                    column
                        .typed::<ByteArrayType>()
                        .write_batch(&[ByteArray::from(bytes.to_vec())], None, None)
                        .unwrap();
                }
                Cell::Int64(value) => {
                    column
                        .typed::<Int64Type>()
                        .write_batch(&[*value], None, None)
                        .unwrap();
                }
                Cell::NullDouble => {
                    column
                        .typed::<DoubleType>()
                        .write_batch(&[], Some(&[0i16][..]), None)
                        .unwrap();
                }
            }
            column.close().unwrap();
        }
        row_group.close().unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn parquet_rows_keep_only_consumed_columns() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("test-00000-of-00001.parquet");
        write_parquet_shard(
            &path,
            "message schema {
                REQUIRED BYTE_ARRAY audio;
                REQUIRED BYTE_ARRAY text (UTF8);
                REQUIRED INT64 accuracy;
                OPTIONAL DOUBLE fluency;
            }",
            &[
                Cell::Bytes(&[0x52, 0x49, 0x46, 0x46]),
                Cell::Bytes(b"WE CALL IT BEAR"),
                Cell::Int64(8),
                Cell::NullDouble,
            ],
        );

        let rows = read_shard_rows("local", &path, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].contains_key("audio"));
        assert_eq!(rows[0]["text"], "WE CALL IT BEAR");
        assert_eq!(rows[0]["accuracy"], 8);
        assert!(rows[0]["fluency"].is_null());
    }

    #[test]
    fn parquet_shard_without_text_is_inconsistent() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("test-00000-of-00001.parquet");
        write_parquet_shard(
            &path,
            "message schema {
                REQUIRED BYTE_ARRAY audio;
                REQUIRED INT64 accuracy;
            }",
            &[Cell::Bytes(&[0x00]), Cell::Int64(5)],
        );

        let err = read_shard_rows("local", &path, None).unwrap_err();
        assert!(matches!(
            err,
            SeedError::SourceInconsistent { ref details, .. } if details.contains("'text'")
        ));
    }

    #[test]
    fn corrupt_parquet_shard_is_unavailable() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("broken.parquet");
        fs::write(&path, b"not parquet").unwrap();
        let err = read_shard_rows("local", &path, None).unwrap_err();
        assert!(matches!(err, SeedError::SourceUnavailable { .. }));
    }
}
