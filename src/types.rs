/// Identifier for the source that produced rows.
/// Examples: `speechocean762`, `snapshot`
pub type SourceId = String;
/// Hugging Face dataset repository id.
/// Example: `mispeech/speechocean762`
pub type DatasetId = String;
/// Run-scoped sequential sentence identifier, starting at 1.
pub type SentenceId = u32;
/// One decoded dataset row as a JSON object keyed by column name.
/// Example: `{"text": "WE CALL IT BEAR", "accuracy": 8, "fluency": 9}`
pub type Row = serde_json::Map<String, serde_json::Value>;
/// Remote file path inside a dataset repository.
/// Example: `data/test-00000-of-00001.parquet`
pub type RemotePath = String;
