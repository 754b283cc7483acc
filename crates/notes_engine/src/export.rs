use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::filename::export_stem;
use crate::persist::{AtomicFileWriter, PersistError};

/// Everything needed to write one topic to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub topic_id: String,
    pub title: String,
    pub tags: Vec<String>,
    /// Oldest first.
    pub entries: Vec<ExportEntry>,
    pub exported_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub id: String,
    pub content: String,
    pub created_at: i64,
    pub favorited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub entry_count: usize,
    pub markdown_path: PathBuf,
    pub manifest_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn export_topic(output_dir: &Path, doc: &ExportDocument) -> Result<ExportSummary, ExportError> {
    let stem = export_stem(&doc.title, &doc.topic_id);
    let markdown_name = format!("{stem}.md");
    let manifest_name = format!("{stem}.attachments.json");

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let markdown_path = writer.write(&markdown_name, &render_markdown(doc))?;

    let manifest = json!({
        "topicId": doc.topic_id,
        "title": doc.title,
        "tags": doc.tags,
        "exportedAt": format_timestamp(doc.exported_at),
        "markdown": markdown_name,
        "sessions": doc.entries.iter().map(|e| {
            json!({
                "id": e.id,
                "createdAt": format_timestamp(e.created_at),
                "favorited": e.favorited,
                "chars": e.content.chars().count(),
            })
        }).collect::<Vec<_>>()
    });
    let manifest_path = writer.write(&manifest_name, &serde_json::to_string_pretty(&manifest)?)?;

    Ok(ExportSummary {
        entry_count: doc.entries.len(),
        markdown_path,
        manifest_path,
    })
}

fn render_markdown(doc: &ExportDocument) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&format!("topic_id: {}\n", doc.topic_id));
    out.push_str(&format!("title: {}\n", doc.title));
    out.push_str(&format!("tags: [{}]\n", doc.tags.join(", ")));
    out.push_str(&format!("exported_utc: {}\n", format_timestamp(doc.exported_at)));
    out.push_str("---\n\n");
    out.push_str(&format!("# {}\n", doc.title));

    for entry in &doc.entries {
        let star = if entry.favorited { " ★" } else { "" };
        out.push_str(&format!("\n## {}{}\n\n", format_timestamp(entry.created_at), star));
        out.push_str(entry.content.trim_end());
        out.push('\n');
    }
    out
}

fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| ms.to_string())
}
