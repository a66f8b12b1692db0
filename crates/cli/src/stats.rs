use codenav_core::{IndexBackend, StoreHandle};
use serde_json::json;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Records")]
    records: usize,
}

pub async fn run(handle: &StoreHandle, json: bool) -> Result<String, Box<dyn std::error::Error>> {
    let backend = handle.store().backend();
    let stats = backend.stats().await?;
    let uploads = backend.upload_ids().await?;

    if json {
        return Ok(serde_json::to_string_pretty(&json!({
            "uploads": uploads,
            "documents": stats.documents,
            "result_chunks": stats.result_chunks,
            "location_records": stats.location_records,
        }))?);
    }

    let rows = vec![
        StatRow {
            table: "uploads",
            records: stats.uploads,
        },
        StatRow {
            table: "documents",
            records: stats.documents,
        },
        StatRow {
            table: "result chunks",
            records: stats.result_chunks,
        },
        StatRow {
            table: "location records",
            records: stats.location_records,
        },
    ];
    let ids: Vec<String> = uploads.iter().map(|id| id.to_string()).collect();
    Ok(format!(
        "{}\nUploads: {}",
        Table::new(rows),
        if ids.is_empty() {
            "-".to_string()
        } else {
            ids.join(", ")
        }
    ))
}
