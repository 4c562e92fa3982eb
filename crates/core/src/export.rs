use crate::report::Report;

pub fn to_csv(report: &Report, mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["table", "key", "size", "lines", "files"])?;
    for (path, s) in report.ranked_directories() {
        writer.write_record([
            "directory".to_string(),
            path.display().to_string(),
            s.size.to_string(),
            s.lines.to_string(),
            s.count.to_string(),
        ])?;
    }
    for (ext, s) in report.ranked_extensions() {
        writer.write_record([
            "extension".to_string(),
            ext.clone(),
            s.size.to_string(),
            s.lines.to_string(),
            s.count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(report: &Report) -> serde_json::Value {
    let row = |key: String, s: &crate::model::FileStatistics| {
        serde_json::json!({
            "key": key,
            "size": s.size,
            "lines": s.lines,
            "files": s.count,
        })
    };
    serde_json::json!({
        "generated_at": chrono::Local::now().to_rfc3339(),
        "roots": report.roots,
        "text_extensions": report.text_extensions,
        "include_extensions": report.include_extensions,
        "by_directory": report.ranked_directories().into_iter()
            .map(|(p, s)| row(p.display().to_string(), s))
            .collect::<Vec<_>>(),
        "by_extension": report.ranked_extensions().into_iter()
            .map(|(e, s)| row(e.clone(), s))
            .collect::<Vec<_>>(),
    })
}
