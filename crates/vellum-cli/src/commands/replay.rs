use crate::support::{emit_value_or_exit, load_records_or_exit, load_value_or_exit};
use serde_json::json;

pub fn run(doc: String, log: String, output: Option<String>, json_output: bool) {
    let base = load_value_or_exit(&doc);
    let records = load_records_or_exit(&log);

    let result = vellum_patch::replay(&base, &records).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "doc": doc,
            "log": log,
            "record_count": records.len(),
            "content_hash": result.content_hash().0,
            "output": output,
            "result": result,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
        if let Some(path) = output {
            emit_value_or_exit(&result, Some(&path));
        }
        return;
    }

    let written = emit_value_or_exit(&result, output.as_deref());
    if let Some(path) = written {
        println!("vellum replay {doc}");
        println!("  Log: {} ({} records)", log, records.len());
        println!("  Wrote: {}", path.display());
    }
}
