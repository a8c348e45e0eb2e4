use crate::support::{load_records_or_exit, load_value_or_exit};
use serde_json::json;
use vellum_patch::{append_record_to_path, next_seq, record};

pub fn run(base: String, next: String, log: String, actor: String, json_output: bool) {
    let base_value = load_value_or_exit(&base);
    let next_value = load_value_or_exit(&next);

    let existing = load_records_or_exit(&log);
    let seq = next_seq(&existing);
    let rec = record(&base_value, &next_value, seq, &actor);
    let patch_count = rec.patches.len();

    append_record_to_path(&log, rec).unwrap_or_else(|e| {
        eprintln!("error: failed to append to {log}: {e}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "base": base,
            "next": next,
            "log": log,
            "seq": seq,
            "patch_count": patch_count,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("vellum record {base} {next}");
        println!("  Log: {log}");
        println!("  Seq: {seq}");
        println!("  Patches: {patch_count}");
    }
}
