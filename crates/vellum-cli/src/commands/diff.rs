use crate::support::load_value_or_exit;
use serde_json::json;

pub fn run(base: String, next: String, json_output: bool) {
    let base_value = load_value_or_exit(&base);
    let next_value = load_value_or_exit(&next);

    let patches = vellum_patch::diff(&base_value, &next_value);

    if json_output {
        let payload = json!({
            "base": base,
            "next": next,
            "base_hash": base_value.content_hash().0,
            "next_hash": next_value.content_hash().0,
            "patch_count": patches.len(),
            "patches": patches,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
        return;
    }

    println!("vellum diff {base} {next}");
    println!("  Patches: {}", patches.len());
    for patch in &patches {
        println!("  {} {}", patch.op(), patch.path());
    }
}
