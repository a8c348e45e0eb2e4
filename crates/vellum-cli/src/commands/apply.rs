use crate::support::{emit_value_or_exit, load_patches_or_exit, load_value_or_exit};
use serde_json::json;

pub fn run(doc: String, patches: String, output: Option<String>, json_output: bool) {
    let base = load_value_or_exit(&doc);
    let patch_list = load_patches_or_exit(&patches);

    let result = vellum_patch::apply(&base, &patch_list).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "doc": doc,
            "patches": patches,
            "patch_count": patch_list.len(),
            "unchanged": base.ptr_eq(&result),
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
        println!("vellum apply {doc}");
        println!("  Patches: {} ({})", patches, patch_list.len());
        println!("  Unchanged: {}", if base.ptr_eq(&result) { "yes" } else { "no" });
        println!("  Wrote: {}", path.display());
    }
}
