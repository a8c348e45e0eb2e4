use crate::support::load_value_or_exit;
use serde_json::json;

pub fn run(doc: String, json_output: bool) {
    let value = load_value_or_exit(&doc);
    let hash = value.content_hash();

    if json_output {
        let payload = json!({
            "doc": doc,
            "content_hash": hash.0,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("{hash}");
    }
}
