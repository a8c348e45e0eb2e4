use std::fs;
use std::path::{Path as FsPath, PathBuf};
use vellum_kernel::Value;
use vellum_patch::{Patch, PatchRecord, read_records_from_path};

pub fn load_value_or_exit(path: &str) -> Value {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {path}: {e}");
        std::process::exit(1);
    });
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {path}: {e}");
        std::process::exit(1);
    });
    Value::from(raw)
}

pub fn load_patches_or_exit(path: &str) -> Vec<Patch> {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {path}: {e}");
        std::process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("error: failed to parse patches from {path}: {e}");
        std::process::exit(1);
    })
}

pub fn load_records_or_exit(path: &str) -> Vec<PatchRecord> {
    read_records_from_path(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read patch log {path}: {e}");
        std::process::exit(1);
    })
}

pub fn render_value(value: &Value) -> String {
    serde_json::to_string_pretty(value).expect("json serialization")
}

/// Emit the produced document: to a file when `output` is given,
/// otherwise to stdout. Returns the path written, if any.
pub fn emit_value_or_exit(value: &Value, output: Option<&str>) -> Option<PathBuf> {
    match output {
        Some(path) => {
            if let Some(parent) = FsPath::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).unwrap_or_else(|e| {
                    eprintln!("error: failed to create {}: {e}", parent.display());
                    std::process::exit(1);
                });
            }
            let mut text = render_value(value);
            text.push('\n');
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("error: failed to write {path}: {e}");
                std::process::exit(1);
            });
            Some(PathBuf::from(path))
        }
        None => {
            println!("{}", render_value(value));
            None
        }
    }
}
