use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    // Copy templates and config next to the executable
    let Some(target_dir) = target_dir() else {
        return;
    };

    let templates_src = Path::new("templates");
    if templates_src.exists() {
        copy_dir_recursive(templates_src, &target_dir.join("templates"));
        println!("cargo:rerun-if-changed=templates/");
    }

    for file in ["config.json", "chart_config.json"] {
        copy_file(Path::new(file), &target_dir.join(file));
    }
}

/// OUT_DIR is target/<profile>/build/drop-tally-xxx/out; the executable lives in target/<profile>.
fn target_dir() -> Option<PathBuf> {
    let out_dir = env::var("OUT_DIR").ok()?;
    Path::new(&out_dir).ancestors().nth(3).map(Path::to_path_buf)
}

fn copy_file(src: &Path, dst: &Path) {
    if src.exists() {
        let _ = fs::copy(src, dst);
        println!("cargo:rerun-if-changed={}", src.display());
    }
}

/// Recursively copies a directory and its contents.
fn copy_dir_recursive(src: &Path, dst: &Path) {
    let _ = fs::create_dir_all(dst);

    if let Ok(entries) = fs::read_dir(src) {
        for entry in entries.flatten() {
            let src_path = entry.path();
            let dst_path = dst.join(entry.file_name());

            if src_path.is_dir() {
                copy_dir_recursive(&src_path, &dst_path);
            } else {
                let _ = fs::copy(&src_path, &dst_path);
            }
        }
    }
}
