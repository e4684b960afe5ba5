use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use splice_core::decode_file;

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.splice");
        if !input.exists() {
            continue;
        }
        regenerate_one(&input, &path)?;
    }

    Ok(())
}

fn regenerate_one(input: &Path, dir: &Path) -> Result<(), String> {
    let pattern = decode_file(input)
        .map_err(|err| format!("decode failed for {}: {}", input.display(), err))?;
    let json = serde_json::to_string_pretty(&pattern)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;

    let pattern_path = dir.join("expected_pattern.json");
    fs::write(&pattern_path, json + "\n")
        .map_err(|err| format!("failed to write {}: {}", pattern_path.display(), err))?;
    let render_path = dir.join("expected_render.txt");
    fs::write(&render_path, pattern.to_string())
        .map_err(|err| format!("failed to write {}: {}", render_path.display(), err))?;
    Ok(())
}
