use std::fs;
use std::path::{Path, PathBuf};

const SPLICE_MAGIC: &[u8; 6] = b"SPLICE";
const VERSION_SLOT_LEN: usize = 32;
const STEPS_PER_TRACK: usize = 16;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    for fixture in fixtures() {
        write_fixture(&root.join(fixture.name).join("input.splice"), &fixture)?;
    }
    Ok(())
}

struct FixtureSpec {
    name: &'static str,
    version: &'static str,
    tempo: f32,
    tracks: Vec<(u8, &'static str, &'static str)>,
    trailing: usize,
}

fn fixtures() -> Vec<FixtureSpec> {
    vec![
        FixtureSpec {
            name: "pattern_1",
            version: "0.808-alpha",
            tempo: 120.0,
            tracks: vec![
                (0, "kick", "|x---|x---|x---|x---|"),
                (1, "snare", "|----|x---|----|x---|"),
                (2, "clap", "|----|x-x-|----|----|"),
                (3, "hh-open", "|--x-|--x-|x-x-|--x-|"),
                (4, "hh-close", "|x---|x---|----|x--x|"),
                (5, "cowbell", "|----|----|--x-|----|"),
            ],
            trailing: 0,
        },
        FixtureSpec {
            name: "pattern_2",
            version: "0.808-alpha",
            tempo: 98.4,
            tracks: vec![
                (0, "kick", "|x---|----|x---|----|"),
                (1, "snare", "|----|x---|----|x---|"),
                (3, "hh-open", "|--x-|--x-|x-x-|--x-|"),
                (5, "cowbell", "|----|----|x---|----|"),
            ],
            trailing: 0,
        },
        FixtureSpec {
            name: "trailing_padding",
            version: "0.909",
            tempo: 240.0,
            tracks: vec![
                (0, "SubKick", "|----|----|----|----|"),
                (1, "Kick", "|x---|----|x---|----|"),
                (99, "Maracas", "|x-x-|x-x-|x-x-|x-x-|"),
                (255, "Low Conga", "|----|x---|----|----|"),
            ],
            trailing: 24,
        },
        FixtureSpec {
            name: "no_tracks",
            version: "0.708-alpha",
            tempo: 999.0,
            tracks: Vec::new(),
            trailing: 0,
        },
    ]
}

fn write_fixture(path: &Path, spec: &FixtureSpec) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }

    let mut body = Vec::new();
    let mut version = [0u8; VERSION_SLOT_LEN];
    version[..spec.version.len()].copy_from_slice(spec.version.as_bytes());
    body.extend_from_slice(&version);
    body.extend_from_slice(&spec.tempo.to_le_bytes());
    for (id, name, marks) in &spec.tracks {
        body.push(*id);
        body.extend_from_slice(&(name.len() as u32).to_be_bytes());
        body.extend_from_slice(name.as_bytes());
        body.extend_from_slice(&step_bytes(marks)?);
    }

    let mut output = SPLICE_MAGIC.to_vec();
    output.extend_from_slice(&(body.len() as u64).to_be_bytes());
    output.extend_from_slice(&body);
    output.extend(std::iter::repeat_n(0u8, spec.trailing));

    fs::write(path, output).map_err(|err| format!("failed to write {}: {}", path.display(), err))?;
    Ok(())
}

fn step_bytes(marks: &str) -> Result<[u8; STEPS_PER_TRACK], String> {
    let mut steps = [0u8; STEPS_PER_TRACK];
    let mut count = 0;
    for mark in marks.chars().filter(|c| *c != '|') {
        let slot = steps
            .get_mut(count)
            .ok_or_else(|| format!("too many steps in {marks}"))?;
        *slot = match mark {
            'x' => 1,
            '-' => 0,
            other => return Err(format!("unknown step mark '{other}' in {marks}")),
        };
        count += 1;
    }
    if count != STEPS_PER_TRACK {
        return Err(format!("expected {STEPS_PER_TRACK} steps in {marks}, got {count}"));
    }
    Ok(steps)
}
