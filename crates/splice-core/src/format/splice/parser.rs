use std::io::Read;

use tracing::{debug, trace};

use super::error::{Field, SpliceError};
use super::layout;
use super::reader::{BoundedReader, read_prefix};
use crate::{Pattern, Step, Steps, Track};

/// Decode a complete SPLICE document from `reader`.
///
/// The reader must be positioned at the magic bytes. Only the declared body
/// is consumed; anything after it is left unread.
///
/// # Errors
/// Returns the first `SpliceError` encountered; no partial pattern is
/// produced.
pub fn decode<R: Read>(mut reader: R) -> Result<Pattern, SpliceError> {
    read_header(&mut reader)?;
    let body_size = read_body_size(&mut reader)?;
    debug!(body_size, "SPLICE header accepted");

    let mut body = BoundedReader::new(reader, body_size);
    let version = read_version(&mut body)?;
    let tempo = read_tempo(&mut body)?;
    trace!(%version, tempo, "pattern preamble decoded");

    let mut tracks = Vec::new();
    while !body.is_exhausted() {
        let track = read_track(&mut body, tracks.len())?;
        trace!(
            id = track.id,
            name = %track.name,
            remaining = body.remaining(),
            "track decoded"
        );
        tracks.push(track);
    }
    debug!(
        tracks = tracks.len(),
        consumed = body.consumed(),
        "SPLICE body decoded"
    );

    Ok(Pattern {
        version,
        tempo,
        tracks,
    })
}

/// Decode a SPLICE document held in memory.
pub fn decode_bytes(bytes: &[u8]) -> Result<Pattern, SpliceError> {
    decode(bytes)
}

fn read_header<R: Read>(reader: &mut R) -> Result<(), SpliceError> {
    let found = read_prefix::<_, { layout::MAGIC_LEN }>(reader, Field::Header)?;
    if &found != layout::SPLICE_MAGIC {
        return Err(SpliceError::HeaderMismatch { found });
    }
    Ok(())
}

fn read_body_size<R: Read>(reader: &mut R) -> Result<u64, SpliceError> {
    let bytes = read_prefix::<_, { layout::BODY_SIZE_LEN }>(reader, Field::BodySize)?;
    Ok(u64::from_be_bytes(bytes))
}

fn read_version<R: Read>(body: &mut BoundedReader<R>) -> Result<String, SpliceError> {
    let slot = body.read_array::<{ layout::VERSION_SLOT_LEN }>(Field::Version)?;
    let end = slot
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| SpliceError::Malformed {
            field: Field::Version,
            detail: format!(
                "no NUL terminator in {}-byte slot",
                layout::VERSION_SLOT_LEN
            ),
        })?;
    Ok(String::from_utf8_lossy(&slot[..end]).into_owned())
}

fn read_tempo<R: Read>(body: &mut BoundedReader<R>) -> Result<f32, SpliceError> {
    body.read_f32_le(Field::Tempo)
}

fn read_track<R: Read>(body: &mut BoundedReader<R>, index: usize) -> Result<Track, SpliceError> {
    let id = body.read_u8(Field::TrackId)?;
    let name_len = body.read_u32_be(Field::TrackNameLength)?;
    let name = body.read_vec(Field::TrackName, u64::from(name_len))?;
    let raw_steps = body.read_array::<{ layout::STEPS_PER_TRACK }>(Field::TrackSteps)?;
    let steps = read_steps(&raw_steps, index)?;

    Ok(Track {
        id,
        name: String::from_utf8_lossy(&name).into_owned(),
        steps,
    })
}

fn read_steps(
    raw: &[u8; layout::STEPS_PER_TRACK],
    track_index: usize,
) -> Result<Steps, SpliceError> {
    let mut steps = [Step::Silent; layout::STEPS_PER_TRACK];
    for (position, (slot, &byte)) in steps.iter_mut().zip(raw.iter()).enumerate() {
        *slot = Step::from_byte(byte).ok_or_else(|| SpliceError::Malformed {
            field: Field::TrackSteps,
            detail: format!(
                "step {position} of track {track_index} is {byte:#04x}, expected {} or {}",
                layout::STEP_SILENT,
                layout::STEP_TRIGGERED
            ),
        })?;
    }
    Ok(Steps::new(steps))
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_bytes};
    use crate::format::splice::error::{Field, SpliceError};
    use crate::format::splice::layout;
    use crate::{Step, Track};

    const KICK_STEPS: [u8; 16] = [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0];

    fn version_slot(text: &str) -> [u8; layout::VERSION_SLOT_LEN] {
        let mut slot = [0u8; layout::VERSION_SLOT_LEN];
        slot[..text.len()].copy_from_slice(text.as_bytes());
        slot
    }

    fn track_record(id: u8, name: &str, steps: &[u8; 16]) -> Vec<u8> {
        let mut record = vec![id];
        record.extend_from_slice(&(name.len() as u32).to_be_bytes());
        record.extend_from_slice(name.as_bytes());
        record.extend_from_slice(steps);
        record
    }

    fn document(body: &[u8], declared: u64) -> Vec<u8> {
        let mut doc = layout::SPLICE_MAGIC.to_vec();
        doc.extend_from_slice(&declared.to_be_bytes());
        doc.extend_from_slice(body);
        doc
    }

    fn body(version: &str, tempo: f32, tracks: &[Vec<u8>]) -> Vec<u8> {
        let mut body = version_slot(version).to_vec();
        body.extend_from_slice(&tempo.to_le_bytes());
        for track in tracks {
            body.extend_from_slice(track);
        }
        body
    }

    fn well_formed(tracks: &[Vec<u8>]) -> Vec<u8> {
        let body = body("0.808-alpha", 120.0, tracks);
        document(&body, body.len() as u64)
    }

    #[test]
    fn decodes_pattern_without_tracks() {
        let doc = well_formed(&[]);
        assert_eq!(doc.len(), 14 + 36);

        let pattern = decode_bytes(&doc).unwrap();
        assert_eq!(pattern.version, "0.808-alpha");
        assert_eq!(pattern.tempo, 120.0);
        assert!(pattern.tracks.is_empty());
    }

    #[test]
    fn decodes_single_track() {
        let doc = well_formed(&[track_record(1, "kick", &KICK_STEPS)]);
        let pattern = decode_bytes(&doc).unwrap();

        assert_eq!(pattern.tracks.len(), 1);
        let track: &Track = &pattern.tracks[0];
        assert_eq!(track.id, 1);
        assert_eq!(track.name, "kick");
        let bytes: Vec<u8> = track.steps.iter().map(|step| step.as_byte()).collect();
        assert_eq!(bytes, KICK_STEPS);
        assert_eq!(track.to_string(), "(1) kick\t|x---|x---|x---|x---|");
    }

    #[test]
    fn keeps_tracks_in_file_order_with_duplicate_ids() {
        let doc = well_formed(&[
            track_record(7, "clap", &[0; 16]),
            track_record(7, "", &[1; 16]),
            track_record(0, "hh-open", &KICK_STEPS),
        ]);
        let pattern = decode_bytes(&doc).unwrap();

        let names: Vec<&str> = pattern.tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["clap", "", "hh-open"]);
        assert_eq!(pattern.tracks[1].id, 7);
        assert_eq!(pattern.tracks[1].steps.triggered_count(), 16);
    }

    #[test]
    fn ignores_bytes_after_declared_body() {
        let mut doc = well_formed(&[track_record(2, "snare", &KICK_STEPS)]);
        doc.extend_from_slice(&[0xff; 40]);

        let pattern = decode_bytes(&doc).unwrap();
        assert_eq!(pattern.tracks.len(), 1);
    }

    #[test]
    fn consumes_exactly_the_declared_body() {
        let body = body("0.909", 98.4, &[track_record(3, "cowbell", &KICK_STEPS)]);
        let mut doc = document(&body, body.len() as u64);
        doc.extend_from_slice(b"TAIL");

        let mut cursor = std::io::Cursor::new(doc);
        decode(&mut cursor).unwrap();
        assert_eq!(cursor.position(), (14 + body.len()) as u64);
    }

    #[test]
    fn rejects_any_flipped_header_byte() {
        let doc = well_formed(&[]);
        for index in 0..layout::MAGIC_LEN {
            let mut corrupt = doc.clone();
            corrupt[index] ^= 0x20;
            let err = decode_bytes(&corrupt).unwrap_err();
            assert!(
                matches!(err, SpliceError::HeaderMismatch { .. }),
                "byte {index}: {err}"
            );
        }
    }

    #[test]
    fn truncation_at_every_offset_is_reported() {
        let doc = well_formed(&[
            track_record(1, "kick", &KICK_STEPS),
            track_record(2, "snare", &[0; 16]),
        ]);
        for cut in 0..doc.len() {
            let err = decode_bytes(&doc[..cut]).unwrap_err();
            assert!(
                matches!(err, SpliceError::Truncated { .. }),
                "cut at {cut}: {err}"
            );
        }
    }

    #[test]
    fn partial_trailing_track_is_an_error() {
        let mut body = body("0.808-alpha", 120.0, &[track_record(1, "kick", &KICK_STEPS)]);
        body.extend_from_slice(&[9, 0, 0]);
        let doc = document(&body, body.len() as u64);

        let err = decode_bytes(&doc).unwrap_err();
        assert!(matches!(
            err,
            SpliceError::Truncated {
                field: Field::TrackNameLength,
                needed: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn declared_size_shorter_than_preamble_is_truncated() {
        let body = body("0.808-alpha", 120.0, &[]);
        let doc = document(&body, 20);
        let err = decode_bytes(&doc).unwrap_err();
        assert!(matches!(
            err,
            SpliceError::Truncated {
                field: Field::Version,
                needed: 32,
                available: 20
            }
        ));
    }

    #[test]
    fn oversized_name_length_is_truncated() {
        let mut record = vec![4u8];
        record.extend_from_slice(&u32::MAX.to_be_bytes());
        record.extend_from_slice(b"tom");
        let body = body("0.808-alpha", 120.0, &[record]);
        let doc = document(&body, body.len() as u64);

        let err = decode_bytes(&doc).unwrap_err();
        assert_eq!(err.field(), Some(Field::TrackName));
    }

    #[test]
    fn forged_sizes_in_front_of_short_source_are_truncated() {
        let mut record = vec![1u8];
        record.extend_from_slice(&u32::MAX.to_be_bytes());
        record.extend_from_slice(b"kick");
        let body = body("0.808-alpha", 120.0, &[record]);
        let doc = document(&body, u64::MAX);

        let err = decode_bytes(&doc).unwrap_err();
        assert!(matches!(
            err,
            SpliceError::Truncated {
                field: Field::TrackName,
                needed: 4_294_967_295,
                available: 4
            }
        ));
    }

    #[test]
    fn step_outside_binary_range_is_malformed() {
        let mut steps = KICK_STEPS;
        steps[5] = 2;
        let doc = well_formed(&[
            track_record(1, "kick", &KICK_STEPS),
            track_record(2, "snare", &steps),
        ]);

        let err = decode_bytes(&doc).unwrap_err();
        match err {
            SpliceError::Malformed { field, detail } => {
                assert_eq!(field, Field::TrackSteps);
                assert!(detail.contains("step 5 of track 1 is 0x02"), "{detail}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn version_without_terminator_is_malformed() {
        let mut body = vec![b'v'; layout::VERSION_SLOT_LEN];
        body.extend_from_slice(&120.0f32.to_le_bytes());
        let doc = document(&body, body.len() as u64);

        let err = decode_bytes(&doc).unwrap_err();
        assert!(matches!(
            err,
            SpliceError::Malformed {
                field: Field::Version,
                ..
            }
        ));
    }

    #[test]
    fn version_stops_at_first_nul() {
        let mut slot = version_slot("0.708");
        slot[10..14].copy_from_slice(b"junk");
        let mut body = slot.to_vec();
        body.extend_from_slice(&60.5f32.to_le_bytes());
        let doc = document(&body, body.len() as u64);

        let pattern = decode_bytes(&doc).unwrap();
        assert_eq!(pattern.version, "0.708");
        assert_eq!(pattern.tempo, 60.5);
    }

    #[test]
    fn steps_decode_to_variants() {
        let doc = well_formed(&[track_record(0, "kick", &KICK_STEPS)]);
        let pattern = decode_bytes(&doc).unwrap();
        let steps = &pattern.tracks[0].steps;
        assert_eq!(steps.get(0), Some(Step::Triggered));
        assert_eq!(steps.get(1), Some(Step::Silent));
        assert_eq!(steps.get(16), None);
    }

    #[test]
    fn source_io_failure_is_surfaced() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("device unplugged"))
            }
        }

        let err = decode(Broken).unwrap_err();
        assert!(matches!(err, SpliceError::Io(_)));
    }
}
