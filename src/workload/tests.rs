use super::*;
use crate::error::{AppError, AppResult};
use base64::Engine as _;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::tempdir;

fn spec(character_set: CharacterSet, length: usize, batch_count: usize) -> WorkloadSpec {
    WorkloadSpec {
        character_set,
        length,
        batch_count,
        source_file: None,
        file_encoding: FileEncoding::Ascii,
        fresh: false,
    }
}

fn is_card_number(value: &str) -> bool {
    let groups: Vec<&str> = value.split('-').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|group| group.len() == 4 && group.bytes().all(|byte| byte.is_ascii_digit()))
}

#[test]
fn alphanumeric_payload_has_requested_length() -> AppResult<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let generator = PayloadGenerator::new(CharacterSet::Alphanumeric, 64)?;
    for _ in 0..50 {
        let value = generator.generate(&mut rng);
        if value.len() != 64 || !value.bytes().all(|byte| byte.is_ascii_alphanumeric()) {
            return Err(AppError::validation(format!(
                "Unexpected alphanumeric payload: {}",
                value
            )));
        }
    }
    Ok(())
}

#[test]
fn digits_payload_is_card_shaped() -> AppResult<()> {
    let mut rng = StdRng::seed_from_u64(11);
    let generator = PayloadGenerator::new(CharacterSet::Digits, 64)?;
    for _ in 0..200 {
        let value = generator.generate(&mut rng);
        if !is_card_number(&value) {
            return Err(AppError::validation(format!(
                "Expected dddd-dddd-dddd-dddd, got {}",
                value
            )));
        }
    }
    Ok(())
}

#[test]
fn printable_payload_stays_in_range() -> AppResult<()> {
    let mut rng = StdRng::seed_from_u64(3);
    let generator = PayloadGenerator::new(CharacterSet::Printable, 512)?;
    let value = generator.generate(&mut rng);
    if value.len() != 512 {
        return Err(AppError::validation("Unexpected printable length"));
    }
    if !value.bytes().all(|byte| (b' '..=b'~').contains(&byte)) {
        return Err(AppError::validation(format!(
            "Non-printable byte in {}",
            value
        )));
    }
    Ok(())
}

#[test]
fn repeated_workload_copies_one_payload() -> AppResult<()> {
    let mut rng = StdRng::seed_from_u64(5);
    let workload = Workload::build(&spec(CharacterSet::Alphanumeric, 64, 100), &mut rng)?;
    if workload.record_count() != 100 {
        return Err(AppError::validation("Unexpected record count"));
    }
    if workload.byte_count != 6400 {
        return Err(AppError::validation(format!(
            "Unexpected byte count: {}",
            workload.byte_count
        )));
    }
    let first = workload.records.first().cloned().unwrap_or_default();
    if workload.records.iter().any(|record| *record != first) {
        return Err(AppError::validation("Expected identical records"));
    }
    Ok(())
}

#[test]
fn fresh_workload_generates_distinct_payloads() -> AppResult<()> {
    let mut rng = StdRng::seed_from_u64(9);
    let mut workload_spec = spec(CharacterSet::Alphanumeric, 32, 20);
    workload_spec.fresh = true;
    let workload = Workload::build(&workload_spec, &mut rng)?;
    let mut unique = workload.records.clone();
    unique.sort();
    unique.dedup();
    if unique.len() != 20 {
        return Err(AppError::validation("Expected 20 distinct payloads"));
    }
    Ok(())
}

#[test]
fn ascii_file_drops_non_ascii_bytes() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("names.csv");
    std::fs::write(&path, "José,Zoë\nAnn,Bob\n".as_bytes())?;

    let mut workload_spec = spec(CharacterSet::Alphanumeric, 64, 10);
    workload_spec.source_file = Some(path);
    let mut rng = StdRng::seed_from_u64(1);
    let workload = Workload::build(&workload_spec, &mut rng)?;

    if workload.records != ["Jos,Zo\nAnn,Bob\n"] {
        return Err(AppError::validation(format!(
            "Unexpected ascii record: {:?}",
            workload.records
        )));
    }
    if workload.byte_count != 15 {
        return Err(AppError::validation(format!(
            "Unexpected byte count: {}",
            workload.byte_count
        )));
    }
    Ok(())
}

#[test]
fn base64_file_round_trips_raw_bytes() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("blob.bin");
    let raw: Vec<u8> = (0..=255u8).cycle().take(4099).collect();
    std::fs::write(&path, &raw)?;

    let payload = read_source(&path, FileEncoding::Base64)?;
    if payload.byte_count != 4099 {
        return Err(AppError::validation("Expected raw size as byte count"));
    }
    let decoded = decode_revealed(&payload.record)?;
    if decoded != raw {
        return Err(AppError::validation("Decoded bytes differ from file"));
    }

    let mut workload_spec = spec(CharacterSet::Alphanumeric, 64, 1);
    workload_spec.source_file = Some(path);
    workload_spec.file_encoding = FileEncoding::Base64;
    let mut rng = StdRng::seed_from_u64(1);
    let workload = Workload::build(&workload_spec, &mut rng)?;
    let revealed = vec![base64::engine::general_purpose::STANDARD.encode(&raw)];
    if !workload.matches_revealed(&revealed)? {
        return Err(AppError::validation("Expected revealed bytes to match"));
    }
    let tampered = vec![base64::engine::general_purpose::STANDARD.encode(b"other")];
    if workload.matches_revealed(&tampered)? {
        return Err(AppError::validation("Tampered payload should not match"));
    }
    Ok(())
}

#[test]
fn missing_file_is_reported() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("absent.txt");
    match read_source(&path, FileEncoding::Ascii) {
        Err(WorkloadError::ReadSource { .. }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected read error, got {:?}",
            other.map(|payload| payload.byte_count)
        ))),
    }
}

#[test]
fn file_without_ascii_content_is_rejected() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("binary.bin");
    std::fs::write(&path, [0xC3u8, 0xA9, 0xFF])?;
    match read_source(&path, FileEncoding::Ascii) {
        Err(WorkloadError::EmptySource { .. }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected empty source error, got {:?}",
            other.map(|payload| payload.byte_count)
        ))),
    }
}

#[test]
fn ascii_only_keeps_control_characters() -> AppResult<()> {
    if ascii_only(b"a\tb\x80c") != "a\tbc" {
        return Err(AppError::validation("Unexpected ascii filtering"));
    }
    Ok(())
}
