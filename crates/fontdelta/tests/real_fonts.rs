//! End-to-end runs on harfrust, tiny-skia and ICU with the DejaVu Sans faces

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use fontdelta::fontdb::Font;
use fontdelta::unicode::UnicodeData;
use fontdelta::{
    report::MemoryReporter, Differ, FontHandle, MemoryWordlists, WordlistDir, WordlistSource,
};
use fontdelta_core::traits::FontRef;

fn font_bytes(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fonts")
        .join(name);
    fs::read(&path).expect("read test font")
}

fn handle(font: Font) -> FontHandle {
    FontHandle::new(Arc::new(font))
}

fn load(name: &str) -> FontHandle {
    handle(Font::from_data(font_bytes(name)).expect("parse test font"))
}

fn real_differ(wordlists: Arc<dyn WordlistSource>) -> Differ {
    Differ::builder()
        .pipeline(fontdelta::default_pipeline().unwrap())
        .character_data(Arc::new(UnicodeData::new()))
        .wordlists(wordlists)
        .reporter(Arc::new(MemoryReporter::new()))
        .build()
        .unwrap()
}

/// Packs single fonts into one collection file
///
/// Each face keeps its bytes; only the table directories are copied in
/// front with offsets moved to the face's new position.
fn font_collection(faces: &[Vec<u8>]) -> Vec<u8> {
    let align = |n: usize| (n + 3) & !3;
    let table_count = |face: &[u8]| usize::from(u16::from_be_bytes([face[4], face[5]]));

    let header_len = 12 + 4 * faces.len();
    let mut dir_offsets = Vec::new();
    let mut pos = header_len;
    for face in faces {
        dir_offsets.push(pos);
        pos += 12 + 16 * table_count(face);
    }
    let mut bases = Vec::new();
    pos = align(pos);
    for face in faces {
        bases.push(pos);
        pos = align(pos + face.len());
    }

    let mut out = Vec::with_capacity(pos);
    out.extend_from_slice(b"ttcf");
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&(faces.len() as u32).to_be_bytes());
    for offset in &dir_offsets {
        out.extend_from_slice(&(*offset as u32).to_be_bytes());
    }
    for (face, base) in faces.iter().zip(&bases) {
        out.extend_from_slice(&face[..12]);
        for record in face[12..12 + 16 * table_count(face)].chunks_exact(16) {
            let offset = u32::from_be_bytes([record[8], record[9], record[10], record[11]]);
            out.extend_from_slice(&record[..8]);
            out.extend_from_slice(&(offset + *base as u32).to_be_bytes());
            out.extend_from_slice(&record[12..]);
        }
    }
    for (face, base) in faces.iter().zip(&bases) {
        out.resize(*base, 0);
        out.extend_from_slice(face);
    }
    out.resize(pos, 0);
    out
}

#[test]
fn test_identical_fonts_produce_an_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Latin.txt"), "Hamburgefonstiv\nwaffle,latn,dflt,liga\n").unwrap();
    let differ = real_differ(Arc::new(WordlistDir::new(dir.path())));

    let diff = differ
        .diff_fonts(&load("DejaVuSans.ttf"), &load("DejaVuSans.ttf"))
        .unwrap();

    assert!(diff.glyphs.missing.is_empty());
    assert!(diff.glyphs.new.is_empty());
    assert!(diff.glyphs.modified.is_empty());
    assert!(diff.words.is_empty());
}

#[test]
fn test_bold_against_regular_reports_glyphs_and_words() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Latin.txt"), "Hamburgefonstiv\n").unwrap();
    let differ = real_differ(Arc::new(WordlistDir::new(dir.path())));

    let diff = differ
        .diff_fonts(&load("DejaVuSans.ttf"), &load("DejaVuSans-Bold.ttf"))
        .unwrap();

    assert!(!diff.glyphs.modified.is_empty());
    let scores: Vec<f64> = diff.glyphs.modified.iter().map(|g| g.changed_pixels).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let latin = diff.words.get("Latin").expect("Latin findings");
    assert_eq!(latin[0].string, "Hamburgefonstiv");
    assert_ne!(latin[0].signature_before, latin[0].signature_after);
}

#[test]
fn test_collection_face_shapes_and_renders_like_its_single_font() {
    let regular = font_bytes("DejaVuSans.ttf");
    let bold = font_bytes("DejaVuSans-Bold.ttf");
    let ttc = font_collection(&[regular, bold]);

    let face = Font::from_data_index(ttc.clone(), 1).unwrap();
    assert_eq!(FontRef::face_index(&face), 1);
    let face = handle(face);
    let differ = real_differ(Arc::new(MemoryWordlists::new()));

    let glyphs = differ
        .diff_glyphs(&face, &load("DejaVuSans-Bold.ttf"))
        .unwrap();
    assert!(glyphs.is_empty(), "face 1 is the bold font: {glyphs:?}");

    let first = handle(Font::from_data_index(ttc, 0).unwrap());
    let diff = differ
        .compare_renders("a", None, None, &[], &first, &face)
        .unwrap();
    assert!(diff.score > 0.0);
}
