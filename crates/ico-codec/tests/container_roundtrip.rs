use std::io::Cursor;

use proptest::prelude::*;

use ico_codec::{encode_ico, IcoFile, ImagePayload, PngEntry, PNG_SIGNATURE, STANDARD_SIZES};

fn png_stub(body: &[u8]) -> Vec<u8> {
    let mut png = PNG_SIGNATURE.to_vec();
    png.extend_from_slice(body);
    png
}

#[test]
fn standard_sizes_round_trip() {
    let entries: Vec<PngEntry> = STANDARD_SIZES
        .iter()
        .map(|&size| PngEntry {
            size,
            png: png_stub(format!("payload for {size}").as_bytes()),
        })
        .collect();

    let bytes = encode_ico(&entries).expect("encode icon");
    let ico = IcoFile::read(&mut Cursor::new(&bytes)).expect("read icon back");

    assert_eq!(usize::from(ico.directory.entry_count), entries.len());
    assert_eq!(ico.entries.len(), entries.len());
    assert_eq!(ico.images.len(), entries.len());
    assert!(ico.skipped.is_empty());

    for (image, original) in ico.images.iter().zip(&entries) {
        assert_eq!(image.entry.width, original.size);
        assert_eq!(image.entry.height, original.size);
        assert_eq!(image.entry.byte_size as usize, original.png.len());
        match &image.payload {
            ImagePayload::Png(png) => assert_eq!(png, &original.png),
            other => panic!("expected PNG payload, got {other:?}"),
        }
    }
}

#[test]
fn single_image_directory_offsets_match_the_reference_layout() {
    let entries = [PngEntry {
        size: 32,
        png: png_stub(b"x"),
    }];
    let bytes = encode_ico(&entries).expect("encode icon");

    // One entry: payload starts right after the 6 + 16 byte directory.
    assert_eq!(u32::from_le_bytes(bytes[18..22].try_into().unwrap()), 22);
    assert_eq!(&bytes[22..30], &PNG_SIGNATURE);
}

proptest! {
    #[test]
    fn arbitrary_containers_round_trip(
        specs in prop::collection::vec(
            (1u32..=255, prop::collection::vec(any::<u8>(), 0..64)),
            1..6,
        )
    ) {
        let entries: Vec<PngEntry> = specs
            .iter()
            .map(|(size, body)| PngEntry { size: *size, png: png_stub(body) })
            .collect();

        let bytes = encode_ico(&entries).unwrap();
        let ico = IcoFile::read(&mut Cursor::new(&bytes)).unwrap();

        prop_assert_eq!(ico.images.len(), entries.len());
        for (image, original) in ico.images.iter().zip(&entries) {
            prop_assert_eq!(image.entry.width, original.size);
            prop_assert_eq!(image.entry.height, original.size);
            match &image.payload {
                ImagePayload::Png(png) => prop_assert_eq!(png, &original.png),
                other => prop_assert!(false, "expected PNG payload, got {other:?}"),
            }
        }
    }
}
