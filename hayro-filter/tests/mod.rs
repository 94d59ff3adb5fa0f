//! Properties shared by all filters.


use hayro_filter::{Codec, DecodeParms, list, new_filter};

/// Data with short repetitions, long runs and some noise.
fn sample(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_u32;

    (0..len)
        .map(|i| match (i / 64) % 4 {
            0 => (i % 7) as u8,
            1 => 0xaa,
            2 => {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            }
            _ => (i as u8).wrapping_mul(3),
        })
        .collect()
}

fn inputs() -> Vec<Vec<u8>> {
    vec![
        vec![],
        vec![0],
        vec![0xff],
        vec![0; 4],
        b"Hello".to_vec(),
        b"hello hello hello hello".to_vec(),
        (0..=255).collect(),
        sample(1000),
        sample(100_000),
    ]
}

/// All native codecs, with default parameters.
fn codecs() -> Vec<Codec> {
    list()
        .into_iter()
        .map(|name| new_filter(name, None).unwrap())
        .collect()
}

fn codec_with(name: &str, parms: &[(&str, i32)]) -> Codec {
    new_filter(name, Some(parms.iter().copied().collect::<DecodeParms>())).unwrap()
}
