use bitplane_steg::{
    PixelGrid, StegError,
    codec::{BitReader, BitWriter, decode, encode, max_payload_len},
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// 用给定尺寸创建随机内容的网格
fn random_grid(height: usize, width: usize, channels: usize, seed: u64) -> PixelGrid {
    let mut data = vec![0u8; height * width * channels];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    PixelGrid::new(height, width, channels, data).unwrap()
}

#[test]
fn round_trip_leaves_unwritten_slots_alone() {
    let mut grid = random_grid(20, 30, 3, 7);
    let original = grid.clone();
    let payload = b"the quick brown fox jumps over the lazy dog".to_vec();

    encode(&mut grid, &payload).unwrap();
    assert_eq!(decode(&grid).unwrap(), payload);

    let written = 64 + 8 * payload.len();
    for (i, (&before, &after)) in original.as_raw().iter().zip(grid.as_raw()).enumerate() {
        if i < written {
            assert_eq!(before & 0xFE, after & 0xFE, "slot {i} changed above the LSB");
        } else {
            assert_eq!(before, after, "slot {i} should be untouched");
        }
    }
}

#[test]
fn length_prefix_is_written_most_significant_bit_first() {
    let mut grid = PixelGrid::new(1, 80, 1, vec![0xAA; 80]).unwrap();
    encode(&mut grid, &[0x81]).unwrap();

    let lsbs: Vec<u8> = grid.as_raw().iter().map(|v| v & 1).collect();
    assert!(lsbs[..63].iter().all(|&b| b == 0));
    assert_eq!(lsbs[63], 1);
    assert_eq!(&lsbs[64..72], &[1, 0, 0, 0, 0, 0, 0, 1]);
    assert!(grid.as_raw()[72..].iter().all(|&v| v == 0xAA));
}

#[test]
fn capacity_boundary_is_exact() {
    let len = 5;
    let capacity = 64 + 8 * len;
    let mut grid = random_grid(1, capacity, 1, 11);
    let payload = vec![0x5A; len];

    encode(&mut grid, &payload).unwrap();
    assert_eq!(decode(&grid).unwrap(), payload);
    assert_eq!(max_payload_len(&grid), Some(len as u64));

    let before = grid.clone();
    let err = encode(&mut grid, &vec![0x5A; len + 1]).unwrap_err();
    assert_eq!(
        err,
        StegError::CarrierTooSmall {
            required: capacity as u64 + 8,
            available: capacity as u64,
        }
    );
    assert_eq!(grid, before, "a rejected encode must not touch the grid");
}

#[test]
fn single_pixel_cannot_hold_even_an_empty_payload() {
    let mut grid = random_grid(1, 1, 3, 3);
    let before = grid.clone();

    assert!(matches!(
        encode(&mut grid, &[]),
        Err(StegError::CarrierTooSmall {
            required: 64,
            available: 3
        })
    ));
    assert_eq!(grid, before);
    assert_eq!(max_payload_len(&grid), None);
}

#[test]
fn ten_by_ten_rgb_boundary() {
    // 300 个槽位：64 位前缀之后还剩 236 位，即 29 个完整字节
    let mut grid = random_grid(10, 10, 3, 5);
    assert_eq!(max_payload_len(&grid), Some(29));

    encode(&mut grid, &[]).unwrap();
    assert!(decode(&grid).unwrap().is_empty());

    let payload = vec![0xC3; 29];
    encode(&mut grid, &payload).unwrap();
    assert_eq!(decode(&grid).unwrap(), payload);

    assert!(matches!(
        encode(&mut grid, &[0; 30]),
        Err(StegError::CarrierTooSmall {
            required: 304,
            available: 300
        })
    ));
}

#[test]
fn empty_payload_writes_only_a_zero_prefix() {
    let mut grid = PixelGrid::new(1, 100, 1, vec![0xFF; 100]).unwrap();
    encode(&mut grid, &[]).unwrap();

    assert!(grid.as_raw()[..64].iter().all(|&v| v == 0xFE));
    assert!(grid.as_raw()[64..].iter().all(|&v| v == 0xFF));
    assert_eq!(decode(&grid).unwrap(), Vec::<u8>::new());
}

#[test]
fn traversal_visits_channels_then_columns_then_rows() {
    let mut grid = PixelGrid::new(2, 2, 3, vec![0; 12]).unwrap();
    let mut expected = vec![0u8; 12];

    for slot in 0..12 {
        BitWriter::new(&mut grid)
            .write_bits(&vec![true; slot + 1])
            .unwrap();
        expected[slot] = 1;
        assert_eq!(grid.as_raw(), expected.as_slice(), "bit {slot} landed in the wrong slot");
    }

    assert_eq!(grid.get(0, 0, 1), 1);
    assert_eq!(grid.get(0, 1, 0), 1);
    assert_eq!(grid.get(1, 1, 2), 1);

    // 第 13 个比特回到 (0, 0, 0)，写入第 1 位平面
    let mut writer = BitWriter::new(&mut grid);
    writer.write_bits(&[true; 13]).unwrap();
    assert_eq!(grid.get(0, 0, 0), 0b11);
    assert_eq!(grid.get(0, 0, 1), 0b01);
}

#[test]
fn each_bit_plane_only_touches_its_own_bit() {
    let original = random_grid(2, 2, 3, 42);
    let slots = 12;
    let mut grid = original.clone();
    let mut writer = BitWriter::new(&mut grid);

    for plane in 0..8u32 {
        let pattern: Vec<bool> = (0..slots).map(|i| (i + plane as usize) % 2 == 0).collect();
        writer.write_bits(&pattern).unwrap();
    }
    assert_eq!(writer.remaining(), 0);
    assert_eq!(writer.write_bit(true), Err(StegError::CapacityExhausted));

    for (i, &value) in grid.as_raw().iter().enumerate() {
        for plane in 0..8u32 {
            let expected = (i + plane as usize) % 2 == 0;
            assert_eq!(value >> plane & 1 == 1, expected, "slot {i} plane {plane}");
        }
    }

    // 只写第 0 位平面时，其余位保持原样
    let mut grid = original.clone();
    BitWriter::new(&mut grid)
        .write_bits(&vec![true; slots])
        .unwrap();
    for (&before, &after) in original.as_raw().iter().zip(grid.as_raw()) {
        assert_eq!(after, before | 1);
    }
}

#[test]
fn reader_reports_exhaustion_after_the_last_plane() {
    let grid = random_grid(1, 2, 1, 9);
    let mut reader = BitReader::new(&grid);

    let bits = reader.read_bits(16).unwrap();
    for (i, &value) in grid.as_raw().iter().enumerate() {
        for plane in 0..8 {
            assert_eq!(bits[plane * 2 + i], value >> plane & 1 == 1);
        }
    }
    assert_eq!(reader.read_bit(), Err(StegError::CapacityExhausted));
}

#[test]
fn forged_length_prefix_is_reported_as_corrupt() {
    let grid = PixelGrid::new(10, 10, 3, vec![0xFF; 300]).unwrap();
    assert_eq!(decode(&grid), Err(StegError::TruncatedOrCorruptData));

    // 声明的长度刚好超出剩余槽位一字节
    let total: usize = 300 * 8;
    let fits = ((total - 64) / 8) as u64;
    let mut grid = PixelGrid::new(10, 10, 3, vec![0; 300]).unwrap();
    BitWriter::new(&mut grid)
        .write_bits(&bitplane_steg::bits::to_bits(fits + 1, 64).unwrap())
        .unwrap();
    assert_eq!(decode(&grid), Err(StegError::TruncatedOrCorruptData));
}

#[test]
fn grid_too_small_for_the_prefix_cannot_be_decoded() {
    let grid = random_grid(1, 1, 1, 0);
    assert_eq!(decode(&grid), Err(StegError::TruncatedOrCorruptData));
}

#[test]
fn random_payloads_round_trip() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let (height, width, channels) = (
            rng.random_range(8..40),
            rng.random_range(8..40),
            rng.random_range(1..=4),
        );
        let mut grid = random_grid(height, width, channels, rng.random());
        let max = max_payload_len(&grid).unwrap() as usize;
        let mut payload = vec![0u8; rng.random_range(0..=max)];
        rng.fill_bytes(&mut payload);

        encode(&mut grid, &payload).unwrap();
        assert_eq!(decode(&grid).unwrap(), payload);
    }
}

proptest! {
    #[test]
    fn encode_then_decode_returns_payload(
        height in 1usize..16,
        width in 1usize..16,
        channels in 1usize..=4,
        seed in any::<u64>(),
        mut payload in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut grid = random_grid(height, width, channels, seed);

        match max_payload_len(&grid) {
            None => {
                let before = grid.clone();
                let is_too_small = matches!(
                    encode(&mut grid, &payload),
                    Err(StegError::CarrierTooSmall { .. })
                );
                prop_assert!(is_too_small);
                prop_assert_eq!(grid, before);
            }
            Some(max) => {
                payload.truncate(max as usize);
                encode(&mut grid, &payload).unwrap();
                prop_assert_eq!(decode(&grid).unwrap(), payload);
            }
        }
    }
}
