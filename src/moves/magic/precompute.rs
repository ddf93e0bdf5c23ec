//! Builds the magic-bitboard attack tables once per process: for each square,
//! finds a magic multiplier that perfectly hashes every blocker subset of the
//! square's relevant-occupancy mask onto its precomputed attack set.

use super::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use super::search::find_magic_number_for_square;
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};
use rand::{RngCore, SeedableRng, rngs::StdRng};

const FILE_A: u64 = 0x0101_0101_0101_0101;
const FILE_H: u64 = 0x8080_8080_8080_8080;
const RANK_1: u64 = 0x0000_0000_0000_00FF;
const RANK_8: u64 = 0xFF00_0000_0000_0000;
const EDGES: u64 = FILE_A | FILE_H | RANK_1 | RANK_8;

/// Which squares on each ray actually constrain the attack set — the edge
/// square on a ray never needs to appear in the mask, since a blocker there
/// can't hide anything beyond it.
fn rook_mask(square: usize) -> u64 {
    let full = rook_attacks_per_square(square, 0);
    let rank = square / 8;
    let file = square % 8;
    let mut mask = full;
    if rank != 0 {
        mask &= !RANK_1;
    }
    if rank != 7 {
        mask &= !RANK_8;
    }
    if file != 0 {
        mask &= !FILE_A;
    }
    if file != 7 {
        mask &= !FILE_H;
    }
    mask
}

fn bishop_mask(square: usize) -> u64 {
    bishop_attacks_per_square(square, 0) & !EDGES
}

/// Enumerates every subset of `mask` via the standard carry-rippler trick.
fn subsets_of(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1usize << mask.count_ones());
    let mut subset: u64 = 0;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

/// Seed selection for magic-number search: fixed for reproducible tests and
/// benchmarks, OS-random otherwise.
#[derive(Debug, Clone, Copy)]
pub enum MagicTableSeed {
    Fixed(u64),
    Random,
}

fn rng_for(seed: MagicTableSeed) -> StdRng {
    match seed {
        MagicTableSeed::Fixed(s) => StdRng::seed_from_u64(s),
        MagicTableSeed::Random => {
            let mut bytes = [0u8; 32];
            rand::rng().fill_bytes(&mut bytes);
            StdRng::from_seed(bytes)
        }
    }
}

fn build_entry(
    square: usize,
    mask: u64,
    attacks_per_square: fn(usize, u64) -> u64,
    rng: &mut StdRng,
) -> Result<MagicEntry, String> {
    let blockers = subsets_of(mask);
    let attacks: Vec<u64> = blockers.iter().map(|&b| attacks_per_square(square, b)).collect();
    let shift = 64 - mask.count_ones();
    let magic = find_magic_number_for_square(&blockers, &attacks, shift, rng)?;

    let table_len = 1usize << mask.count_ones();
    let mut table = vec![0u64; table_len].into_boxed_slice();
    for (&blocker, &attack) in blockers.iter().zip(attacks.iter()) {
        let index = (blocker.wrapping_mul(magic) >> shift) as usize;
        table[index] = attack;
    }

    Ok(MagicEntry {
        magic,
        shift,
        mask,
        table,
    })
}

pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let mut rng = rng_for(seed);

    let mut rook_entries = Vec::with_capacity(64);
    let mut bishop_entries = Vec::with_capacity(64);
    for square in 0..64 {
        rook_entries.push(build_entry(
            square,
            rook_mask(square),
            rook_attacks_per_square,
            &mut rng,
        )?);
        bishop_entries.push(build_entry(
            square,
            bishop_mask(square),
            bishop_attacks_per_square,
            &mut rng,
        )?);
    }

    Ok(MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    })
}
