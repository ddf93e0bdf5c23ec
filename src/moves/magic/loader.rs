//! Process-lifetime magic-bitboard tables. Generated once on first use and
//! shared read-only afterward — safe across independently-owned engine
//! instances, per the crate's single-threaded-per-instance concurrency model.

use super::precompute::{MagicTableSeed, generate_magic_tables};
use super::structs::MagicTables;
use once_cell::sync::OnceCell;

#[cfg(feature = "deterministic_magic")]
const FIXED_SEED: u64 = 0x4D41_4749_4331_3233;

pub fn load_magic_tables() -> MagicTables {
    static TABLES: OnceCell<MagicTables> = OnceCell::new();
    TABLES
        .get_or_init(|| {
            #[cfg(feature = "deterministic_magic")]
            let seed = MagicTableSeed::Fixed(FIXED_SEED);
            #[cfg(not(feature = "deterministic_magic"))]
            let seed = MagicTableSeed::Random;

            generate_magic_tables(seed).expect("magic-number search exhausted its attempt budget")
        })
        .clone()
}
