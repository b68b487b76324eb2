//! Instrument reference data.

mod forex;

pub use forex::{
    ForexPairSpec, ForexPairTable, PairCategory, PairOption, PairTable, STANDARD_LOT,
    STANDARD_PIP,
};
