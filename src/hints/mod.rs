mod order;
mod persistence;

pub use order::{HintCollection, HintOrder, HINT_STRIDE};
pub use persistence::{filter_known, load_hints, save_hints};
