//! Cache domain - memoisation of computed string results

mod memo;

pub use memo::MemoCache;
