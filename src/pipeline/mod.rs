// Pipeline orchestration: one linear pass over the paper table.

pub mod analysis;
