// Topic modelling: LDA fitting and ranked term reporting.

pub mod lda;
pub mod report;
pub mod special;
pub mod traits;
