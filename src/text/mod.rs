// Text preparation: title normalization, stop words and count vectors.

pub mod normalize;
pub mod stopwords;
pub mod vectorizer;
