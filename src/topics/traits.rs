// Topic model trait: swap-ready abstraction.
//
// The reporter only needs per-topic term weights, so anything that can expose
// a K × V weight table (variational LDA today, a sampler later) plugs in here
// without changing the reporting code.

use ndarray::ArrayView1;

/// A fitted topic model viewed as K weight vectors over the vocabulary.
pub trait TopicModel {
    /// Number of topics K.
    fn n_topics(&self) -> usize;

    /// Width of every topic's weight vector.
    fn n_terms(&self) -> usize;

    /// Non-negative term weights for one topic, indexed like the vocabulary.
    fn topic_weights(&self, topic: usize) -> ArrayView1<'_, f64>;
}
