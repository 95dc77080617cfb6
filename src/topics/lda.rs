// Latent Dirichlet Allocation fitted with batch variational Bayes.
//
// Each document is a mixture over K topics and each topic a distribution over
// the vocabulary. The variational parameters are:
//   gamma  (documents × topics), the per-document Dirichlet over topics
//   lambda (topics × terms), the per-topic Dirichlet over terms
//
// Every iteration runs an E-step (per-document coordinate ascent on gamma,
// warm-started from the previous iteration) followed by an M-step on lambda,
// so the recorded bound never decreases within one run. A single run can
// settle in a collapsed optimum where one topic absorbs every document; the
// fit therefore repeats from `n_init` random starts and keeps the run with
// the highest final bound.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Gamma};
use statrs::function::gamma::ln_gamma;
use tracing::{debug, info};

use super::special::{dirichlet_expectation, dirichlet_expectation_rows, log_sum_exp};
use super::traits::TopicModel;
use crate::error::{AnalysisError, Result};
use crate::text::vectorizer::DocumentTermMatrix;

// Keeps the phi normaliser away from zero
const NORM_EPS: f64 = f64::EPSILON;

// Shape and scale of the Gamma draws used to initialise variational parameters
const INIT_GAMMA_SHAPE: f64 = 100.0;
const INIT_GAMMA_SCALE: f64 = 0.01;

/// LDA configuration.
#[derive(Debug, Clone)]
pub struct LdaConfig {
    /// Number of topics K
    pub n_topics: usize,
    /// Document-topic prior (alpha); `None` means 1 / K
    pub doc_topic_prior: Option<f64>,
    /// Topic-word prior (eta); `None` means 1 / K
    pub topic_word_prior: Option<f64>,
    /// Maximum number of E/M passes over the corpus
    pub max_iter: usize,
    /// Maximum coordinate-ascent steps per document in the E-step
    pub max_doc_update_iter: usize,
    /// Per-document stop threshold on the mean absolute change of gamma
    pub mean_change_tol: f64,
    /// Stop once the relative bound improvement falls below this value
    pub tol: f64,
    /// Number of random starts; the best final bound wins
    pub n_init: usize,
    /// Random seed for reproducible topics
    pub random_seed: Option<u64>,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self {
            n_topics: 10,
            doc_topic_prior: None,
            topic_word_prior: None,
            max_iter: 50,
            max_doc_update_iter: 100,
            mean_change_tol: 1e-3,
            tol: 1e-6,
            n_init: 4,
            random_seed: None,
        }
    }
}

impl LdaConfig {
    /// Configuration with `n_topics` topics and default everything else.
    pub fn new(n_topics: usize) -> Self {
        Self {
            n_topics,
            ..Default::default()
        }
    }

    pub fn doc_topic_prior(mut self, alpha: f64) -> Self {
        self.doc_topic_prior = Some(alpha);
        self
    }

    pub fn topic_word_prior(mut self, eta: f64) -> Self {
        self.topic_word_prior = Some(eta);
        self
    }

    pub fn max_iter(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn n_init(mut self, n: usize) -> Self {
        self.n_init = n;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}

fn check_prior(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidParameter(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

/// Unfitted LDA estimator.
#[derive(Debug, Clone)]
pub struct LatentDirichletAllocation {
    config: LdaConfig,
}

impl LatentDirichletAllocation {
    pub fn new(config: LdaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LdaConfig {
        &self.config
    }

    /// Fit a fresh model to a document-term count matrix.
    ///
    /// Fails with `InvalidTopicCount` when K is 0 or larger than the number of
    /// documents, with `EmptyVocabulary` when the matrix has no columns, and
    /// with `InvalidParameter` for a non-positive prior or zero random starts.
    pub fn fit(&self, dtm: &DocumentTermMatrix) -> Result<LdaModel> {
        let n_docs = dtm.n_documents();
        let n_terms = dtm.n_terms();
        let n_topics = self.config.n_topics;

        if n_topics < 1 || n_topics > n_docs {
            return Err(AnalysisError::InvalidTopicCount {
                requested: n_topics,
                n_documents: n_docs,
            });
        }
        if n_terms == 0 {
            return Err(AnalysisError::EmptyVocabulary { n_documents: n_docs });
        }
        if self.config.n_init == 0 {
            return Err(AnalysisError::InvalidParameter(
                "n_init must be at least 1".to_string(),
            ));
        }

        let alpha = self.config.doc_topic_prior.unwrap_or(1.0 / n_topics as f64);
        let eta = self.config.topic_word_prior.unwrap_or(1.0 / n_topics as f64);
        check_prior("doc_topic_prior", alpha)?;
        check_prior("topic_word_prior", eta)?;

        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let init = Gamma::new(INIT_GAMMA_SHAPE, INIT_GAMMA_SCALE)
            .map_err(|e| AnalysisError::InvalidParameter(e.to_string()))?;

        let state = VariationalState {
            dtm,
            alpha,
            eta,
            n_topics,
            n_terms,
        };

        let mut best: Option<LdaModel> = None;
        for run in 0..self.config.n_init {
            let model = self.fit_once(&state, &init, &mut rng);
            debug!(run, bound = model.final_bound(), iterations = model.n_iter, "LDA random start finished");
            let better = match &best {
                Some(current) => model.final_bound() > current.final_bound(),
                None => true,
            };
            if better {
                best = Some(model);
            }
        }
        let model = best.ok_or_else(|| AnalysisError::InvalidParameter("no LDA run completed".to_string()))?;

        info!(
            topics = n_topics,
            documents = n_docs,
            terms = n_terms,
            starts = self.config.n_init,
            iterations = model.n_iter,
            bound = model.final_bound(),
            "Fitted LDA topic model"
        );

        Ok(model)
    }

    /// One variational run from a fresh random start.
    fn fit_once(&self, state: &VariationalState<'_>, init: &Gamma<f64>, rng: &mut StdRng) -> LdaModel {
        let mut lambda = Array2::from_shape_fn((state.n_topics, state.n_terms), |_| init.sample(&mut *rng));
        let mut gamma = Array2::from_shape_fn((state.dtm.n_documents(), state.n_topics), |_| {
            init.sample(&mut *rng)
        });

        let mut exp_elog_beta = dirichlet_expectation_rows(&lambda).mapv(f64::exp);
        let mut bound_history = vec![state.bound(&gamma, &lambda)];
        let mut n_iter = 0;

        for iter in 0..self.config.max_iter {
            let suff_stats = state.e_step(
                &mut gamma,
                &exp_elog_beta,
                self.config.max_doc_update_iter,
                self.config.mean_change_tol,
            );

            // M-step: lambda = eta + sum_d n_dw * phi_dwk
            lambda = &suff_stats * &exp_elog_beta + state.eta;
            exp_elog_beta = dirichlet_expectation_rows(&lambda).mapv(f64::exp);

            let bound = state.bound(&gamma, &lambda);
            let previous = bound_history[bound_history.len() - 1];
            bound_history.push(bound);
            n_iter = iter + 1;
            debug!(iteration = n_iter, bound, "LDA variational pass");

            if (bound - previous).abs() <= self.config.tol * previous.abs() {
                break;
            }
        }

        let doc_topic = &gamma / &gamma.sum_axis(Axis(1)).insert_axis(Axis(1));

        LdaModel {
            components: lambda,
            doc_topic,
            bound_history,
            n_iter,
        }
    }
}

/// Corpus and priors shared by the E-step and the bound computation.
struct VariationalState<'a> {
    dtm: &'a DocumentTermMatrix,
    alpha: f64,
    eta: f64,
    n_topics: usize,
    n_terms: usize,
}

impl VariationalState<'_> {
    /// Update every document's gamma in place and return the sufficient
    /// statistics sum_d n_dw * exp(E[log θ_dk]) / norm_dw (topics × terms).
    fn e_step(
        &self,
        gamma: &mut Array2<f64>,
        exp_elog_beta: &Array2<f64>,
        max_doc_update_iter: usize,
        mean_change_tol: f64,
    ) -> Array2<f64> {
        let mut suff_stats = Array2::zeros((self.n_topics, self.n_terms));

        for (d, mut gamma_d) in gamma.outer_iter_mut().enumerate() {
            let row = self.dtm.row(d);
            if row.is_empty() {
                // No observed words: the optimum is the prior
                gamma_d.fill(self.alpha);
                continue;
            }

            let mut exp_elog_theta = dirichlet_expectation(gamma_d.view()).mapv(f64::exp);
            for _ in 0..max_doc_update_iter {
                let norm_phi = phi_normaliser(row, &exp_elog_theta, exp_elog_beta);
                let mut change = 0.0;
                for k in 0..self.n_topics {
                    let dot: f64 = row
                        .iter()
                        .zip(&norm_phi)
                        .map(|(&(w, count), norm)| f64::from(count) / norm * exp_elog_beta[[k, w]])
                        .sum();
                    let updated = self.alpha + exp_elog_theta[k] * dot;
                    change += (updated - gamma_d[k]).abs();
                    gamma_d[k] = updated;
                }
                exp_elog_theta = dirichlet_expectation(gamma_d.view()).mapv(f64::exp);
                if change / (self.n_topics as f64) < mean_change_tol {
                    break;
                }
            }

            let norm_phi = phi_normaliser(row, &exp_elog_theta, exp_elog_beta);
            for (&(w, count), norm) in row.iter().zip(&norm_phi) {
                let scaled = f64::from(count) / norm;
                for k in 0..self.n_topics {
                    suff_stats[[k, w]] += exp_elog_theta[k] * scaled;
                }
            }
        }

        suff_stats
    }

    /// Evidence lower bound with phi at its optimum for the given gamma and
    /// lambda.
    fn bound(&self, gamma: &Array2<f64>, lambda: &Array2<f64>) -> f64 {
        let elog_beta = dirichlet_expectation_rows(lambda);
        let elog_theta = dirichlet_expectation_rows(gamma);
        let k = self.n_topics as f64;
        let v = self.n_terms as f64;

        let mut score = 0.0;
        let mut scratch = vec![0.0; self.n_topics];

        for (d, (gamma_d, elog_theta_d)) in gamma.rows().into_iter().zip(elog_theta.rows()).enumerate() {
            // E[log p(w | theta, beta)] - E[log q(z)]
            for &(w, count) in self.dtm.row(d) {
                for (t, slot) in scratch.iter_mut().enumerate() {
                    *slot = elog_theta_d[t] + elog_beta[[t, w]];
                }
                score += f64::from(count) * log_sum_exp(&scratch);
            }

            // E[log p(theta | alpha)] - E[log q(theta | gamma)]
            for (&g, &e) in gamma_d.iter().zip(elog_theta_d.iter()) {
                score += (self.alpha - g) * e + ln_gamma(g) - ln_gamma(self.alpha);
            }
            score += ln_gamma(self.alpha * k) - ln_gamma(gamma_d.sum());
        }

        // E[log p(beta | eta)] - E[log q(beta | lambda)]
        for (&l, &e) in lambda.iter().zip(elog_beta.iter()) {
            score += (self.eta - l) * e + ln_gamma(l) - ln_gamma(self.eta);
        }
        for lambda_t in lambda.rows() {
            score += ln_gamma(self.eta * v) - ln_gamma(lambda_t.sum());
        }

        score
    }
}

/// sum_k exp(E[log θ_k]) * exp(E[log β_kw]) for every word of one document.
fn phi_normaliser(row: &[(usize, u32)], exp_elog_theta: &Array1<f64>, exp_elog_beta: &Array2<f64>) -> Vec<f64> {
    row.iter()
        .map(|&(w, _)| exp_elog_theta.dot(&exp_elog_beta.column(w)) + NORM_EPS)
        .collect()
}

/// A fitted LDA model. Immutable; refitting produces a new value.
#[derive(Debug, Clone)]
pub struct LdaModel {
    /// Topic-term variational parameters (topics × terms)
    components: Array2<f64>,
    /// Normalised document-topic mixture (documents × topics)
    doc_topic: Array2<f64>,
    /// Evidence lower bound before fitting and after every iteration
    bound_history: Vec<f64>,
    n_iter: usize,
}

impl LdaModel {
    /// Raw topic-term weights (unnormalised pseudo-counts).
    pub fn components(&self) -> &Array2<f64> {
        &self.components
    }

    /// Per-topic term distributions (each row sums to 1).
    pub fn topic_term_distribution(&self) -> Array2<f64> {
        &self.components / &self.components.sum_axis(Axis(1)).insert_axis(Axis(1))
    }

    /// Per-document topic mixture (each row sums to 1).
    pub fn document_topics(&self) -> &Array2<f64> {
        &self.doc_topic
    }

    /// Index of the most probable topic for each document.
    pub fn dominant_topics(&self) -> Vec<usize> {
        self.doc_topic
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (k, &p)| if p > best.1 { (k, p) } else { best })
                    .0
            })
            .collect()
    }

    /// Bound before fitting, then after every pass of the winning run.
    pub fn bound_history(&self) -> &[f64] {
        &self.bound_history
    }

    /// Number of E/M passes actually run.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    fn final_bound(&self) -> f64 {
        self.bound_history.last().copied().unwrap_or(f64::NEG_INFINITY)
    }
}

impl TopicModel for LdaModel {
    fn n_topics(&self) -> usize {
        self.components.nrows()
    }

    fn n_terms(&self) -> usize {
        self.components.ncols()
    }

    fn topic_weights(&self, topic: usize) -> ArrayView1<'_, f64> {
        self.components.row(topic)
    }
}
