//! Lexicon-weighted hashing fallback provider.
//!
//! Builds deterministic dense vectors by signed feature hashing:
//! every unigram and adjacent-pair bigram is folded into a bucket
//! chosen from its blake3 digest, with a sign bit from the same
//! digest so collisions tend to cancel rather than pile up. Terms
//! from the chart vocabulary carry more weight than connective
//! prose, which keeps "Saturn in the 3rd house" and "Venus in the
//! 3rd house" further apart than their shared filler suggests.
//! Not a neural model, but always available, which is what the
//! degradation contract needs.

use jyotish_core::errors::JyotishResult;
use jyotish_core::traits::IEmbeddingProvider;

/// Chart vocabulary and its feature weights. Anything absent scores
/// 1.0; ordinals and bare house numbers score 2.0.
const LEXICON: &[(&str, f32)] = &[
    ("sun", 3.0),
    ("moon", 3.0),
    ("mars", 3.0),
    ("mercury", 3.0),
    ("jupiter", 3.0),
    ("venus", 3.0),
    ("saturn", 3.0),
    ("rahu", 3.0),
    ("ketu", 3.0),
    ("house", 2.5),
    ("lord", 2.5),
    ("ascendant", 2.5),
    ("lagna", 2.5),
    ("dasha", 2.5),
    ("transit", 2.5),
    ("yoga", 2.5),
    ("exalted", 2.0),
    ("debilitated", 2.0),
    ("retrograde", 2.0),
    ("conjunct", 2.0),
    ("aspect", 2.0),
];

pub struct HashingFallback {
    dimensions: usize,
}

impl HashingFallback {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn term_weight(term: &str) -> f32 {
        if let Some((_, w)) = LEXICON.iter().find(|(t, _)| *t == term) {
            return *w;
        }
        // "10th", "3" and friends anchor a rule to a specific house.
        if term.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return 2.0;
        }
        1.0
    }

    fn terms(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect()
    }

    /// Fold one weighted feature into its blake3-chosen bucket, signed
    /// by a bit of the same digest.
    fn fold(vec: &mut [f32], feature: &str, weight: f32) {
        let digest = *blake3::hash(feature.as_bytes()).as_bytes();
        let bucket = digest[..8]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)) as usize
            % vec.len();
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vec[bucket] += sign * weight;
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let terms = Self::terms(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if terms.is_empty() {
            return vec;
        }

        for term in &terms {
            Self::fold(&mut vec, term, Self::term_weight(term));
        }
        // Adjacent pairs keep "10th house" distinct from "10th lord".
        for pair in terms.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            let weight = (Self::term_weight(&pair[0]) + Self::term_weight(&pair[1])) / 2.0;
            Self::fold(&mut vec, &bigram, weight);
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for HashingFallback {
    fn embed(&self, text: &str) -> JyotishResult<Vec<f32>> {
        Ok(self.vector_for(text))
    }

    fn embed_batch(&self, texts: &[String]) -> JyotishResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing-fallback"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(x: &[f32], y: &[f32]) -> f32 {
        x.iter().zip(y).map(|(a, b)| a * b).sum()
    }

    #[test]
    fn deterministic() {
        let p = HashingFallback::new(64);
        assert_eq!(
            p.embed("Sun in 11th house").unwrap(),
            p.embed("Sun in 11th house").unwrap()
        );
    }

    #[test]
    fn normalized_unless_empty() {
        let p = HashingFallback::new(64);
        let v = p.embed("career gains through service").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);

        let zero = p.embed("").unwrap();
        assert!(zero.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn similar_texts_score_closer_than_unrelated() {
        let p = HashingFallback::new(256);
        let a = p.embed("career success through the 10th house").unwrap();
        let b = p.embed("career advancement and the 10th house").unwrap();
        let c = p.embed("childbirth and the fifth house of progeny").unwrap();

        assert!(dot(&a, &b) > dot(&a, &c));
    }

    #[test]
    fn word_order_changes_the_vector() {
        // Bigram features see the order; a bag of words would not.
        let p = HashingFallback::new(256);
        assert_ne!(
            p.embed("10th lord in 10th house").unwrap(),
            p.embed("house 10th in lord 10th").unwrap()
        );
    }

    #[test]
    fn chart_terms_dominate_shared_filler() {
        // Both pairs share "in the ... house"; the planet decides.
        let p = HashingFallback::new(256);
        let a = p.embed("Saturn in the 3rd house").unwrap();
        let b = p.embed("Saturn in the 8th house").unwrap();
        let c = p.embed("Venus in the 3rd house").unwrap();

        assert!(dot(&a, &b) > 0.0);
        assert!(dot(&a, &b) > dot(&b, &c));
    }
}
