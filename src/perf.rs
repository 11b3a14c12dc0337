//! Per-block fan-out for decode and encode.
//!
//! Blocks are independent, so with the `parallel` feature both directions
//! run on Rayon's global pool.  Results always come back in input order;
//! without the feature the same functions run sequentially.

use crate::text::{self, BlockContent, TextError};

/// Classify every block, preserving order.
pub fn classify_blocks(blocks: &[Vec<u8>]) -> Vec<BlockContent> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        blocks.par_iter().map(|b| BlockContent::classify(b)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        blocks.iter().map(|b| BlockContent::classify(b)).collect()
    }
}

/// Encode each `(index, strings)` job into a block, preserving order.
/// The first failure is returned.
pub fn encode_jobs(jobs: &[(usize, &[String])]) -> Result<Vec<(usize, Vec<u8>)>, TextError> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        jobs.par_iter()
            .map(|&(index, texts)| text::encode(texts).map(|block| (index, block)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        jobs.iter()
            .map(|&(index, texts)| text::encode(texts).map(|block| (index, block)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_keeps_order() {
        let blocks = vec![
            text::encode(&["zero"]).unwrap(),
            vec![0xAA; 3],
            text::encode(&["two", "2"]).unwrap(),
        ];
        let contents = classify_blocks(&blocks);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].texts(), &["zero".to_string()]);
        assert_eq!(contents[1], BlockContent::Opaque(vec![0xAA; 3]));
        assert_eq!(contents[2].texts(), &["two".to_string(), "2".to_string()]);
    }

    #[test]
    fn encode_jobs_keeps_indices() {
        let a = vec!["a".to_string()];
        let b = vec!["b".to_string(), String::new()];
        let jobs: Vec<(usize, &[String])> = vec![(4, a.as_slice()), (9, b.as_slice())];
        let out = encode_jobs(&jobs).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, 4);
        assert_eq!(out[1].0, 9);
        assert_eq!(text::decode(&out[1].1), b);
    }
}
