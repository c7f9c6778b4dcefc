use rand::RngExt;

use crate::domain::repository::CodeGenerator;
use crate::domain::types::{CODE_CHARSET, CODE_LEN};

/// Draws each symbol uniformly from [`CODE_CHARSET`] using the thread-local RNG.
#[derive(Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..CODE_LEN)
            .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
            .collect()
    }
}
