// The cost-calculation core: tokenize, price, rank.
//
// Everything in here is pure and synchronous; the CLI layer owns all state
// mutation and rendering.

pub(crate) mod cost;
pub(crate) mod pipeline;
pub(crate) mod rank;
pub(crate) mod tokenizer;
