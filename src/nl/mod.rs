//! Language layer: everything needed to turn a fragment into a derivation.
//!
//! Pipeline:
//!
//! 1. **Tokenization + tagging**: whitespace/punctuation split, lexicon-driven
//!    POS tags (`tagger`, `lexicon`)
//! 2. **Earley parsing**: tag sequence against the phrase grammar
//!    (`earley`, `grammar`)
//! 3. **Derivation**: first ranked parse, or none (`derive`)
//!
//! The weaver only ever talks to this layer through [`derive::Deriver`].

pub mod derive;
pub mod earley;
pub mod grammar;
pub mod lexicon;
pub mod tagger;

pub use derive::{Derivation, Deriver, GrammarDeriver};
pub use earley::ParseNode;
pub use grammar::{default_grammar, ProseGrammar};
pub use lexicon::{lexicon, Lexicon};
pub use tagger::{LexiconTagger, Tagger};
