//! Fixed vocabulary of the PigYacc grammar language

pub mod keywords;

pub use keywords::Keyword;
