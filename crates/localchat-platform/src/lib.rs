//! Browser adapters for the LocalChat core ports.

pub mod llm;

#[cfg(test)]
mod tests;
